use serde::{Deserialize, Serialize};

use crate::cache::normalize_names;
use crate::catalog::EntityKind;
use crate::storage::Pagination;

/// Default page size when the caller does not provide one.
pub const DEFAULT_LIMIT: u64 = 10;

/// An inner join from the queried entity to a related one.
///
/// The parent's `fk_field` is matched against the joined entity's
/// `join_field`. Joined columns listed in `select` are added to every row and
/// `search` columns take part in the search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    #[serde(rename = "model")]
    pub kind: EntityKind,
    #[serde(rename = "join")]
    pub join_field: String,
    #[serde(rename = "fk")]
    pub fk_field: String,
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub search: Vec<String>,
}

impl JoinSpec {
    pub fn new(kind: EntityKind, join_field: impl Into<String>, fk_field: impl Into<String>) -> Self {
        Self {
            kind,
            join_field: join_field.into(),
            fk_field: fk_field.into(),
            select: Vec::new(),
            search: Vec::new(),
        }
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_search<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy with sorted, de-duplicated field lists.
    pub fn normalized(&self) -> Self {
        Self {
            kind: self.kind,
            join_field: self.join_field.clone(),
            fk_field: self.fk_field.clone(),
            select: normalize_names(&self.select),
            search: normalize_names(&self.search),
        }
    }
}

/// Caller-supplied parameters of a filtered, joined, paginated query.
///
/// Field names are untrusted; see [`super::QueryPlan::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub kind: EntityKind,
    pub search_fields: Vec<String>,
    pub search: String,
    pub pagination: Pagination,
    pub joins: Vec<JoinSpec>,
    pub select: Vec<String>,
}

impl QueryParams {
    /// An unfiltered first page of `kind` with every field selected.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            search_fields: Vec::new(),
            search: String::new(),
            pagination: Pagination::new(0, DEFAULT_LIMIT),
            joins: Vec::new(),
            select: Vec::new(),
        }
    }

    pub fn with_search<I, S>(mut self, term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = term.into();
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }
}
