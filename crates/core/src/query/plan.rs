//! Validation of untrusted query parameters against the static schema.
//!
//! A [`QueryPlan`] only ever refers to `&'static str` field names taken from
//! [`EntityKind::fields`], so backends can splice its column names into SQL
//! without further checks. The search term itself is always bound as a
//! parameter.

use std::collections::HashSet;

use crate::catalog::EntityKind;
use crate::storage::{Pagination, RepositoryError, Result};

use super::QueryParams;

/// Index of the queried entity's table in [`QueryPlan::tables`].
pub const PARENT_TABLE: usize = 0;

/// A column reference into one of the plan's tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Position in [`QueryPlan::tables`].
    pub table: usize,
    pub field: &'static str,
}

/// A selected column and the name it takes in every result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumn {
    pub column: ColumnRef,
    pub output_name: String,
}

/// A validated inner join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJoin {
    pub kind: EntityKind,
    /// Column on the joined table.
    pub join_field: &'static str,
    /// Column on the parent table.
    pub fk_field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub kind: EntityKind,
    pub joins: Vec<PlannedJoin>,
    pub columns: Vec<SelectedColumn>,
    pub search_columns: Vec<ColumnRef>,
    /// Present only when the term is non-empty and at least one search
    /// column survived validation.
    pub search: Option<String>,
    pub pagination: Pagination,
    pub ignored_fields: Vec<String>,
}

impl QueryPlan {
    /// Validates `params` against the schema.
    ///
    /// Unknown select and search names are dropped and reported in
    /// `ignored_fields`. Unknown join keys are an error: a join on a
    /// misspelled key has no sensible lenient reading.
    pub fn build(params: &QueryParams) -> Result<Self> {
        let parent = params.kind;
        let mut ignored = Vec::new();

        let mut joins = Vec::with_capacity(params.joins.len());
        for join in &params.joins {
            let fk_field = parent
                .field(&join.fk_field)
                .ok_or_else(|| invalid_join_key(parent, &join.fk_field))?
                .name;
            let join_field = join
                .kind
                .field(&join.join_field)
                .ok_or_else(|| invalid_join_key(join.kind, &join.join_field))?
                .name;
            joins.push(PlannedJoin {
                kind: join.kind,
                join_field,
                fk_field,
            });
        }

        let mut columns = Vec::new();
        let mut taken = HashSet::new();

        let mut parent_select = validate(parent, &params.select, &mut ignored);
        if parent_select.is_empty() {
            parent_select = parent.field_names();
        }
        for field in parent_select {
            push_column(&mut columns, &mut taken, parent, PARENT_TABLE, field);
        }

        for (index, join) in params.joins.iter().enumerate() {
            let table = index + 1;
            for field in validate(join.kind, &join.select, &mut ignored) {
                push_column(&mut columns, &mut taken, join.kind, table, field);
            }
        }

        let mut search_columns: Vec<ColumnRef> = validate(parent, &params.search_fields, &mut ignored)
            .into_iter()
            .map(|field| ColumnRef {
                table: PARENT_TABLE,
                field,
            })
            .collect();
        for (index, join) in params.joins.iter().enumerate() {
            search_columns.extend(
                validate(join.kind, &join.search, &mut ignored)
                    .into_iter()
                    .map(|field| ColumnRef {
                        table: index + 1,
                        field,
                    }),
            );
        }

        let search = if params.search.is_empty() || search_columns.is_empty() {
            None
        } else {
            Some(params.search.clone())
        };

        ignored.sort();
        ignored.dedup();

        Ok(Self {
            kind: parent,
            joins,
            columns,
            search_columns,
            search,
            pagination: params.pagination,
            ignored_fields: ignored,
        })
    }

    /// Entity kind of every table in the plan: the parent first, then one per
    /// join in request order.
    pub fn tables(&self) -> Vec<EntityKind> {
        std::iter::once(self.kind)
            .chain(self.joins.iter().map(|join| join.kind))
            .collect()
    }
}

fn invalid_join_key(kind: EntityKind, name: &str) -> RepositoryError {
    RepositoryError::InvalidData(format!(
        "{}.{} is not a valid join key",
        kind.table(),
        name
    ))
}

/// Keeps the names that are fields of `kind`, in first-seen order without
/// duplicates. Rejected names are appended to `ignored` as `table.field`.
fn validate(kind: EntityKind, names: &[String], ignored: &mut Vec<String>) -> Vec<&'static str> {
    let mut valid: Vec<&'static str> = Vec::new();
    for name in names {
        match kind.field(name) {
            Some(descriptor) if !valid.contains(&descriptor.name) => valid.push(descriptor.name),
            Some(_) => {}
            None => ignored.push(format!("{}.{}", kind.table(), name)),
        }
    }
    valid
}

fn push_column(
    columns: &mut Vec<SelectedColumn>,
    taken: &mut HashSet<String>,
    kind: EntityKind,
    table: usize,
    field: &'static str,
) {
    let mut output_name = field.to_string();
    if taken.contains(&output_name) {
        output_name = format!("{}.{}", kind.table(), field);
    }
    if taken.contains(&output_name) {
        // Same table joined twice.
        output_name = format!("{}{}.{}", kind.table(), table, field);
    }
    taken.insert(output_name.clone());
    columns.push(SelectedColumn {
        column: ColumnRef { table, field },
        output_name,
    });
}
