//! Static schema introspection for catalog entities.
//!
//! Every entity type exposes an ordered list of field descriptors. Query
//! parameters coming from callers are validated against these tables, never
//! against the store itself.

use serde::{Deserialize, Serialize};

/// Semantic type of a stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Text,
    /// Calendar date stored as an ISO-8601 `YYYY-MM-DD` string.
    Date,
}

/// Name and type of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub nullable: bool,
}

const fn field(name: &'static str, field_type: FieldType, nullable: bool) -> FieldDescriptor {
    FieldDescriptor {
        name,
        field_type,
        nullable,
    }
}

const AUTHOR_FIELDS: &[FieldDescriptor] = &[
    field("id", FieldType::Integer, false),
    field("name", FieldType::Text, false),
    field("bio", FieldType::Text, true),
    field("birth_date", FieldType::Date, false),
];

const BOOK_FIELDS: &[FieldDescriptor] = &[
    field("id", FieldType::Integer, false),
    field("title", FieldType::Text, false),
    field("description", FieldType::Text, true),
    field("publish_date", FieldType::Date, false),
    field("author_id", FieldType::Integer, false),
];

/// The closed set of entity types stored by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Author,
    Book,
}

impl EntityKind {
    /// All entity kinds, in declaration order.
    pub const ALL: [EntityKind; 2] = [EntityKind::Author, EntityKind::Book];

    /// Model name used as the query cache key prefix (`Author`, `Book`).
    pub fn model_name(&self) -> &'static str {
        match self {
            EntityKind::Author => "Author",
            EntityKind::Book => "Book",
        }
    }

    /// Singular lowercase name, used for single-entity cache keys.
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Author => "author",
            EntityKind::Book => "book",
        }
    }

    /// Plural lowercase name, used for listing cache keys.
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Author => "authors",
            EntityKind::Book => "books",
        }
    }

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        self.plural()
    }

    /// Ordered field descriptors for this entity type.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            EntityKind::Author => AUTHOR_FIELDS,
            EntityKind::Book => BOOK_FIELDS,
        }
    }

    /// Ordered list of valid field names.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|f| f.name).collect()
    }

    /// Looks up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Returns true if `name` is a column of this entity type.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Parses a model name, singular or plural form (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| value == kind.singular() || value == kind.plural())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_name())
    }
}
