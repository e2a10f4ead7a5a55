use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::EntityKind;

/// A record type stored in the catalog and cached by id.
///
/// `Fields` is the full set of user-supplied columns: everything except the
/// store-assigned `id`. Updates always replace every field.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Fields: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    const KIND: EntityKind;

    /// Store-assigned identifier.
    fn id(&self) -> i64;

    /// Returns the user-supplied fields of this record.
    fn fields(&self) -> Self::Fields;

    /// Builds a record from store-assigned `id` and its fields.
    fn from_fields(id: i64, fields: Self::Fields) -> Self;
}

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub birth_date: NaiveDate,
}

/// Writable author columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorFields {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    pub birth_date: NaiveDate,
}

impl AuthorFields {
    /// Creates author fields with the given name and birth date.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            bio: None,
            birth_date,
        }
    }

    /// Sets the biography.
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Builds the stored record once the store has assigned an id.
    pub fn into_author(self, id: i64) -> Author {
        Author {
            id,
            name: self.name,
            bio: self.bio,
            birth_date: self.birth_date,
        }
    }
}

impl Entity for Author {
    type Fields = AuthorFields;

    const KIND: EntityKind = EntityKind::Author;

    fn id(&self) -> i64 {
        self.id
    }

    fn fields(&self) -> AuthorFields {
        AuthorFields {
            name: self.name.clone(),
            bio: self.bio.clone(),
            birth_date: self.birth_date,
        }
    }

    fn from_fields(id: i64, fields: AuthorFields) -> Self {
        fields.into_author(id)
    }
}

/// A book, owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub publish_date: NaiveDate,
    pub author_id: i64,
}

/// Writable book columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub publish_date: NaiveDate,
    pub author_id: i64,
}

impl BookFields {
    /// Creates book fields for the given author.
    pub fn new(title: impl Into<String>, publish_date: NaiveDate, author_id: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            publish_date,
            author_id,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the stored record once the store has assigned an id.
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            description: self.description,
            publish_date: self.publish_date,
            author_id: self.author_id,
        }
    }
}

impl Entity for Book {
    type Fields = BookFields;

    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> i64 {
        self.id
    }

    fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            description: self.description.clone(),
            publish_date: self.publish_date,
            author_id: self.author_id,
        }
    }

    fn from_fields(id: i64, fields: BookFields) -> Self {
        fields.into_book(id)
    }
}
