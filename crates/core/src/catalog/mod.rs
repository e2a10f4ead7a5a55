mod schema;
mod types;

pub use schema::{EntityKind, FieldDescriptor, FieldType};
pub use types::{Author, AuthorFields, Book, BookFields, Entity};
