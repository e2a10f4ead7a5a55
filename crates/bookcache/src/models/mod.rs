mod listing;

pub use listing::{AuthorList, BookList};
