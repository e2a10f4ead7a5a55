use serde::{Deserialize, Serialize};

use bookcache_core::catalog::{Author, Book};
use bookcache_core::storage::Page;

/// Response payload for `GET /authors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorList {
    pub total: u64,
    pub authors: Vec<Author>,
}

impl From<Page<Author>> for AuthorList {
    fn from(page: Page<Author>) -> Self {
        Self {
            total: page.total,
            authors: page.items,
        }
    }
}

/// Response payload for `GET /books`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookList {
    pub total: u64,
    pub books: Vec<Book>,
}

impl From<Page<Book>> for BookList {
    fn from(page: Page<Book>) -> Self {
        Self {
            total: page.total,
            books: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcache_core::catalog::AuthorFields;
    use chrono::NaiveDate;

    #[test]
    fn test_author_list_renames_items() {
        let author = AuthorFields::new("John Doe", NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
            .into_author(1);
        let list = AuthorList::from(Page::new(vec![author], 4));

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["authors"][0]["name"], "John Doe");
        assert!(json.get("items").is_none());
    }
}
