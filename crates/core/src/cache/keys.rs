use crate::catalog::EntityKind;
use crate::query::{JoinSpec, QueryParams};
use crate::storage::Pagination;

/// Returns the cache key for a single entity (`author:12`).
pub fn entity_key(kind: EntityKind, id: i64) -> String {
    format!("{}:{}", kind.singular(), id)
}

/// Returns the cache key for one page of the default listing (`authors:0:10`).
pub fn listing_key(kind: EntityKind, pagination: Pagination) -> String {
    format!(
        "{}:{}:{}",
        kind.plural(),
        pagination.skip,
        pagination.limit
    )
}

/// Returns the pattern matching every listing page of an entity type.
pub fn listing_pattern(kind: EntityKind) -> String {
    format!("{}:*", kind.plural())
}

/// Returns the cache key for a parameterized query.
///
/// Layout: `{Model}:{search}:{skip}:{limit}:{select}:{joins}:{search_fields}`
/// where the search term and every list are JSON-encoded. JSON strings and
/// arrays are self-delimiting, so two different parameter sets can never
/// produce the same key even when the search term contains `:`.
///
/// Select and search-field lists are sorted and de-duplicated first: rows
/// are field maps, so their order never changes the result.
///
/// # Examples
///
/// ```
/// use bookcache_core::cache::query_key;
/// use bookcache_core::catalog::EntityKind;
/// use bookcache_core::query::QueryParams;
///
/// let params = QueryParams::new(EntityKind::Author)
///     .with_search("doe", ["name"])
///     .with_select(["name", "id"]);
/// assert_eq!(
///     query_key(&params),
///     r#"Author:"doe":0:10:["id","name"]:[]:["name"]"#
/// );
/// ```
pub fn query_key(params: &QueryParams) -> String {
    let joins: Vec<JoinSpec> = params.joins.iter().map(JoinSpec::normalized).collect();

    format!(
        "{}:{}:{}:{}:{}:{}:{}",
        params.kind.model_name(),
        to_json(&params.search),
        params.pagination.skip,
        params.pagination.limit,
        to_json(&normalize_names(&params.select)),
        to_json(&joins),
        to_json(&normalize_names(&params.search_fields)),
    )
}

/// Sorts and de-duplicates a list of field names.
pub fn normalize_names(names: &[String]) -> Vec<String> {
    let mut names = names.to_vec();
    names.sort();
    names.dedup();
    names
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    // Strings, integers and string vectors always serialize.
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key() {
        assert_eq!(entity_key(EntityKind::Author, 1), "author:1");
        assert_eq!(entity_key(EntityKind::Book, 42), "book:42");
    }

    #[test]
    fn test_listing_key() {
        assert_eq!(
            listing_key(EntityKind::Author, Pagination::new(0, 10)),
            "authors:0:10"
        );
        assert_eq!(
            listing_key(EntityKind::Book, Pagination::new(20, 10)),
            "books:20:10"
        );
    }

    #[test]
    fn test_listing_pattern_matches_listing_keys_only() {
        let pattern = listing_pattern(EntityKind::Book);
        assert_eq!(pattern, "books:*");
        assert!(crate::cache::pattern_matches(
            &pattern,
            &listing_key(EntityKind::Book, Pagination::new(0, 10))
        ));
        assert!(!crate::cache::pattern_matches(
            &pattern,
            &entity_key(EntityKind::Book, 1)
        ));
        assert!(!crate::cache::pattern_matches(
            &pattern,
            &listing_key(EntityKind::Author, Pagination::new(0, 10))
        ));
    }

    #[test]
    fn test_query_key_defaults() {
        let params = QueryParams::new(EntityKind::Book);
        assert_eq!(query_key(&params), r#"Book:"":0:10:[]:[]:[]"#);
    }

    #[test]
    fn test_query_key_includes_joins() {
        let params = QueryParams::new(EntityKind::Book)
            .with_search("tolkien", ["title"])
            .with_pagination(Pagination::new(10, 5))
            .with_select(["title"])
            .with_join(
                JoinSpec::new(EntityKind::Author, "id", "author_id")
                    .with_select(["name"])
                    .with_search(["name"]),
            );

        assert_eq!(
            query_key(&params),
            r#"Book:"tolkien":10:5:["title"]:[{"model":"Author","join":"id","fk":"author_id","select":["name"],"search":["name"]}]:["title"]"#
        );
    }

    #[test]
    fn test_query_key_ignores_select_order_and_duplicates() {
        let a = QueryParams::new(EntityKind::Author).with_select(["name", "bio", "name"]);
        let b = QueryParams::new(EntityKind::Author).with_select(["bio", "name"]);

        assert_eq!(query_key(&a), query_key(&b));
    }

    #[test]
    fn test_query_key_distinguishes_search_fields() {
        let by_name = QueryParams::new(EntityKind::Author).with_search("x", ["name"]);
        let by_bio = QueryParams::new(EntityKind::Author).with_search("x", ["bio"]);

        assert_ne!(query_key(&by_name), query_key(&by_bio));
    }

    #[test]
    fn test_query_key_escapes_colons_in_search() {
        // Without quoting these two would both render as `Author:a:0:0:10...`.
        let colon = QueryParams::new(EntityKind::Author)
            .with_search("a:0", ["name"])
            .with_pagination(Pagination::new(0, 10));
        let plain = QueryParams::new(EntityKind::Author)
            .with_search("a", ["name"])
            .with_pagination(Pagination::new(0, 0));

        assert_ne!(query_key(&colon), query_key(&plain));
    }

    #[test]
    fn test_query_key_distinguishes_models() {
        let authors = QueryParams::new(EntityKind::Author);
        let books = QueryParams::new(EntityKind::Book);
        assert_ne!(query_key(&authors), query_key(&books));
    }
}
