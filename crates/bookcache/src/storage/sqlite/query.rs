//! SQL generation for validated query plans.
//!
//! Identifiers come from the static schema through [`QueryPlan`], so they are
//! spliced into the statement text. The search pattern and the pagination
//! window are always bound parameters.

use bookcache_core::query::{ColumnRef, QueryPlan};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;

use super::conversions::to_sql_int;

/// SQL text and bound parameters for one query plan.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Page query; its parameters are `page_params`.
    pub page_sql: String,
    pub page_params: Vec<Value>,
    /// Total count under the same filter; its parameters are `count_params`.
    pub count_sql: String,
    pub count_params: Vec<Value>,
}

/// Unicode-aware lowercase; SQLite's own `LOWER` only folds ASCII.
pub const FOLD_CASE_FN: &str = "unicode_lower";

/// Registers [`FOLD_CASE_FN`] on a connection. NULL stays NULL.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
}

/// Escapes `LIKE` wildcards so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn column_sql(column: &ColumnRef) -> String {
    format!("t{}.\"{}\"", column.table, column.field)
}

/// Builds the page and count statements for a plan.
pub fn compile(plan: &QueryPlan) -> CompiledQuery {
    let mut from = format!("\"{}\" AS t0", plan.kind.table());
    for (index, join) in plan.joins.iter().enumerate() {
        let alias = index + 1;
        from.push_str(&format!(
            " INNER JOIN \"{}\" AS t{alias} ON t0.\"{}\" = t{alias}.\"{}\"",
            join.kind.table(),
            join.fk_field,
            join.join_field,
        ));
    }

    let mut filter_params = Vec::new();
    let filter = match &plan.search {
        Some(term) => {
            filter_params.push(Value::Text(format!("%{}%", escape_like(term))));
            let predicates: Vec<String> = plan
                .search_columns
                .iter()
                .map(|column| {
                    format!(
                        "{FOLD_CASE_FN}(CAST({} AS TEXT)) LIKE {FOLD_CASE_FN}(?1) ESCAPE '\\'",
                        column_sql(column)
                    )
                })
                .collect();
            format!(" WHERE ({})", predicates.join(" OR "))
        }
        None => String::new(),
    };

    let select_list: Vec<String> = plan.columns.iter().map(|c| column_sql(&c.column)).collect();
    let next = filter_params.len() + 1;

    let page_sql = format!(
        "SELECT {} FROM {from}{filter} ORDER BY t0.\"id\" LIMIT ?{next} OFFSET ?{}",
        select_list.join(", "),
        next + 1,
    );
    let mut page_params = filter_params.clone();
    page_params.push(Value::Integer(to_sql_int(plan.pagination.limit)));
    page_params.push(Value::Integer(to_sql_int(plan.pagination.skip)));

    CompiledQuery {
        page_sql,
        page_params,
        count_sql: format!("SELECT COUNT(*) FROM {from}{filter}"),
        count_params: filter_params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcache_core::catalog::EntityKind;
    use bookcache_core::query::{JoinSpec, QueryParams};
    use bookcache_core::storage::Pagination;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
    }

    #[test]
    fn test_unfiltered_query() {
        let plan = QueryPlan::build(
            &QueryParams::new(EntityKind::Author)
                .with_select(["name"])
                .with_pagination(Pagination::new(20, 10)),
        )
        .unwrap();

        let compiled = compile(&plan);

        assert_eq!(
            compiled.page_sql,
            "SELECT t0.\"name\" FROM \"authors\" AS t0 ORDER BY t0.\"id\" LIMIT ?1 OFFSET ?2"
        );
        assert_eq!(
            compiled.page_params,
            vec![Value::Integer(10), Value::Integer(20)]
        );
        assert_eq!(compiled.count_sql, "SELECT COUNT(*) FROM \"authors\" AS t0");
        assert!(compiled.count_params.is_empty());
    }

    #[test]
    fn test_joined_search_query() {
        let params = QueryParams::new(EntityKind::Book)
            .with_search("Tolkien", ["title"])
            .with_select(["title"])
            .with_join(
                JoinSpec::new(EntityKind::Author, "id", "author_id")
                    .with_select(["name"])
                    .with_search(["name"]),
            );
        let plan = QueryPlan::build(&params).unwrap();

        let compiled = compile(&plan);

        let from = "\"books\" AS t0 INNER JOIN \"authors\" AS t1 ON t0.\"author_id\" = t1.\"id\"";
        let filter = " WHERE (unicode_lower(CAST(t0.\"title\" AS TEXT)) \
                      LIKE unicode_lower(?1) ESCAPE '\\' \
                      OR unicode_lower(CAST(t1.\"name\" AS TEXT)) \
                      LIKE unicode_lower(?1) ESCAPE '\\')";
        assert_eq!(
            compiled.page_sql,
            format!(
                "SELECT t0.\"title\", t1.\"name\" FROM {from}{filter} ORDER BY t0.\"id\" LIMIT ?2 OFFSET ?3"
            )
        );
        assert_eq!(compiled.count_sql, format!("SELECT COUNT(*) FROM {from}{filter}"));
        assert_eq!(
            compiled.count_params,
            vec![Value::Text("%Tolkien%".to_string())]
        );
        assert_eq!(compiled.page_params.len(), 3);
    }

    #[test]
    fn test_fold_case_function_lowercases_unicode() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT unicode_lower('ÉMILE Ångström')", [], |row| row.get(0))
            .unwrap();
        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL)", [], |row| row.get(0))
            .unwrap();

        assert_eq!(folded, "émile ångström");
        assert_eq!(null, None);
    }

    #[test]
    fn test_huge_pagination_is_clamped() {
        let plan = QueryPlan::build(
            &QueryParams::new(EntityKind::Book).with_pagination(Pagination::new(u64::MAX, 5)),
        )
        .unwrap();

        let compiled = compile(&plan);

        assert_eq!(compiled.page_params[1], Value::Integer(i64::MAX));
    }
}
