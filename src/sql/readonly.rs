//! Read-only guard for raw statements.
//!
//! The guard inspects only the statement's leading keyword after skipping
//! whitespace and comments. It is deliberately syntactic and best-effort,
//! not a security boundary: it refuses anything that is not SELECT or an
//! allow-listed read-only pragma, which also refuses CTE-led reads
//! (`WITH ... SELECT`), and it never parses past the first keyword.

use crate::error::{DbError, DbResult};

/// Pragmas that only read engine state and may run in read-only mode.
/// A pragma in assignment form (`PRAGMA name = value`) changes state and is
/// never allowed.
const READ_ONLY_PRAGMAS: &[&str] = &[
    "table_info",
    "table_xinfo",
    "table_list",
    "index_list",
    "index_info",
    "foreign_key_list",
    "database_list",
];

/// Skip leading whitespace, `--` line comments, and `/* */` block comments.
///
/// Returns `None` when nothing but trivia remains (including an unterminated
/// block comment).
fn skip_trivia(sql: &str) -> Option<&str> {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(stripped) = rest.strip_prefix("--") {
            rest = &stripped[stripped.find('\n')? + 1..];
        } else if let Some(stripped) = rest.strip_prefix("/*") {
            rest = &stripped[stripped.find("*/")? + 2..];
        } else {
            break;
        }
    }
    if rest.is_empty() { None } else { Some(rest) }
}

/// Extract the first SQL keyword and the text following it.
fn split_leading_keyword(sql: &str) -> Option<(&str, &str)> {
    let rest = skip_trivia(sql)?;
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if end == 0 {
        None
    } else {
        Some((&rest[..end], &rest[end..]))
    }
}

/// Extract the statement's leading keyword, if any.
pub fn leading_keyword(sql: &str) -> Option<&str> {
    split_leading_keyword(sql).map(|(keyword, _)| keyword)
}

/// Check whether the leading keyword starts a row-returning statement.
///
/// Used by the raw executor to decide between the fetch and execute paths.
pub fn returns_rows(sql: &str) -> bool {
    match leading_keyword(sql) {
        Some(keyword) => ["SELECT", "PRAGMA", "VALUES", "WITH", "EXPLAIN"]
            .iter()
            .any(|k| keyword.eq_ignore_ascii_case(k)),
        None => false,
    }
}

/// Enforce the read-only contract on a raw statement.
pub fn ensure_read_only(sql: &str) -> DbResult<()> {
    let Some((keyword, rest)) = split_leading_keyword(sql) else {
        return Err(DbError::syntax_error(
            "statement is empty or contains only comments",
        ));
    };

    if keyword.eq_ignore_ascii_case("SELECT") {
        return Ok(());
    }
    if keyword.eq_ignore_ascii_case("PRAGMA") {
        return check_pragma(rest);
    }

    Err(DbError::write_in_read_only_mode(
        keyword.to_ascii_uppercase(),
    ))
}

/// Allow a pragma only when it is in the read-only allow-list and not in
/// assignment form. Handles an optional schema qualifier
/// (`PRAGMA main.table_info(...)`).
fn check_pragma(after_keyword: &str) -> DbResult<()> {
    let rest = after_keyword.trim_start();
    let (mut name, mut after) = split_pragma_ident(rest);

    if after.trim_start().starts_with('.') {
        let qualified = after.trim_start()[1..].trim_start();
        (name, after) = split_pragma_ident(qualified);
    }

    if name.is_empty() {
        return Err(DbError::write_in_read_only_mode("PRAGMA"));
    }
    if after.trim_start().starts_with('=') {
        return Err(DbError::write_in_read_only_mode(format!(
            "PRAGMA {name} ="
        )));
    }

    let lower = name.to_ascii_lowercase();
    if READ_ONLY_PRAGMAS.contains(&lower.as_str()) {
        Ok(())
    } else {
        Err(DbError::write_in_read_only_mode(format!("PRAGMA {name}")))
    }
}

fn split_pragma_ident(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(text.len());
    (&text[..end], &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_allowed() {
        assert!(ensure_read_only("SELECT * FROM users").is_ok());
        assert!(ensure_read_only("  select 1").is_ok());
        assert!(ensure_read_only("\n\tSELECT name FROM t").is_ok());
    }

    #[test]
    fn test_comments_skipped() {
        assert!(ensure_read_only("-- leading comment\nSELECT 1").is_ok());
        assert!(ensure_read_only("/* block */ SELECT 1").is_ok());
        assert!(ensure_read_only("/* a */ -- b\n /* c */ SELECT 1").is_ok());
    }

    #[test]
    fn test_writes_refused() {
        for sql in [
            "DROP TABLE t",
            "drop table t",
            "INSERT INTO t VALUES (1)",
            "UPDATE t SET a = 1",
            "DELETE FROM t",
            "CREATE TABLE t (a INTEGER)",
            "ALTER TABLE t ADD COLUMN b TEXT",
            "VACUUM",
            "ATTACH DATABASE 'x' AS y",
        ] {
            let err = ensure_read_only(sql).unwrap_err();
            assert!(
                matches!(err, DbError::WriteInReadOnlyMode { .. }),
                "expected refusal for {sql:?}"
            );
        }
    }

    #[test]
    fn test_refused_keyword_reported_uppercase() {
        let err = ensure_read_only("drop table t").unwrap_err();
        assert!(matches!(err, DbError::WriteInReadOnlyMode { keyword } if keyword == "DROP"));
    }

    #[test]
    fn test_cte_refused_by_design() {
        // The guard never parses past the first keyword, so CTE-led reads
        // are refused along with CTE-disguised writes.
        let err = ensure_read_only("WITH x AS (SELECT 1) SELECT * FROM x").unwrap_err();
        assert!(matches!(err, DbError::WriteInReadOnlyMode { .. }));
    }

    #[test]
    fn test_read_only_pragmas_allowed() {
        assert!(ensure_read_only("PRAGMA table_info(users)").is_ok());
        assert!(ensure_read_only("pragma table_info(users)").is_ok());
        assert!(ensure_read_only("PRAGMA main.table_info(users)").is_ok());
        assert!(ensure_read_only("PRAGMA database_list").is_ok());
        assert!(ensure_read_only("PRAGMA foreign_key_list(orders)").is_ok());
    }

    #[test]
    fn test_state_changing_pragmas_refused() {
        let err = ensure_read_only("PRAGMA journal_mode = WAL").unwrap_err();
        assert!(matches!(err, DbError::WriteInReadOnlyMode { .. }));

        // not in the allow-list, even though reading it would be harmless
        let err = ensure_read_only("PRAGMA journal_mode").unwrap_err();
        assert!(matches!(err, DbError::WriteInReadOnlyMode { .. }));

        let err = ensure_read_only("PRAGMA table_info = 1").unwrap_err();
        assert!(matches!(err, DbError::WriteInReadOnlyMode { .. }));
    }

    #[test]
    fn test_empty_statement_is_syntax_error() {
        for sql in ["", "   ", "-- only a comment", "/* unterminated"] {
            let err = ensure_read_only(sql).unwrap_err();
            assert!(
                matches!(err, DbError::SyntaxError { .. }),
                "expected syntax error for {sql:?}"
            );
        }
    }

    #[test]
    fn test_leading_keyword_extraction() {
        assert_eq!(leading_keyword("SELECT 1"), Some("SELECT"));
        assert_eq!(leading_keyword("  /* c */ insert into t"), Some("insert"));
        assert_eq!(leading_keyword("SELECT* FROM t"), Some("SELECT"));
        assert_eq!(leading_keyword("123"), None);
        assert_eq!(leading_keyword(""), None);
    }

    #[test]
    fn test_returns_rows_classification() {
        assert!(returns_rows("SELECT 1"));
        assert!(returns_rows("pragma table_info(t)"));
        assert!(returns_rows("VALUES (1), (2)"));
        assert!(returns_rows("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(!returns_rows("INSERT INTO t VALUES (1)"));
        assert!(!returns_rows("DROP TABLE t"));
        assert!(!returns_rows(""));
    }
}
