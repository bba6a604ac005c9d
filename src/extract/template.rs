//! Query template files.
//!
//! A template is one SQL statement preceded by header comments naming
//! where its result belongs:
//!
//! ```sql
//! -- @database local_db
//! -- @schema bookstore_ops
//! -- @table orders
//! SELECT * FROM bookstore_ops.orders WHERE created_at > now() - interval '30 days';
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_SCHEMA: &str = "public";

static DATABASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-- @database[ \t]+(.+)").unwrap());
static SCHEMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-- @schema[ \t]+(.+)").unwrap());
static TABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-- @table[ \t]+(.+)").unwrap());

/// Header values of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateHeaders {
    pub database: Option<String>,
    pub schema: String,
    pub table: Option<String>,
}

impl TemplateHeaders {
    pub fn parse(content: &str) -> Self {
        Self {
            database: header(&DATABASE_RE, content),
            schema: header(&SCHEMA_RE, content).unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            table: header(&TABLE_RE, content),
        }
    }
}

fn header(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .map(|c| c[1].trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The statement of a template with comments and semicolons removed, on one line
pub fn query_body(content: &str) -> String {
    content
        .lines()
        .map(|line| match line.find("--") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join(" ")
        .replace(';', "")
        .trim()
        .to_string()
}

/// Starter template for `table`, addressed to `database`
pub fn scaffold(database: &str, schema: &str, table: &str) -> String {
    format!(
        "-- @database {database}\n\
         -- @schema {schema}\n\
         -- @table {table}\n\
         \n\
         SELECT *\n\
         FROM {schema}.{table}\n\
         LIMIT 100;\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "-- @database local_db\n-- @table orders\nSELECT id, total -- money\nFROM orders;\n";

    #[test]
    fn test_headers() {
        let headers = TemplateHeaders::parse(TEMPLATE);
        assert_eq!(headers.database.as_deref(), Some("local_db"));
        assert_eq!(headers.schema, DEFAULT_SCHEMA);
        assert_eq!(headers.table.as_deref(), Some("orders"));
    }

    #[test]
    fn test_missing_headers() {
        let headers = TemplateHeaders::parse("SELECT 1;");
        assert!(headers.database.is_none());
        assert!(headers.table.is_none());
    }

    #[test]
    fn test_query_body_strips_comments_and_semicolons() {
        assert_eq!(query_body(TEMPLATE), "SELECT id, total  FROM orders");
    }

    #[test]
    fn test_scaffold_round_trips_headers() {
        let text = scaffold("local_db", "ops", "users");
        let headers = TemplateHeaders::parse(&text);
        assert_eq!(headers.database.as_deref(), Some("local_db"));
        assert_eq!(headers.schema, "ops");
        assert_eq!(headers.table.as_deref(), Some("users"));
        assert_eq!(query_body(&text), "SELECT * FROM ops.users LIMIT 100");
    }
}
