//! Connection target recovered from client-tool arguments.

use url::Url;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DATABASE: &str = "postgres";

/// Where a `psql`/`pg_dump` invocation connects to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: Option<String>,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            username: None,
        }
    }
}

impl ConnectionTarget {
    /// Inspect `args` for a connection URL in `--dbname`, falling back to
    /// the discrete `--host`/`--port`/`--username` flags.
    pub fn from_args(args: &[String]) -> Self {
        let dbname = flag_value(args, &["--dbname", "-d"]);
        if let Some(target) = dbname.and_then(parse_connection_url) {
            return target;
        }

        let mut target = Self::default();
        target.host = flag_value(args, &["--host", "-h"]).map(str::to_string);
        target.username = flag_value(args, &["--username", "-U"]).map(str::to_string);
        if let Some(port) = flag_value(args, &["--port", "-p"]).and_then(|p| p.parse().ok()) {
            target.port = port;
        }
        if let Some(db) = dbname.filter(|d| !d.is_empty()) {
            target.database = db.to_string();
        }
        target
    }
}

/// Value of the first of `names` present, as `--flag value` or `--flag=value`
fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        for name in names {
            if arg == name {
                return iter.next().map(String::as_str);
            }
            if let Some(value) = arg.strip_prefix(name).and_then(|r| r.strip_prefix('=')) {
                return Some(value);
            }
        }
    }
    None
}

/// Parse `postgresql://`, `postgres://` or scheme-less `user@host/db` targets
fn parse_connection_url(value: &str) -> Option<ConnectionTarget> {
    let normalized = if value.contains("://") {
        value.to_string()
    } else if value.contains('@') {
        format!("postgresql://{}", value)
    } else {
        return None;
    };

    let url = Url::parse(&normalized).ok()?;
    if !matches!(url.scheme(), "postgresql" | "postgres") {
        return None;
    }

    let database = url.path().trim_start_matches('/');
    Some(ConnectionTarget {
        host: url.host_str().filter(|h| !h.is_empty()).map(str::to_string),
        port: url.port().unwrap_or(DEFAULT_PORT),
        database: if database.is_empty() {
            DEFAULT_DATABASE.to_string()
        } else {
            database.to_string()
        },
        username: Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_url_target() {
        let t = ConnectionTarget::from_args(&args(&[
            "-s",
            "--dbname",
            "postgresql://remote_user@db.example.com:5433/app?sslmode=disable",
        ]));
        assert_eq!(t.host.as_deref(), Some("db.example.com"));
        assert_eq!(t.port, 5433);
        assert_eq!(t.database, "app");
        assert_eq!(t.username.as_deref(), Some("remote_user"));
    }

    #[test]
    fn test_url_defaults() {
        let t = ConnectionTarget::from_args(&args(&["--dbname=postgres://me@host"]));
        assert_eq!(t.port, DEFAULT_PORT);
        assert_eq!(t.database, DEFAULT_DATABASE);
        assert_eq!(t.host.as_deref(), Some("host"));
    }

    #[test]
    fn test_schemeless_target() {
        let t = ConnectionTarget::from_args(&args(&["--dbname", "me@host/db"]));
        assert_eq!(t.username.as_deref(), Some("me"));
        assert_eq!(t.database, "db");
    }

    #[test]
    fn test_discrete_flags() {
        let t = ConnectionTarget::from_args(&args(&[
            "--host", "127.0.0.1", "--username", "postgres", "--dbname", "local_db", "-p", "6543",
        ]));
        assert_eq!(t.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(t.username.as_deref(), Some("postgres"));
        assert_eq!(t.database, "local_db");
        assert_eq!(t.port, 6543);
    }

    #[test]
    fn test_nothing_known() {
        assert_eq!(ConnectionTarget::from_args(&[]), ConnectionTarget::default());
    }
}
