use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Salesforce credentials are loaded separately via
/// [`crmsync_salesforce::SalesforceConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for an in-flight scheduled sync (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Time between scheduled syncs (default: 30 minutes).
    pub sync_interval: Duration,
    /// Whether the background sync loop runs at all (default: `true`).
    /// Manual triggers work either way.
    pub sync_enabled: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `SYNC_INTERVAL_MINUTES` | `30`                       |
    /// | `SYNC_ENABLED`          | `true`                     |
    ///
    /// # Panics
    ///
    /// Panics if a numeric or boolean variable does not parse, or if
    /// `SYNC_INTERVAL_MINUTES` is zero.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let sync_interval_minutes: u64 = std::env::var("SYNC_INTERVAL_MINUTES")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SYNC_INTERVAL_MINUTES must be a valid u64");
        assert!(
            sync_interval_minutes > 0,
            "SYNC_INTERVAL_MINUTES must be greater than zero"
        );

        let sync_enabled: bool = std::env::var("SYNC_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SYNC_ENABLED must be `true` or `false`");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            sync_interval: Duration::from_secs(sync_interval_minutes * 60),
            sync_enabled,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
