use std::collections::HashSet;
use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Runtime configuration, loaded once at startup and injected through app
/// state rather than read ambiently.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port for the HTTP server.
    pub port: u16,
    /// Low-privilege database credential. Serves token introspection and all
    /// ownership-scoped queries.
    pub database_url: String,
    /// Elevated database credential for cross-user admin queries. Optional:
    /// when absent the admin endpoints report a configuration failure after
    /// authorization, never before.
    pub service_database_url: Option<String>,
    /// HS256 key used to verify bearer tokens.
    pub jwt_secret: String,
    /// Administrator email allow-list.
    pub admin_emails: AdminAllowList,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("DUIT_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let service_database_url = env::var("SERVICE_DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let admin_emails = AdminAllowList::parse(&env::var("ADMIN_EMAILS").unwrap_or_default());

        Ok(Self {
            port,
            database_url,
            service_database_url,
            jwt_secret,
            admin_emails,
        })
    }
}

/// The set of administrator email addresses allowed through the admin
/// endpoints. Parsed once from a comma-separated value; matching is
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    entries: HashSet<String>,
}

impl AdminAllowList {
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self { entries }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.entries.contains(&email.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_lowercased_entries() {
        let list = AdminAllowList::parse(" Admin@Example.com , ops@example.com ,, ");
        assert!(list.contains("admin@example.com"));
        assert!(list.contains("ops@example.com"));
        assert!(!list.contains("someone@example.com"));
    }

    #[test]
    fn matching_is_case_insensitive_both_directions() {
        let list = AdminAllowList::parse("admin@example.com");
        assert!(list.contains("Admin@Example.com"));

        let list = AdminAllowList::parse("Admin@Example.com");
        assert!(list.contains("admin@example.com"));
    }

    #[test]
    fn empty_value_yields_empty_list() {
        let list = AdminAllowList::parse("");
        assert!(list.is_empty());
        assert!(!list.contains(""));
    }
}
