use anyhow::{Context, Result, anyhow, bail};
use dotenvy::dotenv;
use std::env;
use tracing::Level;

/// Behaviour switches for the gaps the record rules leave open.
/// Every flag defaults to `false`, which keeps the historical behaviour.
#[derive(Clone, Copy, Debug, Default)]
pub struct Policy {
    /// Reject an employee update whose email belongs to another employee
    pub recheck_email_on_update: bool,
    /// Remove an employee's attendance when the employee is deleted
    pub cascade_attendance_on_delete: bool,
    /// Create unique indexes on employees.email and employees.employee_id
    pub employee_unique_indexes: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_tls: bool,
    pub server_addr: String,
    pub log_dir: String,
    pub log_level: Level,
    pub policy: Policy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup("MONGO_URI")
            .filter(|v| !v.trim().is_empty())
            .context("MONGO_URI must be set")?;

        let log_level = match lookup("LOG_LEVEL") {
            Some(v) => v
                .parse::<Level>()
                .map_err(|_| anyhow!("LOG_LEVEL has an invalid value: {v}"))?,
            None => Level::DEBUG,
        };

        Ok(Self {
            mongo_uri,
            mongo_tls: flag(&lookup, "MONGO_TLS", true)?,
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level,
            policy: Policy {
                recheck_email_on_update: flag(&lookup, "RECHECK_EMAIL_ON_UPDATE", false)?,
                cascade_attendance_on_delete: flag(&lookup, "CASCADE_ATTENDANCE_ON_DELETE", false)?,
                employee_unique_indexes: flag(&lookup, "EMPLOYEE_UNIQUE_INDEXES", false)?,
            },
        })
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_keep_source_behaviour() {
        let config = Config::from_lookup(lookup_from(&[("MONGO_URI", "mongodb://localhost")]))
            .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8000");
        assert!(config.mongo_tls);
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(!config.policy.recheck_email_on_update);
        assert!(!config.policy.cascade_attendance_on_delete);
        assert!(!config.policy.employee_unique_indexes);
    }

    #[test]
    fn missing_uri_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MONGO_URI", "  ")])).is_err());
    }

    #[test]
    fn flags_and_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGO_URI", "mongodb://db"),
            ("MONGO_TLS", "off"),
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("LOG_LEVEL", "warn"),
            ("RECHECK_EMAIL_ON_UPDATE", "YES"),
            ("CASCADE_ATTENDANCE_ON_DELETE", "1"),
            ("EMPLOYEE_UNIQUE_INDEXES", "true"),
        ]))
        .unwrap();

        assert!(!config.mongo_tls);
        assert_eq!(config.server_addr, "127.0.0.1:9000");
        assert_eq!(config.log_level, Level::WARN);
        assert!(config.policy.recheck_email_on_update);
        assert!(config.policy.cascade_attendance_on_delete);
        assert!(config.policy.employee_unique_indexes);
    }

    #[test]
    fn bad_flag_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("MONGO_URI", "mongodb://db"),
            ("MONGO_TLS", "maybe"),
        ]));
        assert!(result.is_err());
    }
}
