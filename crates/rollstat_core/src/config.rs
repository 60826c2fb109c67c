//! Environment-driven core configuration.
//!
//! Environment variables:
//! - `ROLLSTAT_DB_PATH` (default: `rollstat.sqlite3`; falls back to
//!   `DATABASE_URL`, with an optional `sqlite://` prefix)
//! - `ROLLSTAT_LOG_LEVEL` (default: [`default_log_level`])
//! - `ROLLSTAT_LOG_DIR` (unset: file logging stays off)
//! - `ROLLSTAT_REFERENCE_YEAR` (default: 2024, clamped to 1..=9999)

use crate::logging::default_log_level;
use crate::service::date_provider::clamp_reference_year;
use log::warn;
use std::env;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "rollstat.sqlite3";
const DEFAULT_REFERENCE_YEAR: i32 = 2024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the roll store.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
    /// Year that default add dates are drawn from.
    pub reference_year: i32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. Unparseable years fall back to
    /// the default and out-of-range years are clamped, both with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let db_path = get("ROLLSTAT_DB_PATH")
            .or_else(|| get("DATABASE_URL").map(|url| strip_sqlite_scheme(&url)))
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        Self {
            db_path,
            log_level: get("ROLLSTAT_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: get("ROLLSTAT_LOG_DIR").map(PathBuf::from),
            reference_year: get("ROLLSTAT_REFERENCE_YEAR")
                .map_or(defaults.reference_year, |raw| {
                    parse_reference_year(&raw, defaults.reference_year)
                }),
        }
    }
}

fn parse_reference_year(raw: &str, default: i32) -> i32 {
    let Ok(year) = raw.parse::<i32>() else {
        warn!(
            "event=config_load module=config status=fallback key=ROLLSTAT_REFERENCE_YEAR value={raw} used={default}"
        );
        return default;
    };
    let clamped = clamp_reference_year(year);
    if clamped != year {
        warn!(
            "event=config_load module=config status=clamped key=ROLLSTAT_REFERENCE_YEAR value={year} used={clamped}"
        );
    }
    clamped
}

fn strip_sqlite_scheme(url: &str) -> String {
    // `sqlite:///site.db` is a relative path, `sqlite:////abs/site.db` absolute.
    url.strip_prefix("sqlite:///")
        .or_else(|| url.strip_prefix("sqlite://"))
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CoreConfig::from_lookup(|_| None);
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.db_path, PathBuf::from("rollstat.sqlite3"));
        assert_eq!(config.reference_year, 2024);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("ROLLSTAT_DB_PATH", "/var/lib/rollstat/rolls.db"),
            ("ROLLSTAT_LOG_LEVEL", "warn"),
            ("ROLLSTAT_LOG_DIR", "/var/log/rollstat"),
            ("ROLLSTAT_REFERENCE_YEAR", "2025"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/rollstat/rolls.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/rollstat")));
        assert_eq!(config.reference_year, 2025);
    }

    #[test]
    fn database_url_is_used_as_fallback() {
        let config = CoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite:///site.db")]));
        assert_eq!(config.db_path, PathBuf::from("site.db"));

        let absolute =
            CoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite:////data/site.db")]));
        assert_eq!(absolute.db_path, PathBuf::from("/data/site.db"));
    }

    #[test]
    fn blank_and_malformed_values_fall_back() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("ROLLSTAT_DB_PATH", "   "),
            ("ROLLSTAT_REFERENCE_YEAR", "next year"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("rollstat.sqlite3"));
        assert_eq!(config.reference_year, 2024);
    }

    #[test]
    fn out_of_range_reference_year_is_clamped() {
        let far_future =
            CoreConfig::from_lookup(lookup_from(&[("ROLLSTAT_REFERENCE_YEAR", "120000")]));
        assert_eq!(far_future.reference_year, 9999);

        let negative_year = CoreConfig::from_lookup(lookup_from(&[("ROLLSTAT_REFERENCE_YEAR", "-3")]));
        assert_eq!(negative_year.reference_year, 1);

        let overflow =
            CoreConfig::from_lookup(lookup_from(&[("ROLLSTAT_REFERENCE_YEAR", "99999999999")]));
        assert_eq!(overflow.reference_year, 2024);
    }
}
