//! Runtime configuration read from environment variables.

use std::{env, path::PathBuf};

use crate::{Error, money::Commodity};

/// The environment variable holding the path to the SQLite database.
pub const DB_PATH_VAR: &str = "LEDGER_DB_PATH";
/// The environment variable holding the default currency code for new accounts.
pub const CURRENCY_VAR: &str = "LEDGER_CURRENCY";
/// The environment variable holding the path of the debug log file.
pub const LOG_FILE_VAR: &str = "LEDGER_LOG_FILE";

const DEFAULT_DB_PATH: &str = "ledger.db";

/// Settings shared by the binaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File path to the SQLite database.
    pub db_path: PathBuf,

    /// The currency used for accounts and transactions when none is given.
    pub default_currency: Commodity,

    /// If set, debug level logs are also appended to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            default_currency: Commodity::usd(),
            log_file: None,
        }
    }
}

impl Config {
    /// Read the config from the process environment, falling back to the
    /// defaults for unset variables.
    ///
    /// # Errors
    /// Returns an [Error::InvalidCurrencyCode] if `LEDGER_CURRENCY` is not a
    /// valid currency code.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from `lookup`, which maps a variable name to its value.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let db_path = get(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let default_currency = match get(CURRENCY_VAR) {
            Some(code) => Commodity::new(&code)?,
            None => defaults.default_currency,
        };
        let log_file = get(LOG_FILE_VAR).map(PathBuf::from);

        Ok(Self {
            db_path,
            default_currency,
            log_file,
        })
    }
}

#[cfg(test)]
mod config_tests {
    use std::{collections::HashMap, path::PathBuf};

    use crate::{Commodity, Config, Error};

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.db_path, PathBuf::from("ledger.db"));
        assert_eq!(config.default_currency, Commodity::usd());
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("LEDGER_DB_PATH", "/tmp/books.db"),
            ("LEDGER_CURRENCY", "nzd"),
            ("LEDGER_LOG_FILE", "debug.log"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.default_currency, Commodity::new("NZD").unwrap());
        assert_eq!(config.log_file, Some(PathBuf::from("debug.log")));
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config = Config::from_lookup(lookup_from(&[
            ("LEDGER_CURRENCY", "  "),
            ("LEDGER_LOG_FILE", ""),
        ]))
        .unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_currency_fails() {
        let result = Config::from_lookup(lookup_from(&[("LEDGER_CURRENCY", "US-D")]));

        assert_eq!(result, Err(Error::InvalidCurrencyCode("US-D".to_owned())));
    }
}
