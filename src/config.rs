//! Configuration for the MiniDB shell
//!
//! Built from defaults, then the `MINIDB_LOG` environment variable, then
//! command-line flags.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "MINIDB_LOG";

/// Log filter used when nothing else is configured
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Shell configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Snapshot file loaded at start and written on save
    pub snapshot_path: Option<PathBuf>,
    /// Save after every successful modifying statement
    pub autosave: bool,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            autosave: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Enable or disable autosave
    pub fn autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Set the log filter
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Defaults overridden by `MINIDB_LOG`, if set
    pub fn from_env() -> Self {
        match std::env::var(LOG_ENV) {
            Ok(filter) if !filter.trim().is_empty() => Self::new().log_filter(filter),
            _ => Self::new(),
        }
    }

    /// Parse command-line arguments (without the program name)
    ///
    /// Flags override the environment.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        Self::from_env().apply_args(args)
    }

    fn apply_args(mut self, args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--snapshot" | "-s" => {
                    let path = args.next().ok_or_else(|| missing_value(&arg))?;
                    self = self.snapshot_path(path);
                }
                "--no-autosave" => self = self.autosave(false),
                "--log" => {
                    let filter = args.next().ok_or_else(|| missing_value(&arg))?;
                    self = self.log_filter(filter);
                }
                other => {
                    return Err(Error::Syntax(format!(
                        "unknown command-line option '{}'",
                        other
                    )))
                }
            }
        }

        Ok(self)
    }
}

fn missing_value(flag: &str) -> Error {
    Error::Syntax(format!("option '{}' requires a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::new().apply_args(Vec::new()).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.autosave);
        assert_eq!(config.log_filter, "warn");
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_flags() {
        let config = Config::new()
            .apply_args(args(&["-s", "data.json", "--no-autosave", "--log", "minidb=debug"]))
            .unwrap();

        assert_eq!(config.snapshot_path, Some(PathBuf::from("data.json")));
        assert!(!config.autosave);
        assert_eq!(config.log_filter, "minidb=debug");

        let config = Config::new()
            .apply_args(args(&["--snapshot", "a.json", "--snapshot", "b.json"]))
            .unwrap();
        assert_eq!(config.snapshot_path, Some(PathBuf::from("b.json")));
    }

    #[test]
    fn test_bad_flags() {
        let err = Config::new().apply_args(args(&["--port", "1"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("--port"));

        let err = Config::new().apply_args(args(&["--snapshot"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("requires a value"));
    }
}
