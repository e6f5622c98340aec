//! FAN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FanError>;

/// Top-level error type for the fan dashboard.
#[derive(Debug, Error)]
pub enum FanError {
    #[error("[FAN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FAN-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FAN-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FAN-2001] sensor tree {path} not found (is the {module} kernel module loaded?)")]
    ModuleNotLoaded { module: String, path: PathBuf },

    #[error("[FAN-2002] failed to read sensor {path}: {details}")]
    SensorRead { path: PathBuf, details: String },

    #[error("[FAN-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FAN-3001] terminal failure: {details}")]
    Terminal { details: String },

    #[error("[FAN-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FAN-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl FanError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FAN-1001",
            Self::MissingConfig { .. } => "FAN-1002",
            Self::ConfigParse { .. } => "FAN-1003",
            Self::ModuleNotLoaded { .. } => "FAN-2001",
            Self::SensorRead { .. } => "FAN-2002",
            Self::Serialization { .. } => "FAN-2101",
            Self::Terminal { .. } => "FAN-3001",
            Self::Io { .. } => "FAN-3002",
            Self::Runtime { .. } => "FAN-3900",
        }
    }

    /// Whether the error was caused by configuration (bad flag value, bad file).
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. }
        )
    }

    /// Whether the error came from the sensor tree. These end the dashboard:
    /// rendering stale values as if they were live would be misleading.
    #[must_use]
    pub const fn is_acquisition(&self) -> bool {
        matches!(self, Self::ModuleNotLoaded { .. } | Self::SensorRead { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<std::io::Error> for FanError {
    /// Terminal writes have no path; they surface as terminal failures.
    fn from(value: std::io::Error) -> Self {
        Self::Terminal {
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for FanError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for FanError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<FanError> {
        vec![
            FanError::InvalidConfig {
                details: String::new(),
            },
            FanError::MissingConfig {
                path: PathBuf::new(),
            },
            FanError::ConfigParse {
                context: "",
                details: String::new(),
            },
            FanError::ModuleNotLoaded {
                module: String::new(),
                path: PathBuf::new(),
            },
            FanError::SensorRead {
                path: PathBuf::new(),
                details: String::new(),
            },
            FanError::Serialization {
                context: "",
                details: String::new(),
            },
            FanError::Terminal {
                details: String::new(),
            },
            FanError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            FanError::Runtime {
                details: String::new(),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(FanError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_display_includes_code() {
        for err in all_variants() {
            let msg = err.to_string();
            assert!(
                msg.contains(err.code()),
                "display should contain error code {}: {msg}",
                err.code()
            );
        }
    }

    #[test]
    fn module_not_loaded_names_module() {
        let err = FanError::ModuleNotLoaded {
            module: "ec_fan".to_string(),
            path: PathBuf::from("/sys/devices/platform/ec_fan"),
        };
        let msg = err.to_string();
        assert!(msg.contains("ec_fan kernel module"), "{msg}");
        assert!(err.is_acquisition());
        assert!(!err.is_config());
    }

    #[test]
    fn classification_is_disjoint() {
        for err in all_variants() {
            assert!(
                !(err.is_config() && err.is_acquisition()),
                "{} classified twice",
                err.code()
            );
        }
    }

    #[test]
    fn io_convenience_constructor() {
        let err = FanError::io(
            "/tmp/fan1_rpm",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "FAN-3002");
        assert!(err.to_string().contains("/tmp/fan1_rpm"));
    }

    #[test]
    fn bare_io_error_becomes_terminal_error() {
        let err: FanError = std::io::Error::other("broken pipe").into();
        assert_eq!(err.code(), "FAN-3001");
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: FanError = json_err.into();
        assert_eq!(err.code(), "FAN-2101");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: FanError = toml_err.into();
        assert_eq!(err.code(), "FAN-1003");
    }
}
