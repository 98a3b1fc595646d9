//! Error Types
//!
//! Host faults are per-entity and never abort a pass; configuration errors
//! only surface when loading a file.

use thiserror::Error;

/// A fault reported by the host while reading or writing one entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// The handle no longer refers to a live instance
    #[error("stale handle")]
    StaleHandle,
    /// The entity lacks a sub-component the operation needs
    #[error("missing component: {0}")]
    MissingComponent(&'static str),
    /// The host refused the write
    #[error("write rejected: {0}")]
    Rejected(String),
}

impl HostError {
    /// Stable short name used to group identical faults.
    pub fn kind(&self) -> &'static str {
        match self {
            HostError::StaleHandle => "stale_handle",
            HostError::MissingComponent(name) => *name,
            HostError::Rejected(_) => "rejected",
        }
    }
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[from] pub toml::ser::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_kind() {
        assert_eq!(HostError::StaleHandle.kind(), "stale_handle");
        assert_eq!(HostError::MissingComponent("head").kind(), "head");
        assert_eq!(HostError::Rejected("locked".into()).kind(), "rejected");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            HostError::MissingComponent("loot").to_string(),
            "missing component: loot"
        );
    }
}
