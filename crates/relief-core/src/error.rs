//! Error types for Relief

use thiserror::Error;

/// The main error type for Relief operations
#[derive(Debug, Error)]
pub enum ReliefError {
    /// A descriptor, elevation, or shader resource could not be fetched
    #[error("Failed to load resource '{path}': {reason}")]
    ResourceLoad { path: String, reason: String },

    /// Data was fetched but its shape does not fit the terrain grid
    #[error("Data shape error: {0}")]
    DataShape(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl ReliefError {
    pub fn resource_load(path: impl Into<String>, reason: impl ToString) -> Self {
        ReliefError::ResourceLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the transport-level failure kind
    pub fn is_resource_load(&self) -> bool {
        matches!(self, ReliefError::ResourceLoad { .. })
    }

    pub fn is_data_shape(&self) -> bool {
        matches!(self, ReliefError::DataShape(_))
    }
}

/// Result type alias for Relief operations
pub type Result<T> = std::result::Result<T, ReliefError>;

impl From<serde_json::Error> for ReliefError {
    fn from(err: serde_json::Error) -> Self {
        ReliefError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ReliefError {
    fn from(err: toml::de::Error) -> Self {
        ReliefError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_load_message_names_path() {
        let err = ReliefError::resource_load("e.bin", "HTTP status 404");
        assert!(err.is_resource_load());
        assert_eq!(
            err.to_string(),
            "Failed to load resource 'e.bin': HTTP status 404"
        );
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: ReliefError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ReliefError::Parse(_)));
    }
}
