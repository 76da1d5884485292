//! Structured errors for registry operations.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Lookup errors
    UnknownOption,
    WrongKind,

    // Validation errors
    InvalidValue,

    // Schema construction errors
    InvalidDefinition,
}

/// The two kinds of node in the option tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Leaf,
    Group,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "an option"),
            NodeKind::Group => write!(f, "an option group"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OptionError {
    #[error("No such option: '{path}'")]
    UnknownOption { path: String },

    #[error("Cannot {operation} '{path}': it is not {expected}")]
    WrongKind {
        path: String,
        operation: &'static str,
        expected: NodeKind,
    },

    #[error("Invalid value{}: {reason}", for_path(.path))]
    InvalidValue {
        path: Option<String>,
        reason: String,
    },

    #[error("Invalid option definition: {0}")]
    Definition(String),
}

fn for_path(path: &Option<String>) -> String {
    match path {
        Some(p) => format!(" for option '{}'", p),
        None => String::new(),
    }
}

impl OptionError {
    pub fn unknown(path: &str) -> Self {
        Self::UnknownOption {
            path: path.to_string(),
        }
    }

    pub fn wrong_kind(path: &str, operation: &'static str, expected: NodeKind) -> Self {
        Self::WrongKind {
            path: path.to_string(),
            operation,
            expected,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: None,
            reason: reason.into(),
        }
    }

    pub fn definition(reason: impl Into<String>) -> Self {
        Self::Definition(reason.into())
    }

    /// Attach the option path to a validator error that lacks one.
    pub fn at_path(self, full_path: &str) -> Self {
        match self {
            Self::InvalidValue { path: None, reason } => Self::InvalidValue {
                path: Some(full_path.to_string()),
                reason,
            },
            other => other,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownOption { .. } => ErrorCode::UnknownOption,
            Self::WrongKind { .. } => ErrorCode::WrongKind,
            Self::InvalidValue { .. } => ErrorCode::InvalidValue,
            Self::Definition(_) => ErrorCode::InvalidDefinition,
        }
    }

    /// The option path the error refers to, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::UnknownOption { path } | Self::WrongKind { path, .. } => Some(path),
            Self::InvalidValue { path, .. } => path.as_deref(),
            Self::Definition(_) => None,
        }
    }
}

/// Serializable error payload for JSON output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&OptionError> for ErrorReport {
    fn from(err: &OptionError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            path: err.path().map(str::to_string),
        }
    }
}

/// Result type for registry operations.
pub type OptionResult<T> = std::result::Result<T, OptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_option() {
        let err = OptionError::unknown("results.foo");
        assert_eq!(err.to_string(), "No such option: 'results.foo'");
        assert_eq!(err.code(), ErrorCode::UnknownOption);
    }

    #[test]
    fn test_display_wrong_kind() {
        let err = OptionError::wrong_kind("results", "set", NodeKind::Leaf);
        assert_eq!(err.to_string(), "Cannot set 'results': it is not an option");
    }

    #[test]
    fn test_at_path_fills_missing_path_only() {
        let err = OptionError::invalid("must be >= 1").at_path("results.arraysize");
        assert_eq!(
            err.to_string(),
            "Invalid value for option 'results.arraysize': must be >= 1"
        );

        let unchanged = OptionError::unknown("x").at_path("y");
        assert_eq!(unchanged.path(), Some("x"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = OptionError::invalid("bad");
        let json = serde_json::to_value(ErrorReport::from(&err)).unwrap();
        assert_eq!(json["code"], "INVALID_VALUE");
        assert_eq!(json["message"], "Invalid value: bad");
        assert!(json.get("path").is_none());
    }
}
