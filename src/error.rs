//! Error types for botgate.

use std::fmt;
use thiserror::Error;

/// Error type for botgate operations.
///
/// Verification itself never returns this type: every failure inside the
/// pipeline becomes a denied verdict. It is only produced while loading
/// configuration or constructing a verifier.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for botgate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reason a bot's range source could not be turned into ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeErrorKind {
    /// No range file exists for the bot
    FileNotFound,
    /// The range file is not valid JSON
    InvalidJson,
    /// The JSON does not have the `{ prefixes: [...] }` shape
    InvalidStructure,
    /// The file parsed but yielded no usable prefix
    NoRanges,
    /// Any other read failure
    LoadFailed,
}

impl RangeErrorKind {
    /// Get the wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeErrorKind::FileNotFound => "file_not_found",
            RangeErrorKind::InvalidJson => "invalid_json",
            RangeErrorKind::InvalidStructure => "invalid_structure",
            RangeErrorKind::NoRanges => "no_ranges",
            RangeErrorKind::LoadFailed => "load_failed",
        }
    }
}

impl fmt::Display for RangeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A range load failure captured on a cache entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RangeLoadError {
    pub kind: RangeErrorKind,
    pub message: String,
}

impl RangeLoadError {
    pub fn new(kind: RangeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Data-quality problem found while loading the bot pattern table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The table itself could not be read
    #[error("failed to read bot table: {0}")]
    Unreadable(String),

    /// The table is not `{ "bots": [...] }`
    #[error("malformed bot table: {0}")]
    MalformedTable(String),

    /// An entry without a usable `name`
    #[error("bot entry #{index} has no name")]
    MissingName { index: usize },

    /// An entry whose `patterns` field is not a list of strings
    #[error("bot '{name}' has no pattern list")]
    InvalidPatternList { name: String },

    /// An entry with a `type` other than `search` or `ai`
    #[error("bot '{name}' has unknown type '{bot_type}'")]
    UnknownType { name: String, bot_type: String },

    /// A pattern that does not compile
    #[error("bot '{name}' pattern '{pattern}' does not compile: {reason}")]
    InvalidPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    /// Every pattern of an entry was rejected
    #[error("bot '{name}' has no usable patterns and was dropped")]
    NoUsablePatterns { name: String },
}

/// Error type for gate prop validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// User agent or IP address missing
    #[error("userAgent and ipAddress are required")]
    MissingRequiredProps,

    /// Display missing
    #[error("display is required (\"show\" or \"hide\")")]
    MissingDisplay,

    /// Role missing
    #[error("role is required (\"bot\" or \"user\")")]
    MissingRole,

    /// Display is not `show` or `hide`
    #[error("display must be either \"show\" or \"hide\"")]
    InvalidDisplay,

    /// Role is not `bot` or `user`
    #[error("role must be either \"bot\" or \"user\"")]
    InvalidRole,
}

impl GateError {
    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            GateError::MissingRequiredProps => "missing_required_props",
            GateError::MissingDisplay => "missing_display",
            GateError::MissingRole => "missing_role",
            GateError::InvalidDisplay => "invalid_display",
            GateError::InvalidRole => "invalid_role",
        }
    }
}
