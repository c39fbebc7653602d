//! Bot type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// BotType represents the kind of crawler a bot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotType {
    /// Search engine crawler
    Search,
    /// AI crawler or assistant fetcher
    Ai,
}

impl BotType {
    /// Parse a bot type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "search" => Some(BotType::Search),
            "ai" => Some(BotType::Ai),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BotType::Search => "search",
            BotType::Ai => "ai",
        }
    }
}

impl fmt::Display for BotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Information about a supported bot (for listings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedBot {
    /// Bot name, also the name of its range file
    pub name: String,
    /// Bot type
    #[serde(rename = "type")]
    pub bot_type: BotType,
}

impl SupportedBot {
    /// Create a new SupportedBot.
    pub fn new(name: impl Into<String>, bot_type: BotType) -> Self {
        Self {
            name: name.into(),
            bot_type,
        }
    }
}
