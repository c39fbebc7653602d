//! User-agent based bot detection.
//!
//! The bot table is an ordered list of `{ name, type, patterns }` entries.
//! Patterns are case-insensitive regular expressions. Detection walks the
//! table in order and, within a bot, its patterns in order; the first match
//! wins, so more specific bots (`applebot-extended`) must precede the more
//! general ones (`applebot`) in the table.
//!
//! Table problems never fail the caller. Broken entries and patterns are
//! skipped and reported through a [`LoadReport`]; a missing table simply
//! means no bots are known.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bot_type::{BotType, SupportedBot};
use crate::error::LoadIssue;

/// A bot as declared in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotDefinition {
    pub name: String,
    pub bot_type: BotType,
    pub patterns: Vec<String>,
}

impl BotDefinition {
    pub fn new(name: impl Into<String>, bot_type: BotType, patterns: &[&str]) -> Self {
        Self {
            name: name.into(),
            bot_type,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Bot definition with pre-compiled patterns.
struct CompiledBot {
    name: String,
    bot_type: BotType,
    patterns: Vec<Regex>,
}

/// A user agent matched against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Name of the matched bot
    pub name: String,
    /// Type of the matched bot
    #[serde(rename = "type")]
    pub bot_type: BotType,
    /// Source text of the pattern that matched
    pub matched_pattern: String,
}

/// Outcome of loading the bot table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of bots available for detection
    pub bots_loaded: usize,
    /// Problems found in the table
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// True when every entry and pattern was accepted.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Detects bots by user agent.
///
/// The compiled table is swapped atomically on reload, so detection never
/// blocks and never observes a half-built table.
pub struct BotDetector {
    bots: ArcSwap<Vec<CompiledBot>>,
    path: Mutex<Option<PathBuf>>,
}

impl Default for BotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BotDetector {
    /// Create a detector that knows no bots.
    pub fn new() -> Self {
        Self {
            bots: ArcSwap::from_pointee(Vec::new()),
            path: Mutex::new(None),
        }
    }

    /// Load the table from a JSON file and remember the path for [`reload`].
    ///
    /// [`reload`]: BotDetector::reload
    pub fn load_path(&self, path: impl AsRef<Path>) -> LoadReport {
        let path = path.as_ref();
        *self.path.lock() = Some(path.to_path_buf());

        match fs::read_to_string(path) {
            Ok(content) => self.load_str(&content),
            Err(e) => {
                let issue = LoadIssue::Unreadable(format!("{}: {}", path.display(), e));
                log::warn!("Failed to load user agent patterns: {}", issue);
                self.bots.store(Arc::new(Vec::new()));
                LoadReport {
                    bots_loaded: 0,
                    issues: vec![issue],
                }
            }
        }
    }

    /// Load the table from JSON text.
    pub fn load_str(&self, json: &str) -> LoadReport {
        let (definitions, mut issues) = parse_table(json);
        let mut report = self.load_definitions(definitions);
        issues.append(&mut report.issues);
        report.issues = issues;
        report
    }

    /// Compile and install a set of definitions, replacing the current table.
    pub fn load_definitions(&self, definitions: Vec<BotDefinition>) -> LoadReport {
        let mut issues = Vec::new();
        let compiled: Vec<CompiledBot> = definitions
            .into_iter()
            .filter_map(|def| compile_bot(def, &mut issues))
            .collect();

        for issue in &issues {
            log::warn!("Bot table: {}", issue);
        }
        log::debug!("Loaded {} bot definitions", compiled.len());

        let report = LoadReport {
            bots_loaded: compiled.len(),
            issues,
        };
        self.bots.store(Arc::new(compiled));
        report
    }

    /// Re-read the table from the path given to [`load_path`].
    ///
    /// Returns `None` if the detector was never loaded from a file.
    ///
    /// [`load_path`]: BotDetector::load_path
    pub fn reload(&self) -> Option<LoadReport> {
        let path = self.path.lock().clone()?;
        Some(self.load_path(path))
    }

    /// Match a user agent against the table.
    pub fn detect(&self, user_agent: &str) -> Option<Detection> {
        if user_agent.is_empty() {
            return None;
        }

        let bots = self.bots.load();
        bots.iter().find_map(|bot| {
            bot.patterns
                .iter()
                .find(|pattern| pattern.is_match(user_agent))
                .map(|pattern| Detection {
                    name: bot.name.clone(),
                    bot_type: bot.bot_type,
                    matched_pattern: pattern.as_str().to_string(),
                })
        })
    }

    /// List the known bots in table order.
    pub fn supported_bots(&self) -> Vec<SupportedBot> {
        self.bots
            .load()
            .iter()
            .map(|bot| SupportedBot::new(bot.name.clone(), bot.bot_type))
            .collect()
    }

    /// Number of bots available for detection.
    pub fn len(&self) -> usize {
        self.bots.load().len()
    }

    /// Check if no bots are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse `{ "bots": [...] }`, skipping entries that cannot be used.
fn parse_table(json: &str) -> (Vec<BotDefinition>, Vec<LoadIssue>) {
    let mut issues = Vec::new();

    let table: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            issues.push(LoadIssue::MalformedTable(e.to_string()));
            return (Vec::new(), issues);
        }
    };
    let Some(entries) = table.get("bots").and_then(Value::as_array) else {
        issues.push(LoadIssue::MalformedTable("missing `bots` list".to_string()));
        return (Vec::new(), issues);
    };

    let mut definitions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let Some(name) = name else {
            issues.push(LoadIssue::MissingName { index });
            continue;
        };

        let Some(list) = entry.get("patterns").and_then(Value::as_array) else {
            issues.push(LoadIssue::InvalidPatternList {
                name: name.to_string(),
            });
            continue;
        };

        let raw_type = entry.get("type").and_then(Value::as_str).unwrap_or_default();
        let Some(bot_type) = BotType::parse(raw_type) else {
            issues.push(LoadIssue::UnknownType {
                name: name.to_string(),
                bot_type: raw_type.to_string(),
            });
            continue;
        };

        let mut patterns = Vec::with_capacity(list.len());
        for item in list {
            match item.as_str() {
                Some(p) => patterns.push(p.to_string()),
                None => issues.push(LoadIssue::InvalidPattern {
                    name: name.to_string(),
                    pattern: item.to_string(),
                    reason: "not a string".to_string(),
                }),
            }
        }

        definitions.push(BotDefinition {
            name: name.to_string(),
            bot_type,
            patterns,
        });
    }

    (definitions, issues)
}

fn compile_bot(def: BotDefinition, issues: &mut Vec<LoadIssue>) -> Option<CompiledBot> {
    let mut patterns = Vec::with_capacity(def.patterns.len());
    for pattern in &def.patterns {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => patterns.push(re),
            Err(e) => issues.push(LoadIssue::InvalidPattern {
                name: def.name.clone(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if patterns.is_empty() {
        issues.push(LoadIssue::NoUsablePatterns { name: def.name });
        return None;
    }

    Some(CompiledBot {
        name: def.name,
        bot_type: def.bot_type,
        patterns,
    })
}
