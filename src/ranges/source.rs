//! Backing sources for per-bot IP range data.
//!
//! Range files use the format crawler operators publish:
//!
//! ```json
//! { "creationTime": "...", "prefixes": [ { "ipv4Prefix": "66.249.64.0/27" }, { "ipv6Prefix": "2001:4860:4801:10::/64" } ] }
//! ```
//!
//! Only `prefixes` is read; other fields are ignored.

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::error::Category;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{RangeErrorKind, RangeLoadError};

/// Bot name whose ranges are published under another bot's file.
const APPLEBOT_EXTENDED: &str = "applebot-extended";
const APPLEBOT: &str = "applebot";

/// Something that can produce the raw range document for a bot.
pub trait RangeSource: Send + Sync {
    /// Read the range document for `source_name`.
    ///
    /// A missing document must be reported as [`io::ErrorKind::NotFound`].
    fn read(&self, source_name: &str) -> io::Result<String>;
}

/// Reads `<dir>/<source_name>.json`.
#[derive(Debug, Clone)]
pub struct DirRangeSource {
    dir: PathBuf,
}

impl DirRangeSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the range file for a source name.
    pub fn file_path(&self, source_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", source_name))
    }
}

impl RangeSource for DirRangeSource {
    fn read(&self, source_name: &str) -> io::Result<String> {
        fs::read_to_string(self.file_path(source_name))
    }
}

/// In-memory range documents, e.g. embedded with `include_str!`.
#[derive(Debug, Default)]
pub struct MemoryRangeSource {
    documents: RwLock<AHashMap<String, String>>,
}

impl MemoryRangeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the document for a source name.
    pub fn insert(&self, source_name: impl Into<String>, document: impl Into<String>) {
        self.documents
            .write()
            .insert(source_name.into(), document.into());
    }

    /// Builder-style [`insert`](MemoryRangeSource::insert).
    pub fn with(self, source_name: impl Into<String>, document: impl Into<String>) -> Self {
        self.insert(source_name, document);
        self
    }
}

impl RangeSource for MemoryRangeSource {
    fn read(&self, source_name: &str) -> io::Result<String> {
        self.documents
            .read()
            .get(source_name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, source_name.to_string()))
    }
}

/// Resolve the source a bot's ranges are read from.
///
/// Names are matched case-insensitively; `applebot-extended` shares the
/// `applebot` ranges.
pub fn source_name_for(bot_name: &str) -> String {
    let name = bot_name.trim().to_lowercase();
    if name == APPLEBOT_EXTENDED {
        APPLEBOT.to_string()
    } else {
        name
    }
}

/// Source names end up in file paths, so only plain names are accepted.
fn is_safe_source_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

#[derive(Deserialize)]
struct RangeDocument {
    prefixes: Vec<Prefix>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prefix {
    ipv4_prefix: Option<String>,
    ipv6_prefix: Option<String>,
}

/// Extract the range strings from a range document.
pub fn parse_ranges(document: &str) -> Result<Vec<String>, RangeLoadError> {
    let document: RangeDocument = serde_json::from_str(document).map_err(|e| {
        let kind = match e.classify() {
            Category::Data => RangeErrorKind::InvalidStructure,
            Category::Syntax | Category::Eof => RangeErrorKind::InvalidJson,
            Category::Io => RangeErrorKind::LoadFailed,
        };
        RangeLoadError::new(kind, e.to_string())
    })?;

    let ranges: Vec<String> = document
        .prefixes
        .into_iter()
        .filter_map(|p| p.ipv4_prefix.or(p.ipv6_prefix))
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    if ranges.is_empty() {
        return Err(RangeLoadError::new(
            RangeErrorKind::NoRanges,
            "no ipv4Prefix or ipv6Prefix entries",
        ));
    }
    Ok(ranges)
}

/// Read and parse the ranges for a source name.
pub fn load_ranges(source: &dyn RangeSource, source_name: &str) -> Result<Vec<String>, RangeLoadError> {
    if !is_safe_source_name(source_name) {
        return Err(RangeLoadError::new(
            RangeErrorKind::LoadFailed,
            format!("refusing to load ranges for unsafe bot name '{}'", source_name),
        ));
    }

    let document = source.read(source_name).map_err(|e| {
        let kind = if e.kind() == io::ErrorKind::NotFound {
            RangeErrorKind::FileNotFound
        } else {
            RangeErrorKind::LoadFailed
        };
        RangeLoadError::new(kind, format!("{}: {}", source_name, e))
    })?;

    parse_ranges(&document)
}
