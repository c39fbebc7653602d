//! Per-bot IP range cache.
//!
//! Ranges are loaded lazily on first lookup of a bot name and kept until
//! they expire or are evicted. Load failures are cached too, as entries that
//! carry a [`RangeLoadError`] and no ranges, so a missing or broken file is
//! not re-read on every request.
//!
//! Admission keeps the cache bounded: expired entries are purged first, then
//! the oldest-loaded entries are evicted until there is room for one more.

mod source;
mod sweep;

pub use source::{
    load_ranges, parse_ranges, source_name_for, DirRangeSource, MemoryRangeSource, RangeSource,
};
pub use sweep::SweepHandle;

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::io;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::CacheConfig;
use crate::error::{RangeErrorKind, RangeLoadError};

/// Number of ranges shown by [`RangeCache::inspect`].
pub const INSPECT_RANGE_LIMIT: usize = 10;

/// Cached ranges for one bot name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotRangeEntry {
    /// Name the entry was requested (and is cached) under
    pub bot_name: String,
    /// Range specs in file order
    pub ranges: Vec<String>,
    /// When the entry was loaded
    pub loaded_at: SystemTime,
    /// Why no ranges are available, if loading failed
    pub error: Option<RangeLoadError>,
}

impl BotRangeEntry {
    /// True when the entry has ranges and no error.
    pub fn is_usable(&self) -> bool {
        self.error.is_none() && !self.ranges.is_empty()
    }
}

/// Operator view of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeInspection {
    pub bot_name: String,
    pub range_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(with = "unix_millis")]
    pub loaded_at: SystemTime,
    /// First [`INSPECT_RANGE_LIMIT`] ranges
    pub ranges: Vec<String>,
}

mod unix_millis {
    use serde::{Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = time.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
        millis.serialize(serializer)
    }
}

/// Bounded, TTL-expiring cache of bot ranges.
pub struct RangeCache {
    entries: RwLock<AHashMap<String, Arc<BotRangeEntry>>>,
    source: Arc<dyn RangeSource>,
    max_entries: usize,
    ttl: Duration,
}

impl RangeCache {
    /// Create a cache over `source` with the given limits.
    ///
    /// `max_entries` is raised to 1 if zero.
    pub fn new(source: Arc<dyn RangeSource>, max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
            source,
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    /// Create a cache using the limits from a [`CacheConfig`].
    pub fn from_config(source: Arc<dyn RangeSource>, config: &CacheConfig) -> Self {
        Self::new(source, config.max_entries, config.ttl())
    }

    /// Maximum number of entries.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entry time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the ranges for a bot, loading them if not cached.
    ///
    /// Never fails: load problems are reported on the returned entry.
    pub fn get_ranges(&self, bot_name: &str) -> Arc<BotRangeEntry> {
        self.get_ranges_at(bot_name, SystemTime::now())
    }

    pub(crate) fn get_ranges_at(&self, bot_name: &str, now: SystemTime) -> Arc<BotRangeEntry> {
        if let Some(entry) = self.entries.read().get(bot_name) {
            if !self.is_expired(entry, now) {
                return Arc::clone(entry);
            }
        }

        // Load outside the lock; local reads only, but no reason to block readers.
        let loaded = Arc::new(self.load(bot_name, now));

        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(bot_name) {
            if !self.is_expired(existing, now) {
                return Arc::clone(existing);
            }
        }
        entries.remove(bot_name);
        self.make_room(&mut entries, now);
        entries.insert(bot_name.to_string(), Arc::clone(&loaded));
        loaded
    }

    fn load(&self, bot_name: &str, now: SystemTime) -> BotRangeEntry {
        let source_name = source_name_for(bot_name);
        let (ranges, error) = match load_ranges(self.source.as_ref(), &source_name) {
            Ok(ranges) => {
                log::debug!("Loaded {} IP ranges for {}", ranges.len(), bot_name);
                (ranges, None)
            }
            Err(e) => {
                match e.kind {
                    RangeErrorKind::FileNotFound => {
                        log::debug!("No IP ranges for {}: {}", bot_name, e)
                    }
                    _ => log::warn!("Failed to load IP ranges for {}: {}", bot_name, e),
                }
                (Vec::new(), Some(e))
            }
        };

        BotRangeEntry {
            bot_name: bot_name.to_string(),
            ranges,
            loaded_at: now,
            error,
        }
    }

    fn is_expired(&self, entry: &BotRangeEntry, now: SystemTime) -> bool {
        now.duration_since(entry.loaded_at)
            .map(|age| age > self.ttl)
            .unwrap_or(false)
    }

    /// Purge expired entries, then evict oldest until one slot is free.
    fn make_room(&self, entries: &mut AHashMap<String, Arc<BotRangeEntry>>, now: SystemTime) {
        entries.retain(|_, entry| !self.is_expired(entry, now));

        while entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.loaded_at)
                .map(|(name, _)| name.clone());
            match oldest {
                Some(name) => {
                    log::debug!("Evicting IP ranges for {}", name);
                    entries.remove(&name);
                }
                None => break,
            }
        }
    }

    /// Remove every expired entry. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(SystemTime::now())
    }

    pub(crate) fn purge_expired_at(&self, now: SystemTime) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        before - entries.len()
    }

    /// Start a background thread purging expired entries every `interval`.
    ///
    /// The thread holds only a weak reference, so it also ends once the
    /// cache is dropped.
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) -> io::Result<SweepHandle> {
        SweepHandle::spawn(self, interval)
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the cached entries, sorted.
    pub fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Describe the entry for a bot, loading it if needed.
    pub fn inspect(&self, bot_name: &str) -> RangeInspection {
        let entry = self.get_ranges(bot_name);
        RangeInspection {
            bot_name: entry.bot_name.clone(),
            range_count: entry.ranges.len(),
            error: entry.error.as_ref().map(|e| e.kind.as_str()),
            error_message: entry.error.as_ref().map(|e| e.message.clone()),
            loaded_at: entry.loaded_at,
            ranges: entry.ranges.iter().take(INSPECT_RANGE_LIMIT).cloned().collect(),
        }
    }
}
