//! Botgate - verify that crawler traffic comes from the bot it claims to be.
//!
//! A request is trusted as a known crawler only when its `User-Agent` names a
//! known bot *and* its source address lies inside the IP ranges that bot's
//! operator publishes. Everything else, including any internal failure, is
//! treated as "not a verified bot".
//!
//! # Features
//!
//! - **Bot detection**: Ordered table of case-insensitive user agent patterns
//! - **IP matching**: IPv4/IPv6 CIDR, explicit IPv4 ranges and exact addresses
//! - **Range cache**: Lazy per-bot loading with TTL, size bound and background sweep
//! - **Diagnostics**: Typed reason codes and a full per-request report
//! - **Gate decision**: Show/hide content for verified bots or for users
//! - **Thread-safe**: All operations are thread-safe
//!
//! # Quick Start
//!
//! ```ignore
//! use botgate::{BotVerifier, VerifierConfig};
//!
//! let verifier = BotVerifier::new(&VerifierConfig::with_data_dir("data"))?;
//!
//! let ua = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
//! assert!(verifier.is_bot_verified(Some(ua), Some("66.249.64.1")));
//! assert!(!verifier.is_bot_verified(Some(ua), Some("192.168.1.1")));
//!
//! let report = verifier.debug_verify(Some(ua), Some("192.168.1.1"));
//! println!("{}", report.reason); // ip_not_in_range
//! ```
//!
//! # Data Layout
//!
//! - `data/user-agents.json`: `{ "bots": [ { "name", "type", "patterns" } ] }`
//! - `data/bots/<name>.json`: `{ "prefixes": [ { "ipv4Prefix" | "ipv6Prefix" } ] }`
//!
//! Range files are refreshed by an external updater; the cache picks up new
//! contents once the cached entry expires.
//!
//! # Global API
//!
//! For callers that do not want to own a verifier, the free functions
//! ([`is_bot_verified`], [`detect_bot`], ...) use a process-wide instance
//! initialized by [`init`] or lazily from the default configuration.

mod bot_type;
mod error;
mod global;

pub mod address;
pub mod config;
pub mod detector;
pub mod gate;
pub mod ranges;
pub mod sanitize;
pub mod verifier;

// Re-export core types
pub use bot_type::{BotType, SupportedBot};
pub use error::{Error, GateError, LoadIssue, RangeErrorKind, RangeLoadError, Result};

// Re-export verifier types
pub use config::{CacheConfig, VerifierConfig};
pub use detector::{BotDefinition, BotDetector, Detection, LoadReport};
pub use gate::{GateDisplay, GateRequest, GateRole};
pub use ranges::{BotRangeEntry, RangeCache, RangeInspection};
pub use sanitize::sanitize_ip;
pub use verifier::{BotVerifier, Reason, Stage, VerificationReport};

// Re-export address helpers
pub use address::{is_ip_in_range, is_valid_ip};

// Re-export global API functions
pub use global::{
    clear_cache, debug_verify, detect_bot, ensure_initialized, get_cache_size, global_verifier,
    init, inspect_bot_ranges, install, is_allowed_bot, is_bot_verified, is_initialized,
    list_cached_bots, list_supported_bots, stop_cache_cleanup,
};
