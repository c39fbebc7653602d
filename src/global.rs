//! Global state and public API.
//!
//! A process-wide [`BotVerifier`] for callers that do not want to carry one
//! around. [`init`] installs a verifier built from a configuration; the
//! verification and lookup functions initialize lazily from
//! [`VerifierConfig::default`] (the `data/` directory under the working
//! directory). Cache management functions act only on an installed verifier
//! and never trigger initialization.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::{Arc, Once};

use crate::bot_type::SupportedBot;
use crate::config::VerifierConfig;
use crate::detector::{Detection, LoadReport};
use crate::error::Result;
use crate::ranges::RangeInspection;
use crate::verifier::{BotVerifier, VerificationReport};

/// Global verifier
static GLOBAL_VERIFIER: Lazy<RwLock<Option<Arc<BotVerifier>>>> = Lazy::new(|| RwLock::new(None));

/// Initialization flag
static INIT: Once = Once::new();

/// Ensure the global verifier is initialized.
///
/// This is called lazily when needed, but can be called explicitly
/// to load the default configuration proactively.
pub fn ensure_initialized() {
    INIT.call_once(|| {
        if is_initialized() {
            return;
        }
        if let Err(e) = init(VerifierConfig::default()) {
            log::error!("Failed to initialize bot verifier: {}", e);
        }
    });
}

/// Check if the global verifier is initialized.
pub fn is_initialized() -> bool {
    GLOBAL_VERIFIER.read().is_some()
}

/// Build a verifier from `config` and install it globally.
///
/// Replaces (and shuts down) any previously installed verifier.
pub fn init(config: VerifierConfig) -> Result<LoadReport> {
    let verifier = Arc::new(BotVerifier::new(&config)?);
    let report = verifier.load_report();
    install(verifier);
    Ok(report)
}

/// Install an existing verifier globally.
pub fn install(verifier: Arc<BotVerifier>) {
    let previous = GLOBAL_VERIFIER.write().replace(verifier);
    if let Some(previous) = previous {
        previous.stop_cache_cleanup();
    }
}

/// Get the global verifier, initializing it if needed.
pub fn global_verifier() -> Option<Arc<BotVerifier>> {
    ensure_initialized();
    let verifier = GLOBAL_VERIFIER.read().clone();
    if verifier.is_none() {
        log::warn!("Bot verifier is not initialized; denying verification");
    }
    verifier
}

/// The installed verifier, without initializing.
fn installed() -> Option<Arc<BotVerifier>> {
    GLOBAL_VERIFIER.read().clone()
}

/// Check whether the request comes from the bot its user agent claims.
///
/// # Examples
/// ```ignore
/// use botgate::is_bot_verified;
///
/// let ua = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
/// assert!(is_bot_verified(Some(ua), Some("66.249.64.1")));
/// ```
pub fn is_bot_verified(user_agent: Option<&str>, ip_address: Option<&str>) -> bool {
    global_verifier().is_some_and(|v| v.is_bot_verified(user_agent, ip_address))
}

/// Verify and restrict to the named bots (empty list allows all).
pub fn is_allowed_bot(user_agent: Option<&str>, ip_address: Option<&str>, allowed: &[&str]) -> bool {
    global_verifier().is_some_and(|v| v.is_allowed_bot(user_agent, ip_address, allowed))
}

/// Run verification and return every intermediate result.
pub fn debug_verify(user_agent: Option<&str>, ip_address: Option<&str>) -> Option<VerificationReport> {
    global_verifier().map(|v| v.debug_verify(user_agent, ip_address))
}

/// Match a user agent against the global bot table.
pub fn detect_bot(user_agent: &str) -> Option<Detection> {
    global_verifier()?.detect_bot(user_agent)
}

/// Bots known to the global table.
pub fn list_supported_bots() -> Vec<SupportedBot> {
    global_verifier().map(|v| v.list_supported_bots()).unwrap_or_default()
}

/// Drop every cached range entry. No-op before initialization.
pub fn clear_cache() {
    if let Some(v) = installed() {
        v.clear_cache();
    }
}

/// Number of cached range entries.
pub fn get_cache_size() -> usize {
    installed().map_or(0, |v| v.cache_size())
}

/// Names of the cached range entries.
pub fn list_cached_bots() -> Vec<String> {
    installed().map(|v| v.cached_bot_names()).unwrap_or_default()
}

/// Describe the cached ranges for a bot.
pub fn inspect_bot_ranges(bot_name: &str) -> Option<RangeInspection> {
    global_verifier().map(|v| v.inspect(bot_name))
}

/// Stop the background purge of the global cache.
///
/// Returns `false` when no verifier is installed or the sweep was not running.
pub fn stop_cache_cleanup() -> bool {
    installed().is_some_and(|v| v.stop_cache_cleanup())
}
