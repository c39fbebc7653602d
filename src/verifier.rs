//! Bot verification pipeline.
//!
//! A request is verified when its user agent claims a known bot *and* its
//! address lies inside that bot's published ranges. Each call walks the
//! stages
//!
//! ```text
//! Start -> InputCheck -> IpSanitized -> IpSyntaxValid -> BotDetected -> RangesLoaded -> Verdict
//! ```
//!
//! and stops at the first failing stage with a [`Reason`]. Nothing in the
//! pipeline returns an error to the caller; any doubt denies.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::address::{self, AddressFamily};
use crate::bot_type::SupportedBot;
use crate::config::VerifierConfig;
use crate::detector::{BotDetector, Detection, LoadReport};
use crate::error::{RangeErrorKind, Result};
use crate::gate::{self, GateRequest};
use crate::ranges::{DirRangeSource, RangeCache, RangeInspection, SweepHandle};
use crate::sanitize::sanitize_ip;

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    InputCheck,
    IpSanitized,
    IpSyntaxValid,
    BotDetected,
    RangesLoaded,
    Verdict,
}

/// Why a verification ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Address is inside the claimed bot's ranges
    Verified,
    /// User agent or address absent or empty
    InputMissing,
    /// Nothing left after sanitizing the address
    IpSanitizationFailed,
    /// Sanitized address is neither IPv4 nor IPv6
    IpSyntaxInvalid,
    /// User agent does not claim a known bot
    BotNotDetected,
    /// No readable range source for the bot
    RangeSourceMissing,
    /// Range source is not valid range data
    RangeSourceMalformed,
    /// Range source lists no ranges
    RangeSourceEmpty,
    /// Every range is of the other address family
    AddressFamilyMismatch,
    /// Address is outside every range
    IpNotInRange,
}

impl Reason {
    /// Get the reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Verified => "verified",
            Reason::InputMissing => "input_missing",
            Reason::IpSanitizationFailed => "ip_sanitization_failed",
            Reason::IpSyntaxInvalid => "ip_syntax_invalid",
            Reason::BotNotDetected => "bot_not_detected",
            Reason::RangeSourceMissing => "range_source_missing",
            Reason::RangeSourceMalformed => "range_source_malformed",
            Reason::RangeSourceEmpty => "range_source_empty",
            Reason::AddressFamilyMismatch => "address_family_mismatch",
            Reason::IpNotInRange => "ip_not_in_range",
        }
    }

    /// The stage at which the pipeline stopped.
    pub fn stage(&self) -> Stage {
        match self {
            Reason::InputMissing => Stage::InputCheck,
            Reason::IpSanitizationFailed => Stage::IpSanitized,
            Reason::IpSyntaxInvalid => Stage::IpSyntaxValid,
            Reason::BotNotDetected => Stage::BotDetected,
            Reason::RangeSourceMissing | Reason::RangeSourceMalformed | Reason::RangeSourceEmpty => {
                Stage::RangesLoaded
            }
            Reason::Verified | Reason::AddressFamilyMismatch | Reason::IpNotInRange => {
                Stage::Verdict
            }
        }
    }

    /// A known bot was claimed from an address outside its ranges.
    pub fn is_impersonation(&self) -> bool {
        matches!(self, Reason::AddressFamilyMismatch | Reason::IpNotInRange)
    }

    fn from_range_error(kind: RangeErrorKind) -> Self {
        match kind {
            RangeErrorKind::FileNotFound | RangeErrorKind::LoadFailed => Reason::RangeSourceMissing,
            RangeErrorKind::InvalidJson | RangeErrorKind::InvalidStructure => {
                Reason::RangeSourceMalformed
            }
            RangeErrorKind::NoRanges => Reason::RangeSourceEmpty,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full intermediate state of one verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub verified: bool,
    pub reason: Reason,
    pub sanitized_ip: Option<String>,
    pub detection: Option<Detection>,
    pub range_count: Option<usize>,
    pub range_error: Option<&'static str>,
    pub range_error_message: Option<String>,
    pub matched_range: Option<String>,
}

impl VerificationReport {
    fn new() -> Self {
        Self {
            verified: false,
            reason: Reason::InputMissing,
            sanitized_ip: None,
            detection: None,
            range_count: None,
            range_error: None,
            range_error_message: None,
            matched_range: None,
        }
    }

    fn deny(mut self, reason: Reason) -> Self {
        self.verified = false;
        self.reason = reason;
        self
    }

    /// The stage at which the pipeline stopped.
    pub fn stage(&self) -> Stage {
        self.reason.stage()
    }
}

/// Verifies crawler requests against a bot table and published ranges.
///
/// All methods take `&self` and are safe to call from many threads.
pub struct BotVerifier {
    detector: BotDetector,
    ranges: Arc<RangeCache>,
    sweeper: Mutex<Option<SweepHandle>>,
    load_report: RwLock<LoadReport>,
}

impl BotVerifier {
    /// Build a verifier from configuration.
    ///
    /// Loads the pattern table, sets up the range cache over the range
    /// directory and starts the background sweep if configured. A missing or
    /// broken pattern table does not fail construction; see [`load_report`].
    ///
    /// [`load_report`]: BotVerifier::load_report
    pub fn new(config: &VerifierConfig) -> Result<Self> {
        config.validate()?;

        let detector = BotDetector::new();
        let report = detector.load_path(&config.patterns_path);
        let source = Arc::new(DirRangeSource::new(&config.ranges_dir));
        let ranges = Arc::new(RangeCache::from_config(source, &config.cache));

        let verifier = Self::with_parts(detector, ranges);
        *verifier.load_report.write() = report;

        if let Some(interval) = config.cache.sweep_interval() {
            verifier.start_cache_cleanup(interval)?;
        }

        log::info!(
            "Bot verifier ready: {} bots from {}, ranges from {}",
            verifier.detector.len(),
            config.patterns_path.display(),
            config.ranges_dir.display()
        );
        Ok(verifier)
    }

    /// Build a verifier from an already loaded detector and range cache.
    ///
    /// No sweep is started.
    pub fn with_parts(detector: BotDetector, ranges: Arc<RangeCache>) -> Self {
        let report = LoadReport {
            bots_loaded: detector.len(),
            issues: Vec::new(),
        };
        Self {
            detector,
            ranges,
            sweeper: Mutex::new(None),
            load_report: RwLock::new(report),
        }
    }

    /// Report from the most recent pattern table load.
    pub fn load_report(&self) -> LoadReport {
        self.load_report.read().clone()
    }

    /// Re-read the pattern table from its file.
    ///
    /// Returns `None` if the detector was not loaded from a file.
    pub fn reload_patterns(&self) -> Option<LoadReport> {
        let report = self.detector.reload()?;
        *self.load_report.write() = report.clone();
        Some(report)
    }

    /// The bot detector.
    pub fn detector(&self) -> &BotDetector {
        &self.detector
    }

    /// The range cache.
    pub fn ranges(&self) -> &Arc<RangeCache> {
        &self.ranges
    }

    /// Check whether the request comes from the bot its user agent claims.
    pub fn is_bot_verified(&self, user_agent: Option<&str>, ip_address: Option<&str>) -> bool {
        let report = self.evaluate(user_agent, ip_address);
        log_outcome(&report);
        report.verified
    }

    /// Like [`is_bot_verified`], restricted to the bots named in `allowed`.
    ///
    /// An empty list allows every known bot. Names must match the detected
    /// bot name exactly, so `"Googlebot"` does not allow `googlebot`.
    ///
    /// [`is_bot_verified`]: BotVerifier::is_bot_verified
    pub fn is_allowed_bot(
        &self,
        user_agent: Option<&str>,
        ip_address: Option<&str>,
        allowed: &[&str],
    ) -> bool {
        let report = self.evaluate(user_agent, ip_address);
        log_outcome(&report);
        if !report.verified {
            return false;
        }
        if allowed.is_empty() {
            return true;
        }
        report
            .detection
            .is_some_and(|d| allowed.contains(&d.name.as_str()))
    }

    /// Run the pipeline and return every intermediate result.
    pub fn debug_verify(&self, user_agent: Option<&str>, ip_address: Option<&str>) -> VerificationReport {
        let report = self.evaluate(user_agent, ip_address);
        log::debug!(
            "debug_verify: {} at {:?} (ip={:?}, bot={:?})",
            report.reason,
            report.stage(),
            report.sanitized_ip,
            report.detection.as_ref().map(|d| d.name.as_str())
        );
        report
    }

    /// Decide whether gated content is shown; invalid props hide it.
    pub fn gate(&self, request: &GateRequest<'_>) -> bool {
        match gate::validate_props(
            request.user_agent,
            request.ip_address,
            request.display,
            request.role,
        ) {
            Ok((display, role)) => {
                let is_bot = self.is_allowed_bot(request.user_agent, request.ip_address, request.bots);
                gate::should_show(display, role, is_bot)
            }
            Err(e) => {
                log::warn!("BotGate: {}", e);
                false
            }
        }
    }

    /// Match a user agent against the bot table.
    pub fn detect_bot(&self, user_agent: &str) -> Option<Detection> {
        self.detector.detect(user_agent)
    }

    /// Bots known to the table, in table order.
    pub fn list_supported_bots(&self) -> Vec<SupportedBot> {
        self.detector.supported_bots()
    }

    /// Drop every cached range entry.
    pub fn clear_cache(&self) {
        self.ranges.clear();
    }

    /// Number of cached range entries.
    pub fn cache_size(&self) -> usize {
        self.ranges.len()
    }

    /// Names of the cached range entries.
    pub fn cached_bot_names(&self) -> Vec<String> {
        self.ranges.cached_names()
    }

    /// Describe the cached ranges for a bot, loading them if needed.
    pub fn inspect(&self, bot_name: &str) -> RangeInspection {
        self.ranges.inspect(bot_name)
    }

    /// Start (or restart) the background purge of expired range entries.
    pub fn start_cache_cleanup(&self, interval: Duration) -> Result<()> {
        let handle = self.ranges.start_sweeper(interval)?;
        if let Some(previous) = self.sweeper.lock().replace(handle) {
            previous.stop();
        }
        Ok(())
    }

    /// Stop the background purge. Returns `true` if one was running.
    pub fn stop_cache_cleanup(&self) -> bool {
        let handle = self.sweeper.lock().take();
        match handle {
            Some(handle) => {
                handle.stop();
                log::debug!("Stopped IP range sweep");
                true
            }
            None => false,
        }
    }

    /// Check if the background purge is running.
    pub fn is_cache_cleanup_running(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(SweepHandle::is_running)
    }

    fn evaluate(&self, user_agent: Option<&str>, ip_address: Option<&str>) -> VerificationReport {
        let report = VerificationReport::new();

        let user_agent = user_agent.filter(|s| !s.is_empty());
        let ip_address = ip_address.filter(|s| !s.is_empty());
        let (Some(user_agent), Some(ip_address)) = (user_agent, ip_address) else {
            return report.deny(Reason::InputMissing);
        };

        let Some(ip) = sanitize_ip(ip_address) else {
            return report.deny(Reason::IpSanitizationFailed);
        };
        let mut report = VerificationReport {
            sanitized_ip: Some(ip.clone()),
            ..report
        };

        if !address::is_valid_ip(&ip) {
            return report.deny(Reason::IpSyntaxInvalid);
        }

        let Some(detection) = self.detector.detect(user_agent) else {
            return report.deny(Reason::BotNotDetected);
        };
        let entry = self.ranges.get_ranges(&detection.name);
        report.detection = Some(detection);
        report.range_count = Some(entry.ranges.len());

        if let Some(error) = &entry.error {
            report.range_error = Some(error.kind.as_str());
            report.range_error_message = Some(error.message.clone());
            return report.deny(Reason::from_range_error(error.kind));
        }
        if entry.ranges.is_empty() {
            return report.deny(Reason::RangeSourceEmpty);
        }

        match entry.ranges.iter().find(|range| address::is_ip_in_range(&ip, range)) {
            Some(range) => {
                report.matched_range = Some(range.clone());
                report.verified = true;
                report.reason = Reason::Verified;
                report
            }
            None => {
                let family = AddressFamily::of(&ip);
                let reason = if entry.ranges.iter().all(|r| AddressFamily::of(r) != family) {
                    Reason::AddressFamilyMismatch
                } else {
                    Reason::IpNotInRange
                };
                report.deny(reason)
            }
        }
    }
}

fn log_outcome(report: &VerificationReport) {
    let ip = report.sanitized_ip.as_deref().unwrap_or("-");
    match &report.detection {
        Some(bot) if report.verified => {
            log::debug!("Verified {} from {} ({:?})", bot.name, ip, report.matched_range);
        }
        Some(bot) if report.reason.is_impersonation() => {
            log::warn!(
                "Unverified {} claim from {}: {}",
                bot.name,
                ip,
                report.reason
            );
        }
        Some(bot) => {
            log::debug!("Cannot verify {} from {}: {}", bot.name, ip, report.reason);
        }
        None => log::trace!("Not a bot request: {}", report.reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot_type::BotType;
    use crate::ranges::MemoryRangeSource;

    const TABLE: &str = r#"{
        "bots": [
            { "name": "googlebot", "type": "search", "patterns": ["googlebot"] },
            { "name": "bingbot", "type": "search", "patterns": ["bingbot"] },
            { "name": "gptbot", "type": "ai", "patterns": ["gptbot"] },
            { "name": "perplexitybot", "type": "ai", "patterns": ["perplexitybot"] },
            { "name": "oai-searchbot", "type": "ai", "patterns": ["oai-searchbot"] },
            { "name": "duckassistbot", "type": "ai", "patterns": ["duckassistbot"] }
        ]
    }"#;

    const GOOGLEBOT_UA: &str =
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
    const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

    fn verifier() -> BotVerifier {
        let detector = BotDetector::new();
        assert!(detector.load_str(TABLE).is_clean());

        let source = MemoryRangeSource::new()
            .with(
                "googlebot",
                r#"{ "prefixes": [ { "ipv4Prefix": "66.249.64.0/27" }, { "ipv6Prefix": "2001:4860:4801:10::/64" } ] }"#,
            )
            .with(
                "bingbot",
                r#"{ "prefixes": [ { "ipv4Prefix": "157.55.39.0/24" }, { "ipv4Prefix": "40.77.167.0-40.77.167.127" } ] }"#,
            )
            .with("gptbot", r#"{ "prefixes": [ { "ipv6Prefix": "2a0b:4140::/32" } ] }"#)
            .with("perplexitybot", r#"{ "prefixes": [] }"#)
            .with("oai-searchbot", "<html>404</html>");
        let ranges = Arc::new(RangeCache::new(Arc::new(source), 10, Duration::from_secs(60)));
        BotVerifier::with_parts(detector, ranges)
    }

    #[test]
    fn test_verified_googlebot() {
        let v = verifier();
        assert!(v.is_bot_verified(Some(GOOGLEBOT_UA), Some("66.249.64.1")));
        assert!(v.is_bot_verified(Some(GOOGLEBOT_UA), Some("2001:4860:4801:10::abcd")));
        assert!(v.is_bot_verified(Some(GOOGLEBOT_UA), Some("::ffff:66.249.64.1")));
        assert!(v.is_bot_verified(Some(GOOGLEBOT_UA), Some(" 66.249.64.31, 10.0.0.1")));
    }

    #[test]
    fn test_fake_googlebot() {
        let v = verifier();
        assert!(!v.is_bot_verified(Some(GOOGLEBOT_UA), Some("192.168.1.1")));
        assert!(!v.is_bot_verified(Some(GOOGLEBOT_UA), Some("66.249.64.32")));
    }

    #[test]
    fn test_missing_inputs() {
        let v = verifier();
        assert!(!v.is_bot_verified(None, None));
        assert!(!v.is_bot_verified(Some(""), Some("")));
        assert!(!v.is_bot_verified(Some(GOOGLEBOT_UA), None));
        assert!(!v.is_bot_verified(None, Some("66.249.64.1")));
        assert!(!v.is_bot_verified(Some("valid-ua"), Some("")));
        assert_eq!(v.debug_verify(None, Some("66.249.64.1")).reason, Reason::InputMissing);
    }

    #[test]
    fn test_browser_never_verified() {
        let v = verifier();
        assert!(!v.is_bot_verified(Some(BROWSER_UA), Some("66.249.64.1")));
        let report = v.debug_verify(Some(BROWSER_UA), Some("66.249.64.1"));
        assert_eq!(report.reason, Reason::BotNotDetected);
        assert_eq!(report.stage(), Stage::BotDetected);
        assert_eq!(report.sanitized_ip.as_deref(), Some("66.249.64.1"));
        assert!(report.detection.is_none());
        // No range lookup for unclaimed requests
        assert_eq!(v.cache_size(), 0);
    }

    #[test]
    fn test_reason_codes() {
        let v = verifier();
        let reason = |ua: &str, ip: &str| v.debug_verify(Some(ua), Some(ip)).reason;

        assert_eq!(reason(GOOGLEBOT_UA, "   "), Reason::IpSanitizationFailed);
        assert_eq!(reason(GOOGLEBOT_UA, "not-an-ip"), Reason::IpSyntaxInvalid);
        assert_eq!(reason(GOOGLEBOT_UA, "66.249.64.300"), Reason::IpSyntaxInvalid);
        assert_eq!(reason(GOOGLEBOT_UA, "192.168.1.1"), Reason::IpNotInRange);
        assert_eq!(reason("GPTBot/1.1", "20.171.206.10"), Reason::AddressFamilyMismatch);
        assert_eq!(reason("PerplexityBot/1.0", "44.221.181.252"), Reason::RangeSourceEmpty);
        assert_eq!(reason("OAI-SearchBot/1.0", "104.210.140.130"), Reason::RangeSourceMalformed);
        assert_eq!(reason("DuckAssistBot/1.1", "20.191.45.212"), Reason::RangeSourceMissing);
        assert_eq!(reason(GOOGLEBOT_UA, "66.249.64.1"), Reason::Verified);
    }

    #[test]
    fn test_impersonation_is_distinguishable() {
        let v = verifier();
        let fake = v.debug_verify(Some(GOOGLEBOT_UA), Some("192.168.1.1"));
        let browser = v.debug_verify(Some(BROWSER_UA), Some("192.168.1.1"));

        assert!(!fake.verified && !browser.verified);
        assert!(fake.reason.is_impersonation());
        assert!(!browser.reason.is_impersonation());
        assert_eq!(fake.detection.unwrap().name, "googlebot");
    }

    #[test]
    fn test_debug_report_contents() {
        let v = verifier();

        let ok = v.debug_verify(Some("bingbot/2.0"), Some("[::ffff:40.77.167.100]"));
        assert!(ok.verified);
        assert_eq!(ok.reason, Reason::Verified);
        assert_eq!(ok.stage(), Stage::Verdict);
        assert_eq!(ok.sanitized_ip.as_deref(), Some("40.77.167.100"));
        assert_eq!(ok.range_count, Some(2));
        assert_eq!(ok.matched_range.as_deref(), Some("40.77.167.0-40.77.167.127"));
        let detection = ok.detection.unwrap();
        assert_eq!(detection.bot_type, BotType::Search);
        assert_eq!(detection.matched_pattern, "bingbot");

        let broken = v.debug_verify(Some("OAI-SearchBot/1.0"), Some("104.210.140.130"));
        assert_eq!(broken.range_error, Some("invalid_json"));
        assert!(broken.range_error_message.is_some());
        assert_eq!(broken.range_count, Some(0));
        assert_eq!(broken.stage(), Stage::RangesLoaded);

        let json = serde_json::to_value(&broken).unwrap();
        assert_eq!(json["reason"], "range_source_malformed");
        assert_eq!(json["rangeError"], "invalid_json");
        assert_eq!(json["detection"]["type"], "ai");
        assert_eq!(json["detection"]["matchedPattern"], "oai-searchbot");
        assert!(json["detection"].get("matched_pattern").is_none());
    }

    #[test]
    fn test_allowed_bots() {
        let v = verifier();
        let ua = Some(GOOGLEBOT_UA);
        let ip = Some("66.249.64.1");

        assert!(v.is_allowed_bot(ua, ip, &[]));
        assert!(v.is_allowed_bot(ua, ip, &["googlebot"]));
        assert!(v.is_allowed_bot(ua, ip, &["bingbot", "googlebot"]));
        assert!(!v.is_allowed_bot(ua, ip, &["Googlebot"]));
        assert!(!v.is_allowed_bot(ua, ip, &["GOOGLEBOT", "bingbot"]));
        assert!(!v.is_allowed_bot(ua, ip, &["bingbot"]));
        assert!(!v.is_allowed_bot(ua, Some("192.168.1.1"), &["googlebot"]));
    }

    #[test]
    fn test_gate() {
        let v = verifier();
        let bot = |display: &'static str, role: &'static str| {
            GateRequest::new(GOOGLEBOT_UA, "66.249.64.1", display, role)
        };
        let human = |display: &'static str, role: &'static str| {
            GateRequest::new(BROWSER_UA, "66.249.64.1", display, role)
        };

        assert!(v.gate(&bot("show", "bot")));
        assert!(!v.gate(&human("show", "bot")));
        assert!(v.gate(&human("show", "user")));
        assert!(!v.gate(&bot("hide", "user").with_bots(&["bingbot"])));
        assert!(v.gate(&bot("hide", "bot").with_bots(&["bingbot"])));

        // Invalid props hide the content whatever the verdict
        assert!(!v.gate(&bot("visible", "bot")));
        assert!(!v.gate(&GateRequest::default()));
    }

    #[test]
    fn test_detect_and_list() {
        let v = verifier();
        assert_eq!(v.detect_bot("GPTBot/1.1").unwrap().name, "gptbot");
        assert!(v.detect_bot(BROWSER_UA).is_none());
        assert_eq!(v.list_supported_bots().len(), 6);
        assert_eq!(v.load_report().bots_loaded, 6);
    }

    #[test]
    fn test_cache_management() {
        let v = verifier();
        v.is_bot_verified(Some(GOOGLEBOT_UA), Some("66.249.64.1"));
        v.is_bot_verified(Some("bingbot"), Some("157.55.39.1"));
        assert_eq!(v.cache_size(), 2);
        assert_eq!(v.cached_bot_names(), ["bingbot", "googlebot"]);

        let info = v.inspect("googlebot");
        assert_eq!(info.range_count, 2);

        v.clear_cache();
        assert_eq!(v.cache_size(), 0);
        // Still verifies after a clear
        assert!(v.is_bot_verified(Some(GOOGLEBOT_UA), Some("66.249.64.1")));
    }

    #[test]
    fn test_cache_cleanup_lifecycle() {
        let v = verifier();
        assert!(!v.stop_cache_cleanup());
        v.start_cache_cleanup(Duration::from_secs(3600)).unwrap();
        assert!(v.is_cache_cleanup_running());
        v.start_cache_cleanup(Duration::from_secs(1800)).unwrap();
        assert!(v.is_cache_cleanup_running());
        assert!(v.stop_cache_cleanup());
        assert!(!v.is_cache_cleanup_running());
        assert!(!v.stop_cache_cleanup());
    }

    #[test]
    fn test_parallel_verification() {
        let v = Arc::new(verifier());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let v = Arc::clone(&v);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(v.is_bot_verified(Some(GOOGLEBOT_UA), Some("66.249.64.1")));
                        assert!(!v.is_bot_verified(Some(GOOGLEBOT_UA), Some("192.168.1.1")));
                        assert!(v.is_bot_verified(Some("bingbot"), Some("157.55.39.9")));
                        let _ = v.debug_verify(Some("GPTBot"), Some(if i % 2 == 0 { "::1" } else { "1.1.1.1" }));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
