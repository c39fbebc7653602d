//! Show/hide decision for content gated on bot verification.
//!
//! A gate is configured with a `display` (`show` or `hide`) and a `role`
//! (`bot` or `user`). `show` + `bot` reveals content to verified bots only,
//! `show` + `user` to everyone else; `hide` inverts the decision.

use std::fmt;

use crate::error::GateError;

/// Whether the gate shows or hides its content for the selected role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateDisplay {
    Show,
    Hide,
}

impl GateDisplay {
    /// Parse `show` or `hide`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "show" => Some(GateDisplay::Show),
            "hide" => Some(GateDisplay::Hide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateDisplay::Show => "show",
            GateDisplay::Hide => "hide",
        }
    }
}

impl fmt::Display for GateDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The audience the gate's display applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateRole {
    Bot,
    User,
}

impl GateRole {
    /// Parse `bot` or `user`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bot" => Some(GateRole::Bot),
            "user" => Some(GateRole::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateRole::Bot => "bot",
            GateRole::User => "user",
        }
    }
}

impl fmt::Display for GateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs of one gate evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateRequest<'a> {
    pub user_agent: Option<&'a str>,
    pub ip_address: Option<&'a str>,
    pub display: Option<&'a str>,
    pub role: Option<&'a str>,
    /// Bots the gate applies to; empty means every known bot
    pub bots: &'a [&'a str],
}

impl<'a> GateRequest<'a> {
    pub fn new(user_agent: &'a str, ip_address: &'a str, display: &'a str, role: &'a str) -> Self {
        Self {
            user_agent: Some(user_agent),
            ip_address: Some(ip_address),
            display: Some(display),
            role: Some(role),
            bots: &[],
        }
    }

    /// Restrict the gate to the named bots.
    pub fn with_bots(mut self, bots: &'a [&'a str]) -> Self {
        self.bots = bots;
        self
    }
}

/// Check the gate inputs, in order: request inputs, display, role.
pub fn validate_props(
    user_agent: Option<&str>,
    ip_address: Option<&str>,
    display: Option<&str>,
    role: Option<&str>,
) -> Result<(GateDisplay, GateRole), GateError> {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());

    if !present(user_agent) || !present(ip_address) {
        return Err(GateError::MissingRequiredProps);
    }
    let display = display.filter(|s| !s.is_empty()).ok_or(GateError::MissingDisplay)?;
    let role = role.filter(|s| !s.is_empty()).ok_or(GateError::MissingRole)?;

    let display = GateDisplay::parse(display).ok_or(GateError::InvalidDisplay)?;
    let role = GateRole::parse(role).ok_or(GateError::InvalidRole)?;
    Ok((display, role))
}

/// Decide whether content is shown.
pub fn should_show(display: GateDisplay, role: GateRole, is_bot: bool) -> bool {
    match (display, role) {
        (GateDisplay::Show, GateRole::Bot) | (GateDisplay::Hide, GateRole::User) => is_bot,
        (GateDisplay::Show, GateRole::User) | (GateDisplay::Hide, GateRole::Bot) => !is_bot,
    }
}
