//! Hidden developer access: tap the title seven times, then type a code.
use serde::Serialize;
use std::time::Duration;

use crate::constants::{ACCESS_NOTICE_FOR, ACCESS_TAPS_TO_PROMPT, ACCESS_UNLOCK_NOTICE_FOR};
use crate::data::AccessCodes;
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessOutcome {
    /// Every level unlocked, countdown hidden, riddle bypass allowed.
    DevMode,
    /// Jump straight to the finale.
    Finale,
    WrongCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessNotice {
    Unlocked,
    WrongCode,
}

impl AccessNotice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unlocked => "All levels unlocked",
            Self::WrongCode => "Wrong password",
        }
    }

    const fn duration(self) -> Duration {
        match self {
            Self::Unlocked => ACCESS_UNLOCK_NOTICE_FOR,
            Self::WrongCode => ACCESS_NOTICE_FOR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    codes: AccessCodes,
    taps: u32,
    prompt_open: bool,
    override_all: bool,
    notice: Option<(AccessNotice, Countdown)>,
}

impl AccessGate {
    #[must_use]
    pub const fn new(codes: AccessCodes) -> Self {
        Self {
            codes,
            taps: 0,
            prompt_open: false,
            override_all: false,
            notice: None,
        }
    }

    /// Honour a `dev=true` pair in a URL query string (leading `?` optional).
    #[must_use]
    pub fn with_url_flag(codes: AccessCodes, query: &str) -> Self {
        let mut gate = Self::new(codes);
        gate.override_all = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "dev" && value == "true");
        if gate.override_all {
            log::debug!("developer override enabled from URL");
        }
        gate
    }

    /// Count a tap on the title. Returns `true` on the tap that opens the prompt.
    pub fn tap_title(&mut self) -> bool {
        if self.prompt_open {
            return false;
        }
        self.taps += 1;
        if self.taps < ACCESS_TAPS_TO_PROMPT {
            return false;
        }
        self.taps = 0;
        self.prompt_open = true;
        true
    }

    /// Submit a code typed into the open prompt. `None` when no prompt is open.
    pub fn enter_code(&mut self, code: &str) -> Option<AccessOutcome> {
        if !self.prompt_open {
            return None;
        }
        self.prompt_open = false;
        let code = code.trim();
        let outcome = if code == self.codes.dev_mode {
            self.override_all = true;
            self.show(AccessNotice::Unlocked);
            AccessOutcome::DevMode
        } else if code == self.codes.finale {
            AccessOutcome::Finale
        } else {
            self.show(AccessNotice::WrongCode);
            AccessOutcome::WrongCode
        };
        log::debug!("access prompt answered: {outcome:?}");
        Some(outcome)
    }

    pub fn dismiss_prompt(&mut self) {
        self.prompt_open = false;
    }

    fn show(&mut self, notice: AccessNotice) {
        self.notice = Some((notice, Countdown::new(notice.duration())));
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some((_, countdown)) = self.notice.as_mut()
            && countdown.advance(dt)
        {
            self.notice = None;
        }
    }

    #[must_use]
    pub fn notice(&self) -> Option<AccessNotice> {
        self.notice.map(|(notice, _)| notice)
    }

    #[must_use]
    pub const fn prompt_open(&self) -> bool {
        self.prompt_open
    }

    #[must_use]
    pub const fn override_all(&self) -> bool {
        self.override_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> AccessCodes {
        AccessCodes {
            dev_mode: "babu".to_string(),
            finale: "hmmm-".to_string(),
        }
    }

    fn open_prompt(gate: &mut AccessGate) {
        for _ in 0..6 {
            assert!(!gate.tap_title());
        }
        assert!(gate.tap_title());
        assert!(gate.prompt_open());
    }

    #[test]
    fn seventh_tap_opens_the_prompt() {
        let mut gate = AccessGate::new(codes());
        assert_eq!(gate.enter_code("babu"), None);
        open_prompt(&mut gate);
        assert!(!gate.tap_title());
    }

    #[test]
    fn dev_code_unlocks_everything() {
        let mut gate = AccessGate::new(codes());
        open_prompt(&mut gate);
        assert_eq!(gate.enter_code(" babu "), Some(AccessOutcome::DevMode));
        assert!(gate.override_all());
        assert_eq!(gate.notice(), Some(AccessNotice::Unlocked));
        gate.tick(Duration::from_secs(3));
        assert_eq!(gate.notice(), None);
    }

    #[test]
    fn finale_code_requests_navigation_only() {
        let mut gate = AccessGate::new(codes());
        open_prompt(&mut gate);
        assert_eq!(gate.enter_code("hmmm-"), Some(AccessOutcome::Finale));
        assert!(!gate.override_all());
        assert_eq!(gate.notice(), None);
    }

    #[test]
    fn wrong_code_notice_clears_after_two_seconds() {
        let mut gate = AccessGate::new(codes());
        open_prompt(&mut gate);
        assert_eq!(gate.enter_code("guess"), Some(AccessOutcome::WrongCode));
        assert!(!gate.prompt_open());
        gate.tick(Duration::from_millis(1_500));
        assert_eq!(gate.notice(), Some(AccessNotice::WrongCode));
        gate.tick(Duration::from_millis(500));
        assert_eq!(gate.notice(), None);
    }

    #[test]
    fn url_flag_enables_override() {
        assert!(AccessGate::with_url_flag(codes(), "?lang=en&dev=true").override_all());
        assert!(!AccessGate::with_url_flag(codes(), "?dev=false").override_all());
        assert!(!AccessGate::with_url_flag(codes(), "").override_all());
    }
}
