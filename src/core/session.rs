//! Per-session identity, connectivity, and gamification state.

use crate::core::sanitize::sanitize;

/// Connection lifecycle as seen by the rest of the app.
///
/// Only transport events move this value; command handlers and the router
/// read it but never write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkState {
    pub fn indicator(self) -> &'static str {
        match self {
            LinkState::Disconnected => "OFFLINE",
            LinkState::Connecting => "LINKING",
            LinkState::Connected => "ONLINE",
        }
    }

    pub fn is_connected(self) -> bool {
        self == LinkState::Connected
    }
}

/// The static menu panels. Only `Chat` is interactive; the rest render
/// fixed placeholder content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPanel {
    Chat,
    Api,
    Local,
    Admin,
    Monitor,
    Dev,
    Apps,
    Shell,
}

impl MenuPanel {
    pub const ALL: [MenuPanel; 8] = [
        MenuPanel::Chat,
        MenuPanel::Api,
        MenuPanel::Local,
        MenuPanel::Admin,
        MenuPanel::Monitor,
        MenuPanel::Dev,
        MenuPanel::Apps,
        MenuPanel::Shell,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MenuPanel::Chat => "CHAT",
            MenuPanel::Api => "API",
            MenuPanel::Local => "LOCAL",
            MenuPanel::Admin => "ADMIN",
            MenuPanel::Monitor => "MONITOR",
            MenuPanel::Dev => "DEV",
            MenuPanel::Apps => "APPS",
            MenuPanel::Shell => "SHELL",
        }
    }

    /// Placeholder body for the non-interactive panels.
    pub fn placeholder(self) -> &'static str {
        match self {
            MenuPanel::Chat => "",
            MenuPanel::Api => "REMOTE API RELAY\n\nNO UPSTREAM CONFIGURED.",
            MenuPanel::Local => "LOCAL NODE\n\nSTANDALONE MODE.",
            MenuPanel::Admin => "ADMIN CONSOLE\n\nACCESS RESTRICTED.",
            MenuPanel::Monitor => "MONITOR\n\nNO PROBES ATTACHED.",
            MenuPanel::Dev => "DEV TOOLS\n\nNOTHING TO DEBUG.",
            MenuPanel::Apps => "APPS\n\nNO MODULES INSTALLED.",
            MenuPanel::Shell => "SHELL\n\nINTERPRETER OFFLINE.",
        }
    }

    pub fn next(self) -> MenuPanel {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// State that lives for the whole process: identity, link, counters, menu.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub nickname: String,
    pub link: LinkState,
    pub level: u32,
    pub experience: u32,
    pub menu: MenuPanel,
}

impl SessionState {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: sanitize(&nickname.into()),
            link: LinkState::Disconnected,
            level: 1,
            experience: 0,
            menu: MenuPanel::Chat,
        }
    }

    /// Replace the nickname (sanitized) and return the old one.
    pub fn set_nickname(&mut self, name: &str) -> String {
        std::mem::replace(&mut self.nickname, sanitize(name))
    }

    /// Experience points needed before the next level-up fires.
    pub fn threshold(&self) -> u32 {
        self.level * 10
    }

    /// Award one point for a successfully sent message. Returns the new
    /// level when the threshold was reached, which also resets experience.
    pub fn grant_experience(&mut self) -> Option<u32> {
        self.experience += 1;
        if self.experience >= self.threshold() {
            self.experience = 0;
            self.level += 1;
            Some(self.level)
        } else {
            None
        }
    }

    /// Manual `/levelup` override: bumps the level without touching the
    /// experience counter.
    pub fn force_level_up(&mut self) -> u32 {
        self.level += 1;
        self.level
    }
}

/// Default identity: `Anon` plus a pseudo-random four-digit suffix.
pub fn random_nickname() -> String {
    let mut buf = [0u8; 2];
    let suffix = match getrandom::fill(&mut buf) {
        Ok(()) => u32::from(u16::from_le_bytes(buf)) % 10_000,
        Err(_) => 0,
    };
    format!("Anon{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_scales_with_level() {
        let mut session = SessionState::new("Ghost");
        assert_eq!(session.threshold(), 10);
        session.level = 3;
        assert_eq!(session.threshold(), 30);
    }

    #[test]
    fn level_up_fires_exactly_at_threshold_and_resets_experience() {
        let mut session = SessionState::new("Ghost");
        for _ in 0..9 {
            assert_eq!(session.grant_experience(), None);
        }
        assert_eq!(session.experience, 9);
        assert_eq!(session.grant_experience(), Some(2));
        assert_eq!(session.level, 2);
        assert_eq!(session.experience, 0);
        // Next threshold is 20 sends.
        for _ in 0..19 {
            assert_eq!(session.grant_experience(), None);
        }
        assert_eq!(session.grant_experience(), Some(3));
    }

    #[test]
    fn force_level_up_leaves_experience_alone() {
        let mut session = SessionState::new("Ghost");
        session.experience = 7;
        assert_eq!(session.force_level_up(), 2);
        assert_eq!(session.experience, 7);
    }

    #[test]
    fn nickname_is_sanitized_on_assignment() {
        let mut session = SessionState::new("Ghost");
        let old = session.set_nickname("<i>Spy</i>");
        assert_eq!(old, "Ghost");
        assert_eq!(session.nickname, "&lt;i&gt;Spy&lt;/i&gt;");
    }

    #[test]
    fn panels_cycle_back_to_chat() {
        let mut panel = MenuPanel::Chat;
        for _ in 0..MenuPanel::ALL.len() {
            panel = panel.next();
        }
        assert_eq!(panel, MenuPanel::Chat);
    }

    #[test]
    fn random_nickname_has_default_prefix() {
        assert!(random_nickname().starts_with("Anon"));
    }
}
