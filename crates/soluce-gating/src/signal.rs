//! Upgrade prompt state machine.
//!
//! `Idle -> Visible -> Dismissed -> Idle`. A trigger from any state shows
//! the new prompt, replacing whatever was visible. No queue, no timeout.

use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

use soluce_core::config::UpgradeConfig;
use soluce_core::Tier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradePrompt {
    pub reason: String,
    pub required_tier: Tier,
    /// Checkout link for `required_tier`, when one is configured.
    pub payment_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum UpgradePromptState {
    #[default]
    Idle,
    Visible(UpgradePrompt),
    Dismissed,
}

impl UpgradePromptState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }
}

pub struct UpgradeSignal {
    state: Mutex<UpgradePromptState>,
    links: UpgradeConfig,
}

impl UpgradeSignal {
    pub fn new(links: UpgradeConfig) -> Self {
        Self {
            state: Mutex::new(UpgradePromptState::Idle),
            links,
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut UpgradePromptState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }

    /// Show a prompt, replacing any visible one.
    pub fn trigger(&self, reason: impl Into<String>, required_tier: Tier) {
        let prompt = UpgradePrompt {
            reason: reason.into(),
            required_tier,
            payment_link: self.links.payment_link(required_tier).map(str::to_string),
        };
        debug!(reason = %prompt.reason, required_tier = %required_tier, "Upgrade prompt shown");
        self.with_state(|state| *state = UpgradePromptState::Visible(prompt));
    }

    /// Visible -> Dismissed. Returns whether a prompt was dismissed.
    pub fn dismiss(&self) -> bool {
        self.with_state(|state| {
            if state.is_visible() {
                *state = UpgradePromptState::Dismissed;
                true
            } else {
                false
            }
        })
    }

    /// Dismissed -> Idle.
    pub fn acknowledge(&self) -> bool {
        self.with_state(|state| {
            if *state == UpgradePromptState::Dismissed {
                *state = UpgradePromptState::Idle;
                true
            } else {
                false
            }
        })
    }

    pub fn current(&self) -> UpgradePromptState {
        self.with_state(|state| state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> UpgradeSignal {
        UpgradeSignal::new(UpgradeConfig::default())
    }

    #[test]
    fn test_full_cycle() {
        let s = signal();
        assert_eq!(s.current(), UpgradePromptState::Idle);
        assert!(!s.dismiss());

        s.trigger("Vendor limit reached (5)", Tier::Pro);
        assert!(s.current().is_visible());
        assert!(!s.acknowledge());

        assert!(s.dismiss());
        assert_eq!(s.current(), UpgradePromptState::Dismissed);
        assert!(s.acknowledge());
        assert_eq!(s.current(), UpgradePromptState::Idle);
    }

    #[test]
    fn test_new_trigger_overwrites() {
        let s = signal();
        s.trigger("first", Tier::Pro);
        s.trigger("second", Tier::Enterprise);
        match s.current() {
            UpgradePromptState::Visible(p) => {
                assert_eq!(p.reason, "second");
                assert_eq!(p.required_tier, Tier::Enterprise);
            }
            other => panic!("expected visible prompt, got {other:?}"),
        }
    }

    #[test]
    fn test_trigger_from_dismissed() {
        let s = signal();
        s.trigger("first", Tier::Pro);
        s.dismiss();
        s.trigger("again", Tier::Pro);
        assert!(s.current().is_visible());
    }

    #[test]
    fn test_payment_link_attached() {
        let s = signal();
        s.trigger("PDF export", Tier::Pro);
        if let UpgradePromptState::Visible(p) = s.current() {
            assert!(p.payment_link.is_some());
        }
    }
}
