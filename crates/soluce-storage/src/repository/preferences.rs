//! Theme preference and the last-known tier cache.

use serde::{Deserialize, Serialize};

use soluce_core::Tier;

use crate::guarded::GuardedStore;
use crate::keys;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    store: GuardedStore,
}

impl PreferenceStore {
    pub fn new(store: GuardedStore) -> Self {
        Self { store }
    }

    /// Stored theme; anything but "dark" reads as light.
    pub fn theme(&self) -> Theme {
        match self.store.read(keys::THEME).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.store.write(keys::THEME, theme.as_str())
    }

    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    /// Last resolved tier. Unknown values normalize to Free.
    pub fn last_known_tier(&self) -> Tier {
        self.store
            .read(keys::LICENSE_TIER)
            .map(|raw| Tier::normalize(&raw))
            .unwrap_or_default()
    }

    pub fn set_last_known_tier(&self, tier: Tier) -> bool {
        self.store.write(keys::LICENSE_TIER, tier.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryStore;

    fn prefs() -> PreferenceStore {
        PreferenceStore::new(GuardedStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_theme_toggle_persists() {
        let prefs = prefs();
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.toggle_theme(), Theme::Dark);
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn test_corrupted_tier_cache_reads_free() {
        let store = GuardedStore::new(Arc::new(MemoryStore::new()));
        store.write(keys::LICENSE_TIER, "gold");
        assert_eq!(PreferenceStore::new(store).last_known_tier(), Tier::Free);
    }
}
