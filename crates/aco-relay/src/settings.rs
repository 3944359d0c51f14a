// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-destination configuration: enabled flag, active channels, persona.
//!
//! Records are created lazily. A destination that was never configured
//! behaves as enabled with no active channels, so the bot stays silent in
//! group destinations until an administrator activates a channel.

use dashmap::DashMap;

/// Settings of one group destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSettings {
    pub enabled: bool,
    /// Active channel ids in activation order, without duplicates.
    pub active_channels: Vec<String>,
    /// Persona override. `None` falls back to the store default.
    pub personality: Option<String>,
}

impl Default for DestinationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            active_channels: Vec::new(),
            personality: None,
        }
    }
}

impl DestinationSettings {
    /// Returns true when the bot should answer in `channel_id`.
    pub fn accepts(&self, channel_id: &str) -> bool {
        self.enabled && self.active_channels.iter().any(|c| c == channel_id)
    }
}

/// Result of activating a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddChannelOutcome {
    Added,
    AlreadyActive,
}

/// Result of deactivating a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveChannelOutcome {
    Removed,
    NotActive,
}

/// Enabled flag and active channel count reported by the status command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationStatus {
    pub enabled: bool,
    pub active_channels: usize,
}

/// Process-wide store of [`DestinationSettings`], keyed by destination id.
pub struct DestinationConfigStore {
    settings: DashMap<String, DestinationSettings>,
    default_personality: String,
}

impl DestinationConfigStore {
    pub fn new(default_personality: impl Into<String>) -> Self {
        Self {
            settings: DashMap::new(),
            default_personality: default_personality.into(),
        }
    }

    /// Returns the destination's settings, materializing the default record.
    pub fn get(&self, destination_id: &str) -> DestinationSettings {
        self.settings
            .entry(destination_id.to_string())
            .or_default()
            .clone()
    }

    pub fn status(&self, destination_id: &str) -> DestinationStatus {
        let settings = self.get(destination_id);
        DestinationStatus {
            enabled: settings.enabled,
            active_channels: settings.active_channels.len(),
        }
    }

    pub fn set_enabled(&self, destination_id: &str, enabled: bool) {
        self.settings
            .entry(destination_id.to_string())
            .or_default()
            .enabled = enabled;
    }

    pub fn add_channel(&self, destination_id: &str, channel_id: &str) -> AddChannelOutcome {
        let mut settings = self.settings.entry(destination_id.to_string()).or_default();
        if settings.active_channels.iter().any(|c| c == channel_id) {
            return AddChannelOutcome::AlreadyActive;
        }
        settings.active_channels.push(channel_id.to_string());
        AddChannelOutcome::Added
    }

    pub fn remove_channel(&self, destination_id: &str, channel_id: &str) -> RemoveChannelOutcome {
        let mut settings = self.settings.entry(destination_id.to_string()).or_default();
        match settings.active_channels.iter().position(|c| c == channel_id) {
            Some(index) => {
                settings.active_channels.remove(index);
                RemoveChannelOutcome::Removed
            }
            None => RemoveChannelOutcome::NotActive,
        }
    }

    pub fn list_channels(&self, destination_id: &str) -> Vec<String> {
        self.get(destination_id).active_channels
    }

    /// Stores a persona override verbatim. Length limits are the caller's concern.
    pub fn set_personality(&self, destination_id: &str, text: impl Into<String>) {
        self.settings
            .entry(destination_id.to_string())
            .or_default()
            .personality = Some(text.into());
    }

    /// Removes the persona override, keeping the rest of the record.
    pub fn reset_personality(&self, destination_id: &str) {
        if let Some(mut settings) = self.settings.get_mut(destination_id) {
            settings.personality = None;
        }
    }

    /// Override for the destination if one is set, else the default persona.
    pub fn personality(&self, destination_id: &str) -> String {
        self.settings
            .get(destination_id)
            .and_then(|settings| settings.personality.clone())
            .unwrap_or_else(|| self.default_personality().to_string())
    }

    /// Persona for an event scope; private destinations always get the default.
    pub fn personality_for(&self, destination_id: Option<&str>) -> String {
        match destination_id {
            Some(id) => self.personality(id),
            None => self.default_personality().to_string(),
        }
    }

    /// Persona used wherever no override applies.
    pub fn default_personality(&self) -> &str {
        &self.default_personality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DestinationConfigStore {
        DestinationConfigStore::new("be nice")
    }

    #[test]
    fn unknown_destination_is_enabled_without_channels() {
        let store = store();
        let status = store.status("guild-1");
        assert!(status.enabled);
        assert_eq!(status.active_channels, 0);
        assert_eq!(store.get("guild-1"), DestinationSettings::default());
    }

    #[test]
    fn add_channel_twice_reports_already_active() {
        let store = store();
        assert_eq!(store.add_channel("g", "c1"), AddChannelOutcome::Added);
        assert_eq!(store.add_channel("g", "c1"), AddChannelOutcome::AlreadyActive);
        assert_eq!(store.list_channels("g"), vec!["c1".to_string()]);
    }

    #[test]
    fn remove_missing_channel_reports_not_active() {
        let store = store();
        store.add_channel("g", "c1");
        store.add_channel("g", "c2");
        assert_eq!(store.remove_channel("g", "c3"), RemoveChannelOutcome::NotActive);
        assert_eq!(store.remove_channel("g", "c1"), RemoveChannelOutcome::Removed);
        assert_eq!(store.remove_channel("g", "c1"), RemoveChannelOutcome::NotActive);
        assert_eq!(store.list_channels("g"), vec!["c2".to_string()]);
    }

    #[test]
    fn set_enabled_is_idempotent() {
        let store = store();
        store.set_enabled("g", false);
        store.set_enabled("g", false);
        assert!(!store.get("g").enabled);
        store.set_enabled("g", true);
        assert!(store.get("g").enabled);
    }

    #[test]
    fn accepts_requires_enabled_and_active_channel() {
        let store = store();
        store.add_channel("g", "c1");
        assert!(store.get("g").accepts("c1"));
        assert!(!store.get("g").accepts("c2"));
        store.set_enabled("g", false);
        assert!(!store.get("g").accepts("c1"));
    }

    #[test]
    fn personality_falls_back_to_default() {
        let store = store();
        assert_eq!(store.default_personality(), "be nice");
        assert_eq!(store.personality("g"), store.default_personality());

        store.set_personality("g", "talk like a pirate");
        assert_eq!(store.personality("g"), "talk like a pirate");
        assert_eq!(store.personality("other"), "be nice");
        assert_eq!(store.personality_for(None), "be nice");
        assert_eq!(store.personality_for(Some("g")), "talk like a pirate");
    }

    #[test]
    fn reset_personality_keeps_channels_and_is_idempotent() {
        let store = store();
        store.add_channel("g", "c1");
        store.set_personality("g", "custom");
        store.reset_personality("g");
        store.reset_personality("g");
        store.reset_personality("never-seen");

        assert_eq!(store.personality("g"), "be nice");
        assert_eq!(store.list_channels("g"), vec!["c1".to_string()]);
    }
}
