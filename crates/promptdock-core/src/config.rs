//! Persisted widget configuration and the storage boundary.
//!
//! One config per hostname, stored as JSON under a host-derived key. Loading
//! is tolerant by contract: absent or malformed data falls back to defaults,
//! and a partial blob merges field-by-field over the host defaults so older
//! entries keep working.

use serde::{Deserialize, Serialize};

/// Coordinate sentinel: the control has never been positioned on this host.
pub const UNSET: i32 = -1;

/// Key prefix shared by every host's config entry.
const STORAGE_KEY_PREFIX: &str = "promptdock";

/// Hosts where the widget starts visible without user opt-in. Substring
/// match against the hostname, so `grok` also covers `grok.com` mirrors.
const DEFAULT_VISIBLE_HOSTS: &[&str] = &[
    "chatgpt.com",
    "openai.com",
    "claude.ai",
    "perplexity.ai",
    "gemini.google.com",
    "copilot.microsoft.com",
    "grok",
    "x.com",
    "aistudio.google.com",
    "poe.com",
];

/// Storage key for a host's configuration.
pub fn storage_key(hostname: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}_{hostname}")
}

/// Whether the widget defaults to visible on this host.
pub fn default_visible(hostname: &str) -> bool {
    DEFAULT_VISIBLE_HOSTS
        .iter()
        .any(|domain| hostname.contains(domain))
}

/// Persisted widget configuration for one host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WidgetConfig {
    /// Left edge of the control, px. [`UNSET`] until first positioned.
    pub x: i32,
    /// Top edge of the control, px. [`UNSET`] until first positioned.
    pub y: i32,
    /// Whether the control is shown at all.
    pub visible: bool,
}

impl WidgetConfig {
    /// Starting configuration for a host: unset position, visible only on
    /// the known chat domains.
    pub fn for_host(hostname: &str) -> Self {
        Self {
            x: UNSET,
            y: UNSET,
            visible: default_visible(hostname),
        }
    }

    /// True while either coordinate still holds the sentinel, meaning the
    /// default placement rule applies.
    pub fn is_unpositioned(&self) -> bool {
        self.x == UNSET || self.y == UNSET
    }

    /// Record a concrete position.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

/// A configuration as read back from storage: every field optional, so a
/// blob written by an older build (or edited by hand) only overrides what
/// it actually carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StoredConfig {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub visible: Option<bool>,
}

impl StoredConfig {
    /// Merge over the defaults for `hostname`: stored fields win, missing
    /// ones keep the host rule (notably the hostname-sensitive `visible`).
    pub fn into_config(self, hostname: &str) -> WidgetConfig {
        let defaults = WidgetConfig::for_host(hostname);
        WidgetConfig {
            x: self.x.unwrap_or(defaults.x),
            y: self.y.unwrap_or(defaults.y),
            visible: self.visible.unwrap_or(defaults.visible),
        }
    }
}

/// Key-value persistence boundary for [`WidgetConfig`].
///
/// Implementations are tolerant: `load` answers `None` for absent or
/// corrupt data, and `store` failures are logged, never raised. Reads come
/// back as [`StoredConfig`] so partial data merges instead of zeroing
/// missing fields.
pub trait ConfigStore {
    fn load(&self, key: &str) -> Option<StoredConfig>;
    fn store(&self, key: &str, config: &WidgetConfig);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_host_scoped() {
        assert_eq!(storage_key("claude.ai"), "promptdock_claude.ai");
        assert_ne!(storage_key("a.example"), storage_key("b.example"));
    }

    #[test]
    fn test_default_visible_on_chat_hosts_only() {
        assert!(default_visible("chatgpt.com"));
        assert!(default_visible("www.perplexity.ai"));
        assert!(default_visible("grok.example.net")); // substring match
        assert!(!default_visible("docs.rs"));
        assert!(!default_visible("example.com"));
    }

    #[test]
    fn test_for_host_starts_unpositioned() {
        let config = WidgetConfig::for_host("claude.ai");
        assert!(config.is_unpositioned());
        assert!(config.visible);

        let config = WidgetConfig::for_host("example.com");
        assert!(!config.visible);
    }

    #[test]
    fn test_unpositioned_until_both_coords_set() {
        let mut config = WidgetConfig::for_host("example.com");
        config.x = 120;
        assert!(config.is_unpositioned());
        config.y = 40;
        assert!(!config.is_unpositioned());
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let config = WidgetConfig {
            x: 1204,
            y: 80,
            visible: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        let stored: StoredConfig = serde_json::from_str(&json).unwrap();

        // A full blob overrides every default, whatever the host.
        assert_eq!(stored.into_config("example.com"), config);
        assert_eq!(stored.into_config("claude.ai"), config);
    }

    #[test]
    fn test_partial_json_merges_over_host_defaults() {
        let stored: StoredConfig = serde_json::from_str(r#"{"x":33,"y":44}"#).unwrap();

        // A blob without `visible` keeps the hostname rule either way.
        let on_chat_host = stored.into_config("claude.ai");
        assert_eq!((on_chat_host.x, on_chat_host.y), (33, 44));
        assert!(on_chat_host.visible);
        assert!(!stored.into_config("example.com").visible);

        let stored: StoredConfig = serde_json::from_str(r#"{"visible":true}"#).unwrap();
        let config = stored.into_config("example.com");
        assert!(config.visible);
        assert!(config.is_unpositioned());
    }

    #[test]
    fn test_empty_json_is_all_defaults() {
        let stored: StoredConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(stored, StoredConfig::default());
        assert_eq!(
            stored.into_config("claude.ai"),
            WidgetConfig::for_host("claude.ai")
        );
    }

    #[test]
    fn test_malformed_json_is_an_error_not_a_panic() {
        assert!(serde_json::from_str::<StoredConfig>("{not json").is_err());
        assert!(serde_json::from_str::<StoredConfig>(r#"{"x":"left"}"#).is_err());
    }
}
