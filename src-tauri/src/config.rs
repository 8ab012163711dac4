//! Application configuration
//!
//! Validation constants plus the deployment-time configuration surface:
//! the sheet dispatch endpoint, the shared magic word, and the optional
//! spreadsheet link for the admin affordance. Values come from
//! `portal.json` in the app data directory, overridden by environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

// ===== Validation Limits =====

/// Maximum length for a guest note message in characters.
/// The sheet does not enforce this; the client must cap before submission.
pub const MAX_NOTE_MESSAGE_CHARS: usize = 200;

// ===== File Names =====

/// Deployment configuration file inside the app data directory
pub const CONFIG_FILE_NAME: &str = "portal.json";

/// Persisted session file inside the app data directory
pub const SESSION_FILE_NAME: &str = "session.json";

// ===== Store Client =====

/// User agent sent with every sheet dispatch request
pub const STORE_USER_AGENT: &str = "RedwoodPortal";

// ===== Guest Roster =====

/// Fallback guest names shown on the entry screen when the sheet does not
/// return a roster
pub const FALLBACK_GUEST_ROSTER: &[&str] = &[
    "Stef", "Alex", "Jordan", "Morgan", "Riley", "Casey", "Taylor", "Sam",
];

// ===== Environment Overrides =====

pub const ENV_SCRIPT_URL: &str = "REDWOOD_SCRIPT_URL";
pub const ENV_MAGIC_WORD: &str = "REDWOOD_MAGIC_WORD";
pub const ENV_SHEET_URL: &str = "REDWOOD_SHEET_URL";
pub const ENV_ADMIN_NAME: &str = "REDWOOD_ADMIN_NAME";

/// Deployment-time configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Web App URL of the sheet dispatch script. Reads degrade to empty
    /// results and writes fail while this is unset.
    #[serde(default)]
    pub script_url: Option<String>,
    /// Shared passphrase gating entry; compared trimmed and lower-cased
    #[serde(default = "default_magic_word")]
    pub magic_word: String,
    /// Direct link to the spreadsheet, shown to the admin guest
    #[serde(default)]
    pub sheet_url: Option<String>,
    /// Guest name granted the admin affordance
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
}

fn default_magic_word() -> String {
    "redwood".to_string()
}

fn default_admin_name() -> String {
    "Stef".to_string()
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            script_url: None,
            magic_word: default_magic_word(),
            sheet_url: None,
            admin_name: default_admin_name(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from `portal.json` under `app_data_dir`,
    /// then apply environment overrides. Never fails; missing or
    /// malformed sources fall back to defaults with a warning.
    pub fn load(app_data_dir: &Path) -> Self {
        let mut config = Self::read_file(&app_data_dir.join(CONFIG_FILE_NAME));

        if let Some(url) = env_value(ENV_SCRIPT_URL) {
            config.script_url = Some(url);
        }
        if let Some(word) = env_value(ENV_MAGIC_WORD) {
            config.magic_word = word;
        }
        if let Some(url) = env_value(ENV_SHEET_URL) {
            config.sheet_url = Some(url);
        }
        if let Some(name) = env_value(ENV_ADMIN_NAME) {
            config.admin_name = name;
        }

        config.normalize();
        config
    }

    fn read_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::info!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", CONFIG_FILE_NAME, e);
                Self::default()
            }
        }
    }

    /// Drop blank values so a present-but-empty field behaves like an
    /// absent one.
    fn normalize(&mut self) {
        if let Some(url) = &self.script_url {
            if url.trim().is_empty() {
                self.script_url = None;
            }
        }
        if let Some(url) = &self.sheet_url {
            if url.trim().is_empty() {
                self.sheet_url = None;
            }
        }
    }

    /// Whether `guest` holds the admin affordance
    pub fn is_admin(&self, guest: &str) -> bool {
        guest == self.admin_name
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_file_present() {
        let temp = TempDir::new().unwrap();
        let config = PortalConfig::read_file(&temp.path().join(CONFIG_FILE_NAME));

        assert_eq!(config.script_url, None);
        assert_eq!(config.magic_word, "redwood");
        assert_eq!(config.sheet_url, None);
        assert_eq!(config.admin_name, "Stef");
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"script_url": "https://example.test/exec"}"#).unwrap();

        let config = PortalConfig::read_file(&path);

        assert_eq!(
            config.script_url.as_deref(),
            Some("https://example.test/exec")
        );
        assert_eq!(config.magic_word, "redwood");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();

        let config = PortalConfig::read_file(&path);

        assert_eq!(config.magic_word, "redwood");
    }

    #[test]
    fn blank_urls_are_treated_as_unset() {
        let mut config = PortalConfig {
            script_url: Some("   ".to_string()),
            sheet_url: Some(String::new()),
            ..PortalConfig::default()
        };
        config.normalize();

        assert_eq!(config.script_url, None);
        assert_eq!(config.sheet_url, None);
    }

    #[test]
    fn admin_check_matches_configured_name_exactly() {
        let config = PortalConfig::default();

        assert!(config.is_admin("Stef"));
        assert!(!config.is_admin("stef"));
        assert!(!config.is_admin("Alex"));
    }
}
