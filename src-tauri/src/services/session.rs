//! Session service
//!
//! The passphrase gate and the locally remembered guest identity. A
//! single shared magic word gates entry; on match the chosen guest name
//! is persisted to a JSON file in the app data directory with no further
//! proof of identity. This is a presentation guard, not a security
//! boundary — the word and the stored name are both client-visible and
//! unverified by the store.

use crate::config::{FALLBACK_GUEST_ROSTER, SESSION_FILE_NAME};
use crate::error::{AppError, Result};
use crate::store::StoreClient;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Service for the entry gate and the persisted session
#[derive(Clone)]
pub struct SessionService {
    session_path: PathBuf,
    magic_word: String,
    store: StoreClient,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    guest_name: String,
}

impl SessionService {
    pub fn new(app_data_dir: PathBuf, magic_word: String, store: StoreClient) -> Self {
        Self {
            session_path: app_data_dir.join(SESSION_FILE_NAME),
            magic_word,
            store,
        }
    }

    /// Lower-cased, trimmed comparison against the configured word.
    pub fn verify_magic_word(&self, word: &str) -> bool {
        word.trim().to_lowercase() == self.magic_word.trim().to_lowercase()
    }

    /// Check the magic word and persist the chosen guest name.
    pub async fn sign_in(&self, name: &str, magic_word: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Generic("A guest name is required".to_string()));
        }
        if !self.verify_magic_word(magic_word) {
            return Err(AppError::MagicWordRejected);
        }

        let session = StoredSession {
            guest_name: name.to_string(),
        };
        let content = serde_json::to_string_pretty(&session)?;
        fs::write(&self.session_path, content).await?;

        tracing::info!("Guest signed in: {}", name);
        Ok(name.to_string())
    }

    /// The stored guest name, if any. An unreadable session file counts
    /// as signed out.
    pub async fn current(&self) -> Option<String> {
        let content = fs::read_to_string(&self.session_path).await.ok()?;
        let session = match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Unreadable session file: {}", e);
                return None;
            }
        };

        if session.guest_name.is_empty() {
            return None;
        }
        Some(session.guest_name)
    }

    /// The stored guest name, or a typed error for protected operations.
    pub async fn require_current(&self) -> Result<String> {
        self.current().await.ok_or(AppError::NotSignedIn)
    }

    /// Clear the persisted session. Signing out twice is fine.
    pub async fn sign_out(&self) -> Result<()> {
        match fs::remove_file(&self.session_path).await {
            Ok(()) => {
                tracing::info!("Guest signed out");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Guest names for the entry screen picker: the store roster when it
    /// returns one, the built-in fallback otherwise.
    pub async fn roster(&self) -> Result<Vec<String>> {
        let guests = self.store.list_guests().await?;
        if !guests.is_empty() {
            return Ok(guests);
        }

        Ok(FALLBACK_GUEST_ROSTER
            .iter()
            .map(|name| name.to_string())
            .collect())
    }
}
