//! Notes service
//!
//! The shared wall: list newest-first, append after validating. The sheet
//! does not enforce the message cap, so it is enforced here before
//! anything touches the wire.

use crate::config::MAX_NOTE_MESSAGE_CHARS;
use crate::error::{AppError, Result};
use crate::store::models::GuestNote;
use crate::store::StoreClient;

/// Service for the whispering wall
#[derive(Clone)]
pub struct NotesService {
    store: StoreClient,
}

impl NotesService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// All notes, newest first.
    pub async fn list(&self) -> Result<Vec<GuestNote>> {
        self.store.list_notes().await
    }

    /// Append a note for `author`. The message is trimmed; empty and
    /// over-cap messages are rejected before submission. The store
    /// assigns the id and timestamp, so the view re-fetches after a
    /// successful add.
    pub async fn add(&self, author: &str, message: &str) -> Result<()> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::EmptyNote);
        }

        let len = message.chars().count();
        if len > MAX_NOTE_MESSAGE_CHARS {
            return Err(AppError::NoteTooLong {
                len,
                max: MAX_NOTE_MESSAGE_CHARS,
            });
        }

        tracing::info!("Adding note from {} ({} chars)", author, len);
        self.store.add_note(author, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> NotesService {
        NotesService::new(StoreClient::new(None).unwrap())
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let service = create_test_service();

        let err = service.add("Alex", "   \n").await.unwrap_err();
        assert!(matches!(err, AppError::EmptyNote));
    }

    #[tokio::test]
    async fn over_cap_message_is_rejected() {
        let service = create_test_service();
        let message = "🌲".repeat(MAX_NOTE_MESSAGE_CHARS + 1);

        let err = service.add("Alex", &message).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::NoteTooLong { len, max }
                if len == MAX_NOTE_MESSAGE_CHARS + 1 && max == MAX_NOTE_MESSAGE_CHARS
        ));
    }

    #[tokio::test]
    async fn valid_message_passes_validation() {
        let service = create_test_service();
        let message = "a".repeat(MAX_NOTE_MESSAGE_CHARS);

        // Validation passed; only the unconfigured store stops the write.
        let err = service.add("Alex", &message).await.unwrap_err();
        assert!(matches!(err, AppError::StoreNotConfigured));
    }
}
