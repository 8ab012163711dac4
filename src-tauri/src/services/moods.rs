//! Moods service
//!
//! One mood per guest, upserted by name. Tags outside the fixed set never
//! reach the wire.

use crate::error::Result;
use crate::store::models::Mood;
use crate::store::StoreClient;

/// Service for the mood board
#[derive(Clone)]
pub struct MoodsService {
    store: StoreClient,
}

impl MoodsService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// The guest's current mood, if one is set.
    pub async fn current(&self, guest: &str) -> Result<Option<Mood>> {
        self.store.get_mood(guest).await
    }

    /// Set or overwrite the guest's mood. `tag` must be one of the fixed
    /// tag set.
    pub async fn set(&self, guest: &str, tag: &str) -> Result<Mood> {
        let mood = tag.parse::<Mood>()?;
        self.store.set_mood(guest, mood).await?;

        tracing::debug!("Mood for {} set to {}", guest, mood);
        Ok(mood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn unknown_tag_is_rejected_before_the_wire() {
        let service = MoodsService::new(StoreClient::new(None).unwrap());

        // An unconfigured store would fail the write, so an unknown-mood
        // error proves validation ran first.
        let err = service.set("Alex", "feral-owl").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownMood(tag) if tag == "feral-owl"));
    }

    #[tokio::test]
    async fn known_tag_reaches_the_store() {
        let service = MoodsService::new(StoreClient::new(None).unwrap());

        let err = service.set("Alex", "quiet-moss").await.unwrap_err();
        assert!(matches!(err, AppError::StoreNotConfigured));
    }
}
