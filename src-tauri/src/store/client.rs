//! Sheet store client
//!
//! One method per dispatch action on the remote endpoint. Every operation
//! is a single request/response round trip with no retry and no
//! idempotency key. Reads degrade to empty results or a well-defined
//! default with a warning; writes propagate a typed error. Heterogeneous
//! response shapes are normalized here and nowhere else.

use crate::config::STORE_USER_AGENT;
use crate::error::{AppError, Result};
use crate::store::models::{Event, GuestNote, MistLevel, Mood, RawEvent, RawNote, Rsvp};
use serde::Deserialize;
use serde_json::{json, Value};

/// Client for the sheet dispatch endpoint
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    script_url: Option<String>,
}

/// Acknowledgement body of a dispatch write
#[derive(Debug, Default, Deserialize)]
struct WriteAck {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

impl StoreClient {
    pub fn new(script_url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(STORE_USER_AGENT)
            .build()?;

        let script_url = script_url.filter(|url| !url.trim().is_empty());
        if script_url.is_none() {
            tracing::warn!("Sheet endpoint not configured; reads return empty results");
        }

        Ok(Self { http, script_url })
    }

    pub fn is_configured(&self) -> bool {
        self.script_url.is_some()
    }

    /// All events visible to `viewer`: every public event plus secret
    /// events whose invite list contains the viewer.
    pub async fn list_events(&self, viewer: &str) -> Result<Vec<Event>> {
        let Some(url) = self.script_url.as_deref() else {
            return Ok(Vec::new());
        };

        let payload = match self
            .fetch(url, &[("action", "getEvents"), ("userName", viewer)])
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to fetch events: {}", e);
                return Ok(Vec::new());
            }
        };

        let Some(rows) = unwrap_rows(payload, &["Itinerary", "events"]) else {
            tracing::warn!("Unexpected events payload shape");
            return Ok(Vec::new());
        };

        let events = rows
            .into_iter()
            .filter_map(parse_row::<RawEvent>)
            .map(Event::from)
            .filter(|event| event.visible_to(viewer))
            .collect();

        Ok(events)
    }

    /// Record one guest's answer for one event. The store merges the
    /// entry into the row's responses cell; an unknown id is a silent
    /// no-op there.
    pub async fn set_event_response(
        &self,
        event_id: &str,
        guest: &str,
        value: Rsvp,
    ) -> Result<()> {
        self.submit(json!({
            "action": "updateEventResponse",
            "eventId": event_id,
            "userName": guest,
            "response": value,
        }))
        .await
    }

    /// All notes on the wall, newest first. The store sorts already; the
    /// re-sort guarantees the contract when it does not, with ties
    /// keeping their fetched order.
    pub async fn list_notes(&self) -> Result<Vec<GuestNote>> {
        let Some(url) = self.script_url.as_deref() else {
            return Ok(Vec::new());
        };

        let payload = match self.fetch(url, &[("action", "getGuestNotes")]).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to fetch notes: {}", e);
                return Ok(Vec::new());
            }
        };

        let Some(rows) = unwrap_rows(payload, &["Wall", "notes"]) else {
            tracing::warn!("Unexpected notes payload shape");
            return Ok(Vec::new());
        };

        let mut notes: Vec<GuestNote> = rows
            .into_iter()
            .filter_map(parse_row::<RawNote>)
            .map(GuestNote::from)
            .collect();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(notes)
    }

    /// Append a note. The store assigns the id and the timestamp; the
    /// caller is responsible for capping the message length.
    pub async fn add_note(&self, name: &str, message: &str) -> Result<()> {
        self.submit(json!({
            "action": "addGuestNote",
            "name": name,
            "message": message,
        }))
        .await
    }

    /// Point lookup of a guest's mood. Unset, unknown tags, and failures
    /// all degrade to no mood.
    pub async fn get_mood(&self, guest: &str) -> Result<Option<Mood>> {
        let Some(url) = self.script_url.as_deref() else {
            return Ok(None);
        };

        let payload = match self
            .fetch(url, &[("action", "getUserMood"), ("userName", guest)])
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to fetch mood for {}: {}", guest, e);
                return Ok(None);
            }
        };

        let Some(tag) = payload.get("mood").and_then(Value::as_str) else {
            return Ok(None);
        };

        match tag.parse::<Mood>() {
            Ok(mood) => Ok(Some(mood)),
            Err(_) => {
                tracing::warn!("Store returned unknown mood tag: {:?}", tag);
                Ok(None)
            }
        }
    }

    /// Upsert a guest's mood, keyed by guest name.
    pub async fn set_mood(&self, guest: &str, mood: Mood) -> Result<()> {
        self.submit(json!({
            "action": "updateUserMood",
            "userName": guest,
            "mood": mood,
        }))
        .await
    }

    /// The singleton mist record, or its Unknown default when the table
    /// is empty or unreachable.
    pub async fn get_mist_level(&self) -> Result<MistLevel> {
        let Some(url) = self.script_url.as_deref() else {
            return Ok(MistLevel::unconfigured());
        };

        let payload = match self.fetch(url, &[("action", "getMistLevel")]).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to fetch mist level: {}", e);
                return Ok(MistLevel::unknown());
            }
        };

        match serde_json::from_value(payload) {
            Ok(mist) => Ok(mist),
            Err(e) => {
                tracing::warn!("Unexpected mist level payload: {}", e);
                Ok(MistLevel::unknown())
            }
        }
    }

    /// Guest names for the entry screen picker. Failures degrade to an
    /// empty roster; the session layer substitutes the fallback list.
    pub async fn list_guests(&self) -> Result<Vec<String>> {
        let Some(url) = self.script_url.as_deref() else {
            return Ok(Vec::new());
        };

        let payload = match self.fetch(url, &[("action", "getGuests")]).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to fetch guest roster: {}", e);
                return Ok(Vec::new());
            }
        };

        let Some(rows) = unwrap_rows(payload, &["Guests", "guests"]) else {
            tracing::warn!("Unexpected guest roster payload shape");
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect())
    }

    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn submit(&self, body: Value) -> Result<()> {
        let url = self
            .script_url
            .as_deref()
            .ok_or(AppError::StoreNotConfigured)?;

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        // The dispatch script answers {success: true} or {error: ...};
        // bodies that match neither are ignored.
        let ack: WriteAck = response.json().await.unwrap_or_default();
        if let Some(message) = ack.error {
            return Err(AppError::StoreRejected(message));
        }
        if ack.success == Some(false) {
            return Err(AppError::StoreRejected("store reported failure".to_string()));
        }

        Ok(())
    }
}

/// Accept a bare list or a wrapper object keyed by one of the
/// conventional field names; anything else is an unrecognized shape.
fn unwrap_rows(payload: Value, wrappers: &[&str]) -> Option<Vec<Value>> {
    match payload {
        Value::Array(rows) => Some(rows),
        Value::Object(mut map) => wrappers.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(rows)) => Some(rows),
            _ => None,
        }),
        _ => None,
    }
}

fn parse_row<T: serde::de::DeserializeOwned>(row: Value) -> Option<T> {
    match serde_json::from_value(row) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Skipping unparseable row: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_rows_accepts_bare_list() {
        let rows = unwrap_rows(json!([1, 2]), &["Itinerary", "events"]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn unwrap_rows_accepts_any_conventional_wrapper() {
        let rows = unwrap_rows(json!({"Itinerary": [1]}), &["Itinerary", "events"]).unwrap();
        assert_eq!(rows.len(), 1);

        let rows = unwrap_rows(json!({"events": [1, 2, 3]}), &["Itinerary", "events"]).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn unwrap_rows_rejects_unrecognized_shapes() {
        assert!(unwrap_rows(json!({"rows": [1]}), &["Itinerary", "events"]).is_none());
        assert!(unwrap_rows(json!("oops"), &["Itinerary", "events"]).is_none());
        assert!(unwrap_rows(json!({"Itinerary": "oops"}), &["Itinerary", "events"]).is_none());
    }

    #[tokio::test]
    async fn unconfigured_client_degrades_reads_and_fails_writes() {
        let store = StoreClient::new(None).unwrap();

        assert!(!store.is_configured());
        assert!(store.list_events("Alex").await.unwrap().is_empty());
        assert!(store.list_notes().await.unwrap().is_empty());
        assert!(store.list_guests().await.unwrap().is_empty());
        assert_eq!(store.get_mood("Alex").await.unwrap(), None);

        let mist = store.get_mist_level().await.unwrap();
        assert_eq!(mist.level, "Unknown");
        assert_eq!(mist.message, "Configuration needed");

        let err = store.add_note("Alex", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::StoreNotConfigured));

        let err = store
            .set_event_response("e1", "Alex", Rsvp::In)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StoreNotConfigured));
    }

    #[tokio::test]
    async fn blank_endpoint_counts_as_unconfigured() {
        let store = StoreClient::new(Some("   ".to_string())).unwrap();
        assert!(!store.is_configured());
    }
}
