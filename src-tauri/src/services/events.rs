//! Events service
//!
//! The itinerary/RSVP loop and the timeline. Holds the last-fetched event
//! list as a local cache so a successful toggle patches state in place
//! instead of re-fetching; a failed toggle leaves the cache untouched so
//! the guest can retry manually.

use crate::error::{AppError, Result};
use crate::store::models::{Event, MistLevel, Rsvp};
use crate::store::StoreClient;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The Forest Path view: mist banner plus events in date order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub mist_level: MistLevel,
    pub events: Vec<Event>,
}

/// Service for the itinerary, RSVP toggles, and the timeline
#[derive(Clone)]
pub struct EventsService {
    store: StoreClient,
    cache: Arc<Mutex<Vec<Event>>>,
    /// (event id, guest) pairs with a toggle currently on the wire
    in_flight: Arc<Mutex<HashSet<(String, String)>>>,
}

impl EventsService {
    pub fn new(store: StoreClient) -> Self {
        Self {
            store,
            cache: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Fetch the events visible to `viewer` and replace the cache.
    pub async fn refresh(&self, viewer: &str) -> Result<Vec<Event>> {
        let events = self.store.list_events(viewer).await?;
        *self.cache.lock().await = events.clone();
        Ok(events)
    }

    /// The cached copy of the last refresh.
    pub async fn cached(&self) -> Vec<Event> {
        self.cache.lock().await.clone()
    }

    /// Flip one guest's answer for one event; no recorded answer toggles
    /// to in. Only one toggle per (event, guest) may be in flight;
    /// toggles on different events are independent.
    pub async fn toggle_response(&self, event_id: &str, guest: &str) -> Result<Rsvp> {
        let key = (event_id.to_string(), guest.to_string());
        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(key.clone()) {
                return Err(AppError::UpdateInFlight(event_id.to_string()));
            }
        }

        let result = self.record_toggle(event_id, guest).await;
        self.in_flight.lock().await.remove(&key);
        result
    }

    async fn record_toggle(&self, event_id: &str, guest: &str) -> Result<Rsvp> {
        let current = self
            .cache
            .lock()
            .await
            .iter()
            .find(|event| event.id == event_id)
            .and_then(|event| event.response_of(guest));
        let next = Rsvp::toggled(current);

        self.store.set_event_response(event_id, guest, next).await?;

        // Patch the local copy; an id the cache no longer holds was a
        // silent no-op at the store as well.
        let mut cache = self.cache.lock().await;
        if let Some(event) = cache.iter_mut().find(|event| event.id == event_id) {
            event.record_response(guest, next);
        }

        tracing::debug!("Recorded response {} for event {} by {}", next, event_id, guest);
        Ok(next)
    }

    /// Assemble the timeline: events and mist level fetched concurrently,
    /// events sorted by date ascending.
    pub async fn timeline(&self, viewer: &str) -> Result<Timeline> {
        let (events, mist_level) =
            tokio::join!(self.store.list_events(viewer), self.store.get_mist_level());

        let mut events = events?;
        sort_by_date(&mut events);

        Ok(Timeline {
            mist_level: mist_level?,
            events,
        })
    }
}

/// Date order, earliest first; unparseable dates sort before everything
/// else and ties keep their fetched order.
fn sort_by_date(events: &mut [Event]) {
    events.sort_by_key(|event| parse_event_date(&event.date));
}

fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn event(id: &str, date: &str) -> Event {
        Event {
            id: id.to_string(),
            name: format!("Event {id}"),
            date: date.to_string(),
            time: String::new(),
            description: String::new(),
            is_secret: false,
            invite_list: Vec::new(),
            responses: HashMap::new(),
        }
    }

    #[test]
    fn sort_by_date_orders_earliest_first() {
        let mut events = vec![
            event("late", "2026-10-01"),
            event("early", "2026-08-15"),
            event("mid", "2026-09-12"),
        ];

        sort_by_date(&mut events);

        let order: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["early", "mid", "late"]);
    }

    #[test]
    fn unparseable_dates_sort_first_and_keep_fetched_order() {
        let mut events = vec![
            event("dated", "2026-08-15"),
            event("vague-a", "sometime soon"),
            event("vague-b", ""),
        ];

        sort_by_date(&mut events);

        let order: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["vague-a", "vague-b", "dated"]);
    }

    #[test]
    fn accepts_common_sheet_date_formats() {
        assert!(parse_event_date("2026-09-12").is_some());
        assert!(parse_event_date("9/12/2026").is_some());
        assert!(parse_event_date("2026-09-12T00:00:00.000Z").is_some());
        assert!(parse_event_date("the autumn equinox").is_none());
    }

    #[tokio::test]
    async fn toggle_with_unconfigured_store_fails_and_cache_is_untouched() {
        let service = EventsService::new(StoreClient::new(None).unwrap());

        let err = service.toggle_response("e1", "Alex").await.unwrap_err();
        assert!(matches!(err, AppError::StoreNotConfigured));
        assert!(service.cached().await.is_empty());

        // The in-flight guard was released; the retry fails the same way
        // rather than reporting a pending update.
        let err = service.toggle_response("e1", "Alex").await.unwrap_err();
        assert!(matches!(err, AppError::StoreNotConfigured));
    }
}
