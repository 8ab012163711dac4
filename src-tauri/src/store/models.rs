//! Sheet store models
//!
//! Canonical records for the four sheet tables, plus the lenient wire
//! representations the dispatch script actually emits. Sheet cells are
//! untyped: the secrecy flag arrives as a bool or a "TRUE"/"true" string,
//! the invite list as a comma-separated cell, and the responses mapping as
//! a serialized JSON cell that may not parse at all.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A guest's recorded answer for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rsvp {
    In,
    Out,
}

impl Rsvp {
    /// The answer a toggle action records, given the currently rendered
    /// state. No recorded answer counts as out, so the first toggle is
    /// always in.
    pub fn toggled(current: Option<Rsvp>) -> Rsvp {
        match current {
            Some(Rsvp::In) => Rsvp::Out,
            Some(Rsvp::Out) | None => Rsvp::In,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rsvp::In => "in",
            Rsvp::Out => "out",
        }
    }
}

impl fmt::Display for Rsvp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rsvp {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(Rsvp::In),
            "out" => Ok(Rsvp::Out),
            other => Err(AppError::Generic(format!("unknown response: {other}"))),
        }
    }
}

/// A gathering on the itinerary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub is_secret: bool,
    pub invite_list: Vec<String>,
    /// Sparse mapping; guests with no entry have not responded yet
    pub responses: HashMap<String, Rsvp>,
}

impl Event {
    /// A secret event is visible only to guests on its invite list.
    pub fn visible_to(&self, viewer: &str) -> bool {
        !self.is_secret || self.invite_list.iter().any(|name| name == viewer)
    }

    pub fn response_of(&self, guest: &str) -> Option<Rsvp> {
        self.responses.get(guest).copied()
    }

    /// Patch the local copy after a successful store write.
    pub fn record_response(&mut self, guest: &str, value: Rsvp) {
        self.responses.insert(guest.to_string(), value);
    }
}

/// A note on the shared wall, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestNote {
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// The singleton atmosphere record, read-only from the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistLevel {
    #[serde(default = "unknown_level")]
    pub level: String,
    #[serde(default)]
    pub message: String,
}

fn unknown_level() -> String {
    "Unknown".to_string()
}

impl MistLevel {
    /// Default used when the table is empty or unreachable
    pub fn unknown() -> Self {
        Self {
            level: unknown_level(),
            message: String::new(),
        }
    }

    /// Default used when no endpoint is configured at all
    pub fn unconfigured() -> Self {
        Self {
            level: unknown_level(),
            message: "Configuration needed".to_string(),
        }
    }
}

/// The fixed set of woodland moods a guest may hold, one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    QuietMoss,
    ChaoticSquirrel,
    AncientBurl,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::QuietMoss => "quiet-moss",
            Mood::ChaoticSquirrel => "chaotic-squirrel",
            Mood::AncientBurl => "ancient-burl",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "quiet-moss" => Ok(Mood::QuietMoss),
            "chaotic-squirrel" => Ok(Mood::ChaoticSquirrel),
            "ancient-burl" => Ok(Mood::AncientBurl),
            other => Err(AppError::UnknownMood(other.to_string())),
        }
    }
}

// ===== Responses cell semantics =====

/// Parse a serialized responses cell. A cell that is not valid JSON, not
/// an object, or carries entries that are not "in"/"out" degrades to the
/// empty mapping entry by entry.
pub fn parse_responses(raw: &str) -> HashMap<String, Rsvp> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => responses_from_value(&value),
        Err(_) => HashMap::new(),
    }
}

/// Merge one guest's answer into a serialized responses cell and
/// re-serialize. This is the row-level rule the store applies when it
/// records a response; the existing cell defaults to empty on parse
/// failure, so only well-formed entries survive the write.
pub fn merge_response(raw: Option<&str>, guest: &str, value: Rsvp) -> String {
    let mut responses = raw.map(parse_responses).unwrap_or_default();
    responses.insert(guest.to_string(), value);
    serde_json::to_string(&responses).unwrap_or_else(|_| "{}".to_string())
}

fn responses_from_value(value: &Value) -> HashMap<String, Rsvp> {
    let Some(map) = value.as_object() else {
        return HashMap::new();
    };

    map.iter()
        .filter_map(|(guest, v)| {
            let answer = v.as_str()?.parse::<Rsvp>().ok()?;
            Some((guest.clone(), answer))
        })
        .collect()
}

// ===== Wire representations =====

/// Event row as the dispatch script emits it: lower-cased headers and
/// untyped cells. Also accepts the camel-cased field names some script
/// deployments produce.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "isSecret", deserialize_with = "truthy_cell")]
    pub issecret: bool,
    #[serde(default, alias = "inviteList", deserialize_with = "name_list_cell")]
    pub invitelist: Vec<String>,
    #[serde(default, deserialize_with = "responses_cell")]
    pub responses: HashMap<String, Rsvp>,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        Event {
            id: raw.id,
            name: raw.name,
            date: raw.date,
            time: raw.time,
            description: raw.description,
            is_secret: raw.issecret,
            invite_list: raw.invitelist,
            responses: raw.responses,
        }
    }
}

/// Note row as emitted by the dispatch script; the timestamp is an ISO
/// string cell that may not parse.
#[derive(Debug, Deserialize)]
pub(crate) struct RawNote {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl From<RawNote> for GuestNote {
    fn from(raw: RawNote) -> Self {
        GuestNote {
            id: raw.id,
            name: raw.name,
            message: raw.message,
            timestamp: parse_note_timestamp(&raw.timestamp),
        }
    }
}

/// Unparseable timestamps sort to the far past instead of dropping the
/// note.
fn parse_note_timestamp(raw: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => {
            tracing::warn!("Unparseable note timestamp: {:?}", raw);
            DateTime::UNIX_EPOCH
        }
    }
}

fn truthy_cell<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn name_list_cell<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(cell) => cell
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}

fn responses_cell<'de, D>(deserializer: D) -> Result<HashMap<String, Rsvp>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(cell) => parse_responses(&cell),
        Value::Object(_) => responses_from_value(&value),
        _ => HashMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_state_machine() {
        assert_eq!(Rsvp::toggled(None), Rsvp::In);
        assert_eq!(Rsvp::toggled(Some(Rsvp::Out)), Rsvp::In);
        assert_eq!(Rsvp::toggled(Some(Rsvp::In)), Rsvp::Out);
    }

    #[test]
    fn parse_responses_accepts_well_formed_cell() {
        let responses = parse_responses(r#"{"Alex":"in","Jordan":"out"}"#);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses.get("Alex"), Some(&Rsvp::In));
        assert_eq!(responses.get("Jordan"), Some(&Rsvp::Out));
    }

    #[test]
    fn parse_responses_degrades_malformed_cell_to_empty() {
        assert!(parse_responses("{not json").is_empty());
        assert!(parse_responses("").is_empty());
        assert!(parse_responses("[1,2,3]").is_empty());
    }

    #[test]
    fn parse_responses_skips_entries_that_are_not_answers() {
        let responses = parse_responses(r#"{"Alex":"in","Jordan":"maybe","Sam":3}"#);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses.get("Alex"), Some(&Rsvp::In));
    }

    #[test]
    fn merge_response_is_idempotent() {
        let once = merge_response(Some(r#"{"Jordan":"out"}"#), "Alex", Rsvp::In);
        let twice = merge_response(Some(&once), "Alex", Rsvp::In);

        assert_eq!(parse_responses(&once), parse_responses(&twice));
        assert_eq!(parse_responses(&twice).get("Alex"), Some(&Rsvp::In));
        assert_eq!(parse_responses(&twice).get("Jordan"), Some(&Rsvp::Out));
    }

    #[test]
    fn merge_response_treats_malformed_cell_as_empty() {
        let merged = merge_response(Some("{not json"), "Alex", Rsvp::In);
        let responses = parse_responses(&merged);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses.get("Alex"), Some(&Rsvp::In));
    }

    #[test]
    fn raw_event_tolerates_sheet_cell_types() {
        let raw: RawEvent = serde_json::from_str(
            r#"{
                "id": "e1",
                "name": "Moonlit Walk",
                "date": "2026-09-12",
                "time": "21:00",
                "description": "",
                "issecret": "TRUE",
                "invitelist": "Alex, Jordan , ",
                "responses": "{\"Alex\":\"in\"}"
            }"#,
        )
        .unwrap();

        assert!(raw.issecret);
        assert_eq!(raw.invitelist, vec!["Alex", "Jordan"]);
        assert_eq!(raw.responses.get("Alex"), Some(&Rsvp::In));
    }

    #[test]
    fn raw_event_accepts_camel_case_and_typed_fields() {
        let raw: RawEvent = serde_json::from_str(
            r#"{
                "id": "e2",
                "name": "Fireside",
                "isSecret": false,
                "inviteList": ["Riley", "Casey"],
                "responses": {"Riley": "out"}
            }"#,
        )
        .unwrap();

        assert!(!raw.issecret);
        assert_eq!(raw.invitelist, vec!["Riley", "Casey"]);
        assert_eq!(raw.responses.get("Riley"), Some(&Rsvp::Out));
    }

    #[test]
    fn raw_event_defaults_missing_fields() {
        let raw: RawEvent = serde_json::from_str(r#"{"id": "e3"}"#).unwrap();

        assert_eq!(raw.id, "e3");
        assert!(!raw.issecret);
        assert!(raw.invitelist.is_empty());
        assert!(raw.responses.is_empty());
    }

    #[test]
    fn secret_event_visible_only_to_invitees() {
        let event = Event {
            id: "e1".to_string(),
            name: "Secret Offering".to_string(),
            date: String::new(),
            time: String::new(),
            description: String::new(),
            is_secret: true,
            invite_list: vec!["Alex".to_string(), "Jordan".to_string()],
            responses: HashMap::new(),
        };

        assert!(event.visible_to("Alex"));
        assert!(event.visible_to("Jordan"));
        assert!(!event.visible_to("Casey"));
    }

    #[test]
    fn public_event_visible_to_everyone() {
        let event = Event {
            id: "e2".to_string(),
            name: "Gathering".to_string(),
            date: String::new(),
            time: String::new(),
            description: String::new(),
            is_secret: false,
            invite_list: Vec::new(),
            responses: HashMap::new(),
        };

        assert!(event.visible_to("Casey"));
    }

    #[test]
    fn note_timestamp_parse_failure_falls_back_to_epoch() {
        let note: GuestNote = RawNote {
            id: "n1".to_string(),
            name: "Alex".to_string(),
            message: "hello".to_string(),
            timestamp: "yesterday-ish".to_string(),
        }
        .into();

        assert_eq!(note.timestamp, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn mood_tags_round_trip() {
        for mood in [Mood::QuietMoss, Mood::ChaoticSquirrel, Mood::AncientBurl] {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
        assert!("feral-owl".parse::<Mood>().is_err());
    }
}
