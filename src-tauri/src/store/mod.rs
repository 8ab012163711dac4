//! Remote sheet store
//!
//! All persistent data lives in a spreadsheet behind an action-addressed
//! dispatch script. This module provides the typed client for it and the
//! record types it returns; the client holds transient, disposable copies
//! with no authority — conflicts resolve last-write-wins at the store.

pub mod client;
pub mod models;

pub use client::StoreClient;
pub use models::{merge_response, parse_responses, Event, GuestNote, MistLevel, Mood, Rsvp};
