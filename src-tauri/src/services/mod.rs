//! Services module
//!
//! Business logic services that coordinate between commands and the sheet
//! store client.

pub mod events;
pub mod moods;
pub mod notes;
pub mod session;

pub use events::{EventsService, Timeline};
pub use moods::MoodsService;
pub use notes::NotesService;
pub use session::SessionService;
