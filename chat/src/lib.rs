//! Client-side chat session state for the Querion assistant.
//!
//! This crate is UI-framework agnostic: it owns the session list, the active
//! selection, composer input, and user preferences, and mirrors them into an
//! injected key-value store. Front ends (the terminal client in the root
//! package) render from it and forward user actions into it.

pub mod clock;
pub mod model;
pub mod order;
pub mod persist;
pub mod prefs;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use model::{ChatId, ChatSession, Message, Sender};
pub use persist::Namespace;
pub use prefs::{Persona, Preferences, Tier};
pub use state::ChatState;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
