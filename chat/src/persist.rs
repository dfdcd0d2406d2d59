//! Namespaced, best-effort persistence of chat state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every persisted entry lives under `querion:<namespace>:<field>`, so each
//! logged-in user (and the anonymous visitor) gets an independent session
//! list. The logged-in user id itself lives under the global
//! [`USER_ID_KEY`].
//!
//! ERROR HANDLING
//! ==============
//! Read and write failures are logged and swallowed: in-memory state stays
//! authoritative for the process lifetime. A failed write is lost data once
//! the process exits; that risk is accepted for a client-side cache.
//! Records that fail to deserialize are treated as absent.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::model::{ChatId, ChatSession};
use crate::prefs::Preferences;
use crate::store::KeyValueStore;

/// Global key holding the id of the logged-in user.
pub const USER_ID_KEY: &str = "querion:user_id";

const CHATS_FIELD: &str = "chats";
const ACTIVE_ID_FIELD: &str = "active_id";
const PREFS_FIELD: &str = "prefs";

/// Partition of persisted state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// No user is logged in.
    #[default]
    Anonymous,
    /// State owned by the user with this backend id.
    User(String),
}

impl Namespace {
    /// Namespace for `user_id`, or anonymous when absent.
    #[must_use]
    pub fn for_user(user_id: Option<&str>) -> Self {
        match user_id {
            Some(id) if !id.trim().is_empty() => Self::User(id.trim().to_owned()),
            _ => Self::Anonymous,
        }
    }

    #[must_use]
    pub fn key(&self, field: &str) -> String {
        format!("querion:{self}:{field}")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

// =============================================================================
// JSON HELPERS
// =============================================================================

/// Load a JSON value for `key`. Missing, unreadable, or malformed entries
/// yield `None`.
pub fn load_json<T: DeserializeOwned, S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(%key, error = %e, "store read failed; continuing without persisted value");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(%key, error = %e, "discarding malformed persisted value");
            None
        }
    }
}

/// Save a JSON value for `key`, logging failures.
pub fn save_json<T: Serialize + ?Sized, S: KeyValueStore + ?Sized>(store: &S, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(%key, error = %e, "serialize for store failed");
            return;
        }
    };
    if let Err(e) = store.set(key, &raw) {
        warn!(%key, error = %e, "store write failed; state kept in memory only");
    }
}

/// Remove `key`, logging failures.
pub fn remove_key<S: KeyValueStore + ?Sized>(store: &S, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(%key, error = %e, "store remove failed");
    }
}

// =============================================================================
// CHAT STATE RECORDS
// =============================================================================

/// Load the session list for `ns`.
///
/// Sessions repeating an earlier id are dropped. An empty list is `None` so
/// the caller seeds a fresh one.
pub fn load_sessions<S: KeyValueStore + ?Sized>(store: &S, ns: &Namespace) -> Option<Vec<ChatSession>> {
    let sessions: Vec<ChatSession> = load_json(store, &ns.key(CHATS_FIELD))?;
    let mut seen = HashSet::new();
    let before = sessions.len();
    let sessions: Vec<ChatSession> = sessions.into_iter().filter(|s| seen.insert(s.id)).collect();
    if sessions.len() != before {
        warn!(namespace = %ns, dropped = before - sessions.len(), "dropped sessions with duplicate ids");
    }
    if sessions.is_empty() { None } else { Some(sessions) }
}

pub fn save_sessions<S: KeyValueStore + ?Sized>(store: &S, ns: &Namespace, sessions: &[ChatSession]) {
    save_json(store, &ns.key(CHATS_FIELD), sessions);
}

pub fn load_active_id<S: KeyValueStore + ?Sized>(store: &S, ns: &Namespace) -> Option<ChatId> {
    load_json(store, &ns.key(ACTIVE_ID_FIELD))
}

/// Persist the active pointer; `None` removes the entry.
pub fn save_active_id<S: KeyValueStore + ?Sized>(store: &S, ns: &Namespace, id: Option<ChatId>) {
    let key = ns.key(ACTIVE_ID_FIELD);
    match id {
        Some(id) => save_json(store, &key, &id),
        None => remove_key(store, &key),
    }
}

/// Load preferences for `ns`, defaulting when absent and repairing a model
/// that does not belong to the stored tier.
pub fn load_prefs<S: KeyValueStore + ?Sized>(store: &S, ns: &Namespace) -> Preferences {
    let mut prefs: Preferences = load_json(store, &ns.key(PREFS_FIELD)).unwrap_or_default();
    prefs.normalize();
    prefs
}

pub fn save_prefs<S: KeyValueStore + ?Sized>(store: &S, ns: &Namespace, prefs: &Preferences) {
    save_json(store, &ns.key(PREFS_FIELD), prefs);
}

// =============================================================================
// LOGIN
// =============================================================================

/// Id of the user remembered from a previous login.
pub fn load_user_id<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
    load_json::<String, _>(store, USER_ID_KEY).filter(|id| !id.trim().is_empty())
}

pub fn save_user_id<S: KeyValueStore + ?Sized>(store: &S, user_id: &str) {
    save_json(store, USER_ID_KEY, user_id);
}

pub fn clear_user_id<S: KeyValueStore + ?Sized>(store: &S) {
    remove_key(store, USER_ID_KEY);
}
