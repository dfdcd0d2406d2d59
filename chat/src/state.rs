//! The chat-session state container.
//!
//! DESIGN
//! ======
//! `ChatState` owns the session list, the active pointer, the composer input,
//! and preferences for one namespace. Every mutation is written through to the
//! injected store before the method returns.
//!
//! The list is kept in insertion order with the newest insertion at the head.
//! Display order is derived on read (`order::display_order`), and because that
//! sort is stable, head position breaks timestamp ties. Pin toggles move the
//! session to the head for the same reason.
//!
//! The active pointer may be unset or stale; reads then resolve to the first
//! session in display order. The list is never empty, so a resolved active
//! session always exists.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::model::{self, ChatId, ChatSession, Message, NEW_CHAT_TITLE, Sender, WELCOME_TITLE};
use crate::order::display_order;
use crate::persist::{self, Namespace};
use crate::prefs::{Persona, Preferences, Tier, UnknownChoice};
use crate::store::KeyValueStore;

pub struct ChatState<S, C = SystemClock> {
    store: S,
    clock: C,
    namespace: Namespace,
    sessions: Vec<ChatSession>,
    active_id: Option<ChatId>,
    input: String,
    prefs: Preferences,
}

impl<S: KeyValueStore> ChatState<S> {
    /// Hydrate state for `namespace` using the system clock.
    pub fn load(store: S, namespace: Namespace) -> Self {
        Self::load_with_clock(store, SystemClock, namespace)
    }
}

impl<S: KeyValueStore, C: Clock> ChatState<S, C> {
    /// Hydrate state for `namespace`. Missing or invalid persisted sessions
    /// fall back to a single `Welcome` session.
    pub fn load_with_clock(store: S, clock: C, namespace: Namespace) -> Self {
        let mut state = Self {
            store,
            clock,
            namespace,
            sessions: Vec::new(),
            active_id: None,
            input: String::new(),
            prefs: Preferences::default(),
        };
        state.hydrate();
        state
    }

    fn hydrate(&mut self) {
        let ns = &self.namespace;
        self.sessions = persist::load_sessions(&self.store, ns)
            .unwrap_or_else(|| vec![ChatSession::new(WELCOME_TITLE, self.clock.now_ms())]);
        self.active_id = persist::load_active_id(&self.store, ns).filter(|id| self.sessions.iter().any(|s| s.id == *id));
        self.prefs = persist::load_prefs(&self.store, ns);
        self.input.clear();
        info!(namespace = %ns, sessions = self.sessions.len(), "chat state loaded");
    }

    /// Re-hydrate for another namespace (login or logout).
    pub fn switch_namespace(&mut self, namespace: Namespace) {
        if self.namespace == namespace {
            return;
        }
        self.namespace = namespace;
        self.hydrate();
    }

    fn persist(&self) {
        persist::save_sessions(&self.store, &self.namespace, &self.sessions);
        persist::save_active_id(&self.store, &self.namespace, self.active_id);
    }

    fn persist_prefs(&self) {
        persist::save_prefs(&self.store, &self.namespace, &self.prefs);
    }

    fn position(&self, id: ChatId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    fn active_index(&self) -> usize {
        if let Some(idx) = self.active_id.and_then(|id| self.position(id)) {
            return idx;
        }
        display_order(&self.sessions)
            .first()
            .and_then(|first| self.position(first.id))
            .unwrap_or(0)
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Sessions in display order.
    #[must_use]
    pub fn sessions(&self) -> Vec<&ChatSession> {
        display_order(&self.sessions)
    }

    #[must_use]
    pub fn session(&self, id: ChatId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// The explicitly selected session id, if still set.
    #[must_use]
    pub fn active_id(&self) -> Option<ChatId> {
        self.active_id
    }

    /// The session new messages go to.
    #[must_use]
    pub fn active_session(&self) -> &ChatSession {
        &self.sessions[self.active_index()]
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    #[must_use]
    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    // =========================================================================
    // SESSION OPERATIONS
    // =========================================================================

    /// Insert a fresh session at the head of the list and make it active.
    pub fn create_session(&mut self, title: Option<&str>) -> ChatId {
        let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(NEW_CHAT_TITLE);
        let session = ChatSession::new(title, self.clock.now_ms());
        let id = session.id;
        self.sessions.insert(0, session);
        self.active_id = Some(id);
        self.persist();
        debug!(%id, "session created");
        id
    }

    /// Make `id` active. Unknown ids are ignored; returns whether it applied.
    pub fn select_session(&mut self, id: ChatId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.active_id = Some(id);
        self.persist();
        true
    }

    /// Append a message to the active session.
    ///
    /// Blank text is ignored. A user message clears the composer input, and
    /// the first user message in an untouched session with a placeholder
    /// title renames the session after it. Returns whether a message was
    /// appended.
    pub fn send_message(&mut self, text: &str, sender: Sender) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let idx = self.active_index();
        let session = &mut self.sessions[idx];
        if sender == Sender::User && session.is_untouched() && session.has_placeholder_title() {
            if let Some(title) = model::derive_title(text) {
                session.title = title;
            }
        }
        session.messages.push(Message::new(sender, text));
        let id = session.id;
        if sender == Sender::User {
            self.input.clear();
        }
        self.persist();
        debug!(%id, ?sender, "message appended");
        true
    }

    /// Remove `id`. An emptied list is re-seeded with one fresh session; a
    /// deleted active session clears the active pointer.
    pub fn delete_session(&mut self, id: ChatId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.sessions.remove(idx);
        if self.sessions.is_empty() {
            self.sessions.push(ChatSession::new(NEW_CHAT_TITLE, self.clock.now_ms()));
        }
        if self.active_id == Some(id) {
            self.active_id = None;
        }
        self.persist();
        debug!(%id, "session deleted");
        true
    }

    pub fn rename_session(&mut self, id: ChatId, title: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        title.clone_into(&mut self.sessions[idx].title);
        self.persist();
        true
    }

    /// Flip the pinned flag and refresh the timestamp, moving the session to
    /// the front of its pin group. Returns the new pinned state.
    pub fn toggle_pin(&mut self, id: ChatId) -> Option<bool> {
        let idx = self.position(id)?;
        let mut session = self.sessions.remove(idx);
        session.pinned = !session.pinned;
        session.created_at = self.clock.now_ms();
        let pinned = session.pinned;
        self.sessions.insert(0, session);
        self.persist();
        debug!(%id, pinned, "pin toggled");
        Some(pinned)
    }

    // =========================================================================
    // PREFERENCES
    // =========================================================================

    pub fn set_tier(&mut self, tier: Tier) {
        self.prefs.set_tier(tier);
        self.persist_prefs();
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.prefs.persona = persona;
        self.persist_prefs();
    }

    /// Select a model offered by the current tier.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownChoice`] if the tier does not offer `input`.
    pub fn set_model(&mut self, input: &str) -> Result<(), UnknownChoice> {
        self.prefs.set_model(input)?;
        self.persist_prefs();
        Ok(())
    }

    pub fn set_agent_mode(&mut self, on: bool) {
        self.prefs.agent_mode = on;
        self.persist_prefs();
    }
}
