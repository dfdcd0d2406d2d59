use super::*;
use crate::model::ChatSession;
use crate::prefs::Tier;
use crate::store::{MemoryStore, StoreError};

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk gone")))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("quota exceeded")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk gone")))
    }
}

// =============================================================
// Namespace
// =============================================================

#[test]
fn namespace_keys_are_partitioned() {
    assert_eq!(Namespace::Anonymous.key("chats"), "querion:anonymous:chats");
    assert_eq!(Namespace::User("42".into()).key("chats"), "querion:user:42:chats");
}

#[test]
fn namespace_for_user_treats_blank_as_anonymous() {
    assert_eq!(Namespace::for_user(None), Namespace::Anonymous);
    assert_eq!(Namespace::for_user(Some("  ")), Namespace::Anonymous);
    assert_eq!(Namespace::for_user(Some(" 7 ")), Namespace::User("7".into()));
}

// =============================================================
// Sessions
// =============================================================

#[test]
fn sessions_round_trip_per_namespace() {
    let store = MemoryStore::new();
    let alice = Namespace::User("alice".into());
    let sessions = vec![ChatSession::new("one", 1), ChatSession::new("two", 2)];
    save_sessions(&store, &alice, &sessions);

    assert_eq!(load_sessions(&store, &alice), Some(sessions));
    assert_eq!(load_sessions(&store, &Namespace::Anonymous), None);
}

#[test]
fn empty_session_list_loads_as_none() {
    let store = MemoryStore::new();
    save_sessions(&store, &Namespace::Anonymous, &[]);
    assert_eq!(load_sessions(&store, &Namespace::Anonymous), None);
}

#[test]
fn malformed_sessions_load_as_none() {
    let store = MemoryStore::new();
    store.set("querion:anonymous:chats", r#"[{"title": 5}]"#).unwrap();
    assert_eq!(load_sessions(&store, &Namespace::Anonymous), None);
}

#[test]
fn duplicate_session_ids_keep_first() {
    let store = MemoryStore::new();
    let first = ChatSession::new("first", 1);
    let mut dup = first.clone();
    dup.title = "dup".into();
    save_sessions(&store, &Namespace::Anonymous, &[first.clone(), dup]);
    assert_eq!(load_sessions(&store, &Namespace::Anonymous), Some(vec![first]));
}

#[test]
fn active_id_save_and_clear() {
    let store = MemoryStore::new();
    let ns = Namespace::Anonymous;
    let id = ChatSession::new("x", 0).id;
    save_active_id(&store, &ns, Some(id));
    assert_eq!(load_active_id(&store, &ns), Some(id));
    save_active_id(&store, &ns, None);
    assert_eq!(load_active_id(&store, &ns), None);
    assert!(store.is_empty());
}

// =============================================================
// Preferences
// =============================================================

#[test]
fn prefs_default_when_absent() {
    let store = MemoryStore::new();
    assert_eq!(load_prefs(&store, &Namespace::Anonymous), Preferences::default());
}

#[test]
fn prefs_with_foreign_model_are_repaired() {
    let store = MemoryStore::new();
    store
        .set("querion:anonymous:prefs", r#"{"tier":"Pro","persona":"Dev","model":"Image","agent_mode":true}"#)
        .unwrap();
    let prefs = load_prefs(&store, &Namespace::Anonymous);
    assert_eq!(prefs.tier, Tier::Pro);
    assert_eq!(prefs.model, Tier::Pro.default_model());
    assert!(prefs.agent_mode);
}

// =============================================================
// Login id
// =============================================================

#[test]
fn user_id_save_load_clear() {
    let store = MemoryStore::new();
    assert_eq!(load_user_id(&store), None);
    save_user_id(&store, "17");
    assert_eq!(load_user_id(&store).as_deref(), Some("17"));
    clear_user_id(&store);
    assert_eq!(load_user_id(&store), None);
}

// =============================================================
// Failure swallowing
// =============================================================

#[test]
fn broken_store_reads_as_absent_and_writes_do_not_panic() {
    let store = BrokenStore;
    let ns = Namespace::Anonymous;
    assert_eq!(load_sessions(&store, &ns), None);
    assert_eq!(load_active_id(&store, &ns), None);
    assert_eq!(load_prefs(&store, &ns), Preferences::default());
    assert_eq!(load_user_id(&store), None);
    save_sessions(&store, &ns, &[ChatSession::new("x", 0)]);
    save_active_id(&store, &ns, None);
    save_prefs(&store, &ns, &Preferences::default());
    clear_user_id(&store);
}
