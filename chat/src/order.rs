//! Display ordering for the session list.
//!
//! Pinned sessions come first, then unpinned; each group is newest-created
//! first. `sort_by_key` is stable, so sessions sharing a timestamp keep their
//! relative order from the underlying list.

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;

use std::cmp::Reverse;

use crate::model::ChatSession;

/// Sort key: pinned before unpinned, then descending creation time.
fn display_key(session: &ChatSession) -> (bool, Reverse<i64>) {
    (!session.pinned, Reverse(session.created_at))
}

/// Borrowing view of `sessions` in display order.
#[must_use]
pub fn display_order(sessions: &[ChatSession]) -> Vec<&ChatSession> {
    let mut view: Vec<&ChatSession> = sessions.iter().collect();
    view.sort_by_key(|s| display_key(s));
    view
}
