//! Conversation Context Store
//!
//! Per-user bounded message history. Each user owns an independent ring of
//! the most recent messages; appending past capacity drops the oldest entry.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

/// History size kept per user unless configured otherwise
pub const DEFAULT_CONTEXT_CAPACITY: usize = 50;

/// Chat-platform user identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage strategy for per-user conversation history
pub trait ContextStore: Send + Sync {
    /// Append a message, evicting the oldest one when the user is at capacity
    fn append(&self, user: UserId, message: Message);

    /// Snapshot of the user's history, oldest first
    fn get(&self, user: UserId) -> Vec<Message>;

    /// Drop the user's history entirely
    fn evict(&self, user: UserId);

    /// Maximum number of messages kept per user
    fn capacity(&self) -> usize;

    /// Append a message built from a role and content
    fn push(&self, user: UserId, role: Role, content: &str) {
        self.append(user, Message::new(role, content));
    }
}

/// In-memory context store guarded by a single mutex
pub struct MemoryContextStore {
    capacity: usize,
    contexts: Mutex<HashMap<UserId, VecDeque<Message>>>,
}

impl Default for MemoryContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CONTEXT_CAPACITY)
    }

    /// Create with a custom per-user capacity (at least one message)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Number of users with a live context
    pub fn user_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, VecDeque<Message>>> {
        // A panic mid-append cannot leave a ring longer than capacity.
        self.contexts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContextStore for MemoryContextStore {
    fn append(&self, user: UserId, message: Message) {
        let mut contexts = self.lock();
        let ring = contexts
            .entry(user)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        ring.push_back(message);
        while ring.len() > self.capacity {
            ring.pop_front();
        }
        tracing::trace!(%user, len = ring.len(), "context appended");
    }

    fn get(&self, user: UserId) -> Vec<Message> {
        self.lock()
            .get(&user)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn evict(&self, user: UserId) {
        self.lock().remove(&user);
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_overflow_evicts_oldest() {
        let store = MemoryContextStore::new();
        let user = UserId(7);

        for i in 0..51 {
            store.push(user, Role::User, &format!("msg {i}"));
        }

        let history = store.get(user);
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].content, "msg 1");
        assert_eq!(history[49].content, "msg 50");
    }

    #[test]
    fn test_users_are_independent() {
        let store = MemoryContextStore::with_capacity(2);
        store.push(UserId(1), Role::User, "a");
        store.push(UserId(1), Role::Assistant, "b");
        store.push(UserId(1), Role::User, "c");
        store.push(UserId(2), Role::User, "x");

        let first: Vec<_> = store.get(UserId(1)).into_iter().map(|m| m.content).collect();
        assert_eq!(first, vec!["b", "c"]);
        assert_eq!(store.get(UserId(2)).len(), 1);
        assert_eq!(store.user_count(), 2);
    }

    #[test]
    fn test_unknown_user_is_empty_and_evict() {
        let store = MemoryContextStore::new();
        assert!(store.get(UserId(99)).is_empty());

        store.push(UserId(99), Role::User, "hello");
        store.evict(UserId(99));
        assert!(store.get(UserId(99)).is_empty());
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let store = MemoryContextStore::with_capacity(0);
        store.push(UserId(1), Role::User, "only");
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.get(UserId(1)).len(), 1);
    }

    #[test]
    fn test_concurrent_appends_respect_capacity() {
        let store = Arc::new(MemoryContextStore::with_capacity(10));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.push(UserId(1), Role::User, &format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get(UserId(1)).len(), 10);
    }
}
