use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::models::User;

/// The shared slot holding the cached user.
///
/// Cloning is cheap and every clone sees the same value. Readers call
/// [`current`](Self::current) or hold a receiver from
/// [`subscribe`](Self::subscribe); any holder may overwrite the value with
/// [`set`](Self::set), which is never checked against the remote.
///
/// Subscribers only see the latest value. [`changes`](Self::changes) yields
/// every write in order, for observers that must not miss one.
#[derive(Clone)]
pub struct CurrentUserStore {
    tx: Arc<watch::Sender<User>>,
    changes: broadcast::Sender<User>,
}

const CHANGE_BUFFER: usize = 64;

impl CurrentUserStore {
    pub fn new(initial: User) -> Self {
        let (tx, _rx) = watch::channel(initial);
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        CurrentUserStore {
            tx: Arc::new(tx),
            changes,
        }
    }

    /// A copy of the cached user.
    pub fn current(&self) -> User {
        self.tx.borrow().clone()
    }

    /// Replaces the cached user and notifies subscribers.
    pub fn set(&self, user: User) {
        debug!("Cached user set to id='{}' clerkId='{}'", user.id, user.clerk_id);
        // the feed is sent under the watch lock so both see writes in one order
        self.tx.send_modify(|current| {
            *current = user.clone();
            let _ = self.changes.send(user);
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<User> {
        self.tx.subscribe()
    }

    /// Every write made after this call, in order.
    pub fn changes(&self) -> broadcast::Receiver<User> {
        self.changes.subscribe()
    }
}

impl Default for CurrentUserStore {
    fn default() -> Self {
        Self::new(User::placeholder())
    }
}
