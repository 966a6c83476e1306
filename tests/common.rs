#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use usersync::models::{Identity, SyncPayload, User};
use usersync::remote::UserRemote;

pub type Reply = Result<Option<User>, String>;

/// A remote whose calls block until the test sends their reply.
/// Calls take the queued replies in the order they reach the remote.
#[derive(Default)]
pub struct ScriptedRemote {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    payloads: Mutex<Vec<SyncPayload>>,
    calls: AtomicUsize,
}

impl ScriptedRemote {
    /// Queues a reply slot and returns the sender that completes it.
    pub fn expect_call(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<SyncPayload> {
        self.payloads.lock().unwrap().clone()
    }

    /// Waits until `n` calls have reached the remote.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("remote was not called in time");
    }
}

#[async_trait]
impl UserRemote for ScriptedRemote {
    fn get_name(&self) -> &str {
        "scripted"
    }

    async fn ensure_user(&self, payload: &SyncPayload) -> Result<Option<User>, String> {
        self.payloads.lock().unwrap().push(payload.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        match reply {
            Some(rx) => rx.await.unwrap_or_else(|_| Err("reply dropped".to_string())),
            None => Err("unexpected call".to_string()),
        }
    }
}

pub fn timestamp() -> DateTime<Utc> {
    "2024-03-01T10:00:00Z".parse().expect("valid timestamp")
}

pub fn record(id: &str, clerk_id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        clerk_id: clerk_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        college_name: String::new(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn ada() -> Identity {
    Identity::new("u1", Some("Ada Lovelace"), Some("ada@x.com"))
}

pub fn ada_record() -> User {
    record("db1", "u1", "Ada Lovelace", "ada@x.com")
}

/// Collects formatted log output so tests can count what was emitted.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// A subscriber writing plain text into this buffer; install it with
    /// `tracing::subscriber::set_default` on a current-thread runtime.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish()
    }

    pub fn lines_containing(&self, needle: &str) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|l| l.contains(needle))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
