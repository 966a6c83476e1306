use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::diagnostics;
use super::error::{SyncCycle, SyncError};
use crate::config::SyncConfig;
use crate::models::{AuthState, SyncPayload, User};
use crate::remote::UserRemote;
use crate::store::CurrentUserStore;

const AUTH_CHANGE_BUFFER: usize = 64;

/// Hands out cycle numbers and remembers the newest one applied.
#[derive(Default)]
struct Sequencer {
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl Sequencer {
    fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Runs `apply` unless a newer cycle has already been applied.
    fn apply_if_newest(&self, sequence: u64, apply: impl FnOnce()) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(|e| e.into_inner());
        if *applied > sequence {
            return false;
        }
        *applied = sequence;
        apply();
        true
    }
}

/// Ties the auth provider and the route to the cached user.
///
/// The handlers are plain synchronous calls; when a cycle needs the remote,
/// the call is spawned on the current tokio runtime and the handler returns
/// straight away. Handlers must therefore be called from within a runtime.
pub struct SessionSync {
    remote: Arc<dyn UserRemote>,
    store: CurrentUserStore,
    config: SyncConfig,
    auth: Mutex<AuthState>,
    auth_changes: broadcast::Sender<AuthState>,
    route: Mutex<Option<String>>,
    sequencer: Arc<Sequencer>,
}

impl SessionSync {
    /// Creates the service with a placeholder user and auth still loading.
    pub fn new(remote: Arc<dyn UserRemote>, config: SyncConfig) -> Self {
        info!(
            "Creating session sync with remote '{}' (discard_stale_responses={})",
            remote.get_name(),
            config.discard_stale_responses
        );
        let (auth_changes, _) = broadcast::channel(AUTH_CHANGE_BUFFER);
        SessionSync {
            remote,
            store: CurrentUserStore::default(),
            config,
            auth: Mutex::new(AuthState::loading()),
            auth_changes,
            route: Mutex::new(None),
            sequencer: Arc::new(Sequencer::default()),
        }
    }

    /// The shared cached-user handle handed to consumers.
    pub fn context(&self) -> CurrentUserStore {
        self.store.clone()
    }

    pub fn current_user(&self) -> User {
        self.store.current()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn route(&self) -> Option<String> {
        self.route.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// First run, as when the provider is mounted.
    pub fn mount(&self) -> SyncCycle {
        self.run_cycle("mount")
    }

    /// New auth state. An identical state is not a trigger.
    pub fn on_auth_change(&self, state: AuthState) -> SyncCycle {
        {
            let mut current = self.auth.lock().unwrap_or_else(|e| e.into_inner());
            if *current == state {
                return SyncCycle::Unchanged;
            }
            *current = state.clone();
            // no receivers is fine
            let _ = self.auth_changes.send(state);
        }
        self.run_cycle("auth")
    }

    /// New route path. Only the change matters, not the value.
    pub fn on_route_change(&self, path: impl Into<String>) -> SyncCycle {
        let path = path.into();
        {
            let mut route = self.route.lock().unwrap_or_else(|e| e.into_inner());
            if route.as_deref() == Some(path.as_str()) {
                return SyncCycle::Unchanged;
            }
            debug!("Route changed to '{}'", path);
            *route = Some(path);
        }
        self.run_cycle("route")
    }

    /// Spawns the task that logs the raw identity whenever it or the cached
    /// user changes. It stops when the service is dropped.
    pub fn spawn_diagnostics(&self) -> JoinHandle<()> {
        let (auth, auth_rx) = {
            let current = self.auth.lock().unwrap_or_else(|e| e.into_inner());
            (current.clone(), self.auth_changes.subscribe())
        };
        let user_rx = self.store.changes();
        diagnostics::spawn(auth, self.store.current(), auth_rx, user_rx)
    }

    fn run_cycle(&self, trigger: &'static str) -> SyncCycle {
        let auth = self.auth_state();
        let Some(identity) = auth.ready_identity() else {
            debug!(
                event_name = "sync.cycle.waiting",
                event_domain = "sync",
                trigger,
                is_ready = auth.is_ready,
                "auth not ready or no identity, nothing to sync"
            );
            return SyncCycle::Waiting;
        };

        let payload = match SyncPayload::from_identity(identity) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    event_name = "sync.cycle.rejected",
                    event_domain = "sync",
                    trigger,
                    identity = ?identity,
                    "Missing user data: {}",
                    e
                );
                return SyncCycle::Rejected(e);
            }
        };

        let sequence = self.sequencer.next();
        debug!(
            event_name = "sync.cycle.dispatched",
            event_domain = "sync",
            trigger,
            sequence,
            clerk_id = payload.clerk_id.as_str(),
            "dispatching ensure-user call"
        );

        let remote = self.remote.clone();
        let store = self.store.clone();
        let sequencer = self.sequencer.clone();
        let discard_stale = self.config.discard_stale_responses;
        SyncCycle::Dispatched(tokio::spawn(async move {
            let result = ensure_and_apply(
                remote.as_ref(),
                &payload,
                &store,
                &sequencer,
                sequence,
                discard_stale,
            )
            .await;
            match &result {
                Ok(user) => info!(
                    event_name = "sync.cycle.applied",
                    event_domain = "sync",
                    sequence,
                    user_id = user.id.as_str(),
                    clerk_id = user.clerk_id.as_str(),
                    "cached user replaced"
                ),
                Err(SyncError::Stale { .. }) => debug!(
                    event_name = "sync.cycle.stale",
                    event_domain = "sync",
                    sequence,
                    "discarding response from superseded cycle"
                ),
                Err(e) => error!(
                    event_name = "sync.cycle.failed",
                    event_domain = "sync",
                    sequence,
                    clerk_id = payload.clerk_id.as_str(),
                    "Failed to create user: {}",
                    e
                ),
            }
            result
        }))
    }
}

async fn ensure_and_apply(
    remote: &dyn UserRemote,
    payload: &SyncPayload,
    store: &CurrentUserStore,
    sequencer: &Sequencer,
    sequence: u64,
    discard_stale: bool,
) -> Result<User, SyncError> {
    let user = remote
        .ensure_user(payload)
        .await
        .map_err(SyncError::Remote)?
        .ok_or(SyncError::EmptyResult)?;

    if discard_stale {
        if !sequencer.apply_if_newest(sequence, || store.set(user.clone())) {
            return Err(SyncError::Stale { sequence });
        }
    } else {
        store.set(user.clone());
    }
    Ok(user)
}
