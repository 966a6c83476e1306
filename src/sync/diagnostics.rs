use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::{AuthState, User};

/// Logs the raw identity on start and once per auth or cached-user change.
/// Purely observational; ends once the auth feed closes, after logging any
/// user changes still queued.
pub(super) fn spawn(
    mut auth: AuthState,
    user: User,
    mut auth_rx: broadcast::Receiver<AuthState>,
    mut user_rx: broadcast::Receiver<User>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut user_id = user.id;
        log_identity(&auth, &user_id);

        let mut user_open = true;
        loop {
            tokio::select! {
                r = auth_rx.recv() => match r {
                    Ok(state) => {
                        auth = state;
                        log_identity(&auth, &user_id);
                    }
                    Err(RecvError::Lagged(skipped)) => lagged("auth", skipped),
                    Err(RecvError::Closed) => break,
                },
                r = user_rx.recv(), if user_open => match r {
                    Ok(user) => {
                        user_id = user.id;
                        log_identity(&auth, &user_id);
                    }
                    Err(RecvError::Lagged(skipped)) => lagged("user", skipped),
                    Err(RecvError::Closed) => user_open = false,
                },
            }
        }
        while let Ok(user) = user_rx.try_recv() {
            user_id = user.id;
            log_identity(&auth, &user_id);
        }
        debug!("Identity diagnostics stopped");
    })
}

fn log_identity(auth: &AuthState, user_id: &str) {
    info!(
        event_name = "sync.diagnostics.identity",
        event_domain = "sync",
        identity = ?auth.identity,
        is_ready = auth.is_ready,
        user_id,
        "currentUser"
    );
}

fn lagged(feed: &str, skipped: u64) {
    warn!(
        event_name = "sync.diagnostics.lagged",
        event_domain = "sync",
        feed,
        skipped,
        "identity diagnostics fell behind"
    );
}
