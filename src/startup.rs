//! Application startup.
//!
//! Builds the ensure-user remote and the session sync service from the
//! configuration, then drives the service from an event feed.

use std::sync::Arc;

use futures::future::join_all;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

use crate::config::ConfigV1;
use crate::events::replay;
use crate::models::User;
use crate::remote::create_remote;
use crate::sync::SessionSync;

/// Runs the service against events read from stdin and prints the final
/// cached user as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the remote cannot be built or stdin cannot be read.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let user = run_with_input(config, BufReader::new(tokio::io::stdin())).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

/// Same as [`run`] but reads events from `input` and returns the final
/// cached user once every dispatched cycle has completed.
pub async fn run_with_input<R>(
    config: Arc<ConfigV1>,
    input: R,
) -> Result<User, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    let remote = create_remote(&config.remote)?;
    let sync = SessionSync::new(remote, config.sync.clone());
    let diagnostics = sync.spawn_diagnostics();

    let mut updates = sync.context().subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let user = updates.borrow_and_update().clone();
            info!("Current user is now '{}' <{}> (id='{}')", user.name, user.email, user.id);
        }
    });

    let mut cycles = vec![sync.mount()];
    cycles.extend(replay(&sync, input).await?);

    let outcomes = join_all(cycles.into_iter().map(|c| c.outcome())).await;
    let applied = outcomes.iter().flatten().filter(|r| r.is_ok()).count();
    let failed = outcomes.iter().flatten().filter(|r| r.is_err()).count();
    let auth = sync.auth_state();
    info!(
        signed_in = auth.ready_identity().is_some(),
        "Event feed finished: {} cycle(s) applied, {} failed", applied, failed
    );

    let user = sync.current_user();
    drop(sync);
    if let Err(e) = diagnostics.await {
        warn!("Diagnostics task ended abnormally: {}", e);
    }
    watcher.abort();
    Ok(user)
}
