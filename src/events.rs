//! Newline-delimited JSON events driving a [`SessionSync`] from outside.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::models::{AuthState, User};
use crate::sync::{SessionSync, SyncCycle};

/// One line of the event feed, tagged by `type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// `{"type":"auth","is_ready":true,"identity":{"id":..,"full_name":..,"primary_email":..}}`
    Auth(AuthState),
    /// `{"type":"navigate","path":"/dashboard"}`
    Navigate { path: String },
    /// `{"type":"set_user","user":{...}}`, an explicit overwrite by a consumer.
    SetUser { user: User },
}

impl SessionEvent {
    /// Parses one line. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line)
            .map(Some)
            .map_err(|e| format!("Invalid event '{}': {}", line, e))
    }

    /// Feeds the event to the service. `set_user` starts no cycle.
    pub fn apply(self, sync: &SessionSync) -> Option<SyncCycle> {
        match self {
            SessionEvent::Auth(state) => Some(sync.on_auth_change(state)),
            SessionEvent::Navigate { path } => Some(sync.on_route_change(path)),
            SessionEvent::SetUser { user } => {
                sync.context().set(user);
                None
            }
        }
    }
}

/// Reads events until EOF, applying each one. Malformed lines are logged
/// and skipped. Returns the cycles that were dispatched.
pub async fn replay<R>(sync: &SessionSync, reader: R) -> Result<Vec<SyncCycle>, std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut dispatched = Vec::new();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let event = match SessionEvent::parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                continue;
            }
        };
        debug!("Applying event from line {}: {:?}", line_no, event);
        if let Some(cycle) = event.apply(sync) {
            if cycle.is_dispatched() {
                dispatched.push(cycle);
            }
        }
    }
    Ok(dispatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;

    #[test]
    fn test_parse_auth_event() {
        let event = SessionEvent::parse_line(
            r#"{"type":"auth","is_ready":true,"identity":{"id":"u1","full_name":"Ada Lovelace","primary_email":"ada@x.com"}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            event,
            SessionEvent::Auth(AuthState::signed_in(Identity::new(
                "u1",
                Some("Ada Lovelace"),
                Some("ada@x.com")
            )))
        );
    }

    #[test]
    fn test_parse_navigate_and_blank() {
        assert_eq!(
            SessionEvent::parse_line(r#"{"type":"navigate","path":"/courses"}"#).unwrap(),
            Some(SessionEvent::Navigate {
                path: "/courses".to_string()
            })
        );
        assert_eq!(SessionEvent::parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(SessionEvent::parse_line(r#"{"type":"logout"}"#).is_err());
        assert!(SessionEvent::parse_line("not json").is_err());
    }
}
