use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use futures::lock::Mutex;
use tracing::debug;

use super::UserRemote;
use crate::models::{SyncPayload, User};

/// An in-process user directory with create-or-fetch semantics keyed by clerkId.
///
/// An existing record is returned untouched, even if the payload carries a
/// different name or email.
pub struct MemoryUserRemote {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserRemote {
    pub fn new() -> Self {
        MemoryUserRemote {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryUserRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRemote for MemoryUserRemote {
    fn get_name(&self) -> &str {
        "memory"
    }

    async fn ensure_user(&self, payload: &SyncPayload) -> Result<Option<User>, String> {
        let mut users = self.users.lock().await;
        if let Some(existing) = users.get(&payload.clerk_id) {
            debug!("User for clerkId '{}' already exists", payload.clerk_id);
            return Ok(Some(existing.clone()));
        }

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            clerk_id: payload.clerk_id.clone(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            college_name: String::new(),
            created_at: now,
            updated_at: now,
        };
        debug!("Created user '{}' for clerkId '{}'", user.id, user.clerk_id);
        users.insert(payload.clerk_id.clone(), user.clone());
        Ok(Some(user))
    }
}
