use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The application's user record as stored remotely.
///
/// Field names on the wire follow the application database, hence the mix
/// of `clerkId`/`createdAt` and `college_name`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(rename = "clerkId")]
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub college_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The value held before the first successful sync: every string empty,
    /// both timestamps set to now.
    pub fn placeholder() -> Self {
        let now = Utc::now();
        User {
            id: String::new(),
            clerk_id: String::new(),
            name: String::new(),
            email: String::new(),
            college_name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True until the record has been assigned an id by the remote store.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

impl Default for User {
    fn default() -> Self {
        Self::placeholder()
    }
}
