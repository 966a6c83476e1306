use serde::{Deserialize, Serialize};

use crate::sync::SyncError;

/// The signed-in principal as reported by the authentication provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub primary_email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, full_name: Option<&str>, primary_email: Option<&str>) -> Self {
        Identity {
            id: id.into(),
            full_name: full_name.map(str::to_string),
            primary_email: primary_email.map(str::to_string),
        }
    }
}

/// Snapshot of the authentication provider.
///
/// `is_ready` flips to true once the provider knows whether anyone is
/// signed in; `identity` is meaningless before that.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub is_ready: bool,
}

impl AuthState {
    pub fn loading() -> Self {
        AuthState::default()
    }

    pub fn signed_out() -> Self {
        AuthState {
            identity: None,
            is_ready: true,
        }
    }

    pub fn signed_in(identity: Identity) -> Self {
        AuthState {
            identity: Some(identity),
            is_ready: true,
        }
    }

    /// The identity, only once the provider has finished loading.
    pub fn ready_identity(&self) -> Option<&Identity> {
        if self.is_ready {
            self.identity.as_ref()
        } else {
            None
        }
    }
}

/// Body of the ensure-user call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SyncPayload {
    #[serde(rename = "clerkId")]
    pub clerk_id: String,
    pub name: String,
    pub email: String,
}

impl SyncPayload {
    /// Builds the payload, refusing identities with an empty or absent field.
    /// Whitespace is passed through as-is; only the remote decides whether
    /// such a value is acceptable.
    pub fn from_identity(identity: &Identity) -> Result<Self, SyncError> {
        let name =
            non_empty(identity.full_name.as_deref()).ok_or(SyncError::MissingField("name"))?;
        let email = non_empty(identity.primary_email.as_deref())
            .ok_or(SyncError::MissingField("email"))?;
        let clerk_id =
            non_empty(Some(identity.id.as_str())).ok_or(SyncError::MissingField("clerkId"))?;

        Ok(SyncPayload {
            clerk_id: clerk_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
