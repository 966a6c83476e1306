pub mod identity;
pub mod user;

pub use identity::{AuthState, Identity, SyncPayload};
pub use user::User;
