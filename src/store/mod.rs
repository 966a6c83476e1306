pub mod current_user;

// Re-export so code outside can do "use crate::store::CurrentUserStore;"
pub use current_user::CurrentUserStore;
