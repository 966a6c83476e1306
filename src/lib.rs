//! Library exports for usersync, shared between the binary and tests.

pub mod config;
pub mod events;
pub mod models;
pub mod remote;
pub mod startup;
pub mod store;
pub mod sync;
pub mod utils;
