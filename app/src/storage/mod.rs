//! Storage module
//!
//! Provides the on-device key-value store for client-side session state.

pub mod local_store;

pub use local_store::LocalStore;
