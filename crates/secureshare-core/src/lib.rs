//! SecureShare Core Library
//!
//! This crate provides the domain models, configuration, and session state
//! shared by the SecureShare client components. It has no HTTP dependency;
//! the api-client crate layers the network on top of these types.

pub mod config;
pub mod error;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::CoreError;
pub use session::{
    FileSessionStorage, MemorySessionStorage, SessionHandle, SessionState, SessionStorage,
    StoredSession,
};
