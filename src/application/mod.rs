//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod cipher;
pub mod credential;
pub mod export;
pub mod orchestrator;
pub mod share;
pub mod state;
pub mod validate;
