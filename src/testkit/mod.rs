//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`generator`] - Mock [`ImageGenerator`](crate::port::outbound::generator::ImageGenerator)
//!   with a scripted response queue and an optional release gate.
//! - [`image`] - Source image fixtures.
//! - [`state`] - Ready-made app state and orchestrator wiring.

pub mod generator;
pub mod image;
pub mod state;
