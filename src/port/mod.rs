//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the application layer and the outside
//! world. Outbound adapters implement them:
//!
//! ```text
//!                ┌─────────────────────────┐
//!                │       Application       │
//!                │  validator, credential  │
//!                │  store, orchestrator    │
//!                └────────────┬────────────┘
//!                  ┌──────────┴──────────┐
//!                  ▼                     ▼
//!          ┌───────────────┐     ┌───────────────┐
//!          │ ImageGenerator│     │ KeyValueStore │
//!          │ (Gemini HTTP) │     │ (JSON file)   │
//!          └───────────────┘     └───────────────┘
//! ```

pub mod outbound;
