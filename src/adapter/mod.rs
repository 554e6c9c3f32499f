//! Adapters: the CLI driving the application, and the Gemini client and
//! key-value stores it is driven against.

pub mod inbound;
pub mod outbound;
