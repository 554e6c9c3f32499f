//! Outbound adapters: implementations of the outbound ports.

pub mod clipboard;
pub mod gemini;
pub mod storage;
