//! CLI module graph.

pub mod check;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod dispatch;
pub mod key;
pub mod output;
pub mod paths;
pub mod session;
pub mod share;
pub mod styles;
pub mod transform;
