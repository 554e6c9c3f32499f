//! Infrastructure configuration modules.

pub mod gemini;
pub mod limits;
pub mod logging;
pub mod settings;
pub mod share;
pub mod storage;
pub mod transform;
