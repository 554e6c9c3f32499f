//! Roomstyle - redesign room photos in a chosen decor style.
//!
//! A photo, a style preset and optional instructions are turned into a
//! prompt and sent to Gemini's image generation endpoint; the returned
//! image becomes the current result and is appended to the session
//! history. The API key is kept in memory and, when asked, in a local
//! obfuscated store.
//!
//! # Modules
//!
//! - [`domain`] - Images, style presets, prompts, history, credentials
//! - [`port`] - Image generator and key-value store traits
//! - [`application`] - Validation, credential store, transform orchestration
//! - [`adapter`] - Gemini client, file and memory stores, CLI
//! - [`infrastructure`] - Configuration and the composition root
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use roomstyle::application::orchestrator::{SourceSelection, TransformInput};
//! use roomstyle::infrastructure::bootstrap::App;
//! use roomstyle::infrastructure::config::settings::Config;
//!
//! # async fn run() -> roomstyle::error::Result<()> {
//! let app = App::build(Config::load_or_default("config.toml")?);
//! let photo = app.orchestrator().validator().read_image("room.jpg".as_ref())?;
//! let input = TransformInput::new(SourceSelection::Upload(photo), "scandinavian");
//! match app.orchestrator().transform(input).await {
//!     Ok(result) => println!("{:?}", result.image.mime_type()),
//!     Err(failure) => eprintln!("{}", failure.error),
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
