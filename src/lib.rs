//! flowgen - describe a flowchart in plain text, get an image back.
//!
//! The [`GenerationController`] submits the current query to a remote
//! generation service, tracks the single visible outcome and projects it into
//! a [`ViewState`] for the terminal front end in `main.rs`.
//!
//! ```no_run
//! use flowgen::{Config, FileImageSaver, GenerationController, HttpGenerationService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> flowgen::Result<()> {
//!     let config = Config::new().with_endpoint("http://localhost:5000/generate");
//!     let service = Arc::new(HttpGenerationService::new(&config)?);
//!     let saver = Arc::new(FileImageSaver::new(&config.output_dir));
//!
//!     let mut controller = GenerationController::new(service, saver);
//!     controller.update_query("user signs up, verifies email, lands on dashboard");
//!     controller.submit();
//!     controller.resolve_next().await;
//!     println!("{:?}", controller.current_view_state());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod models;
pub mod render;
pub mod save;
pub mod service;

pub use config::Config;
pub use controller::GenerationController;
pub use error::{FlowgenError, Result, FALLBACK_MESSAGE};
pub use models::*;
pub use save::{FileImageSaver, ImageSaver, SAVE_FILE_NAME};
pub use service::{GenerationService, HttpGenerationService};
