//! # Tech Tree Tools
//!
//! Filesystem side of the generator:
//! - Catalog document loading (XML via `quick-xml`)
//! - Stable ID listing loading
//! - Generator configuration (RON)
//! - Export writers and the data validator

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod validate;
pub mod xml;

pub use config::GeneratorConfig;
pub use error::{Result, ToolError};
