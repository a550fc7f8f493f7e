//! Rolldown analyzer CLI - turn Rolldown debug logs into devtools data.
//!
//! This crate is the command-line front end of `rolldown-analyzer`. It
//! resolves inputs from flags, environment, and an optional config file, runs
//! the analysis, and writes the resulting document (optionally alongside the
//! prebuilt devtools frontend).
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions
//! - [`config`] - layered `rolldown-analyzer.json` / env / flag configuration
//! - [`commands`] - `generate` and `generate-data`
//! - [`error`] - error types with actionable messages
//! - [`logger`] - structured logging with tracing
//! - [`ui`] - spinners, status lines, and the analysis summary
//!
//! # Example
//!
//! ```rust
//! use rolldown_analyzer_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
