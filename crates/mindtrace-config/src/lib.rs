//! # mindtrace configuration
//!
//! Typed configuration for the mindtrace workspace: where session logs go,
//! which words each lexical pattern category matches, how host sensors are
//! sampled, and how diagnostics are emitted through `tracing`.
//!
//! ## Features
//!
//! - Multi-format support (TOML, YAML, JSON), selected by file extension
//! - Pattern tables that can be extended without touching detection logic
//! - `tracing-subscriber` setup driven by `RUST_LOG` or the configured level
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mindtrace_config::MindtraceConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MindtraceConfig::load_or_default("mindtrace.toml")?;
//!     config.logging.init();
//!     println!("logging sessions to {}", config.logger.log_dir.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
mod patterns;

pub use config::*;
pub use logging::*;
pub use patterns::*;
