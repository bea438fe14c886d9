//! Tapestry CLI library.
//!
//! Drives the organization engine over an in-memory backend seeded from a
//! JSON fixture: analysis, automatic organization, relationship networks,
//! learning pathways, relationship suggestions and configuration.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod session;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
pub use session::Session;
