//! Command-line driver for `spcalc-core`: argument handling, the interactive
//! operation menu, and report output.

pub mod config;
pub mod error;
pub mod report;
pub mod session;

pub use config::{Cli, RunConfig};
pub use error::CliError;
pub use report::Report;
pub use session::Session;
