//! Command-line parsing and result output.

pub mod cli;
pub mod output;

pub use cli::Cli;
pub use output::{ConsoleWriter, MatchWriter, OutputFormat};
