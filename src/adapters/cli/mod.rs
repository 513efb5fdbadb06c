//! CLI Adapter
//!
//! Command-line interface for opn-farmer.
//! Uses clap derive macros for argument parsing.

mod commands;
mod prompt;

pub use commands::{CliApp, Command, QuoteCmd, RunCmd, StatusCmd};
pub use prompt::StdinPrompt;

/// Parse the command line
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
