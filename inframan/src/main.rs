// External crates
use clap::Parser;

// Internal imports
use inframan_core::inframan_error;

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn main() {
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = inframan_logging::init_subscriber();

    let args = Args::parse();

    if let Err(e) = execute_command(args) {
        inframan_error!("{}", e);
        std::process::exit(1);
    }
}
