//! dobuild - cross-platform CMake build driver
//!
//! Resolves a per-platform build configuration from CLI flags, environment
//! variables and hard-coded defaults, then drives CMake through its generate
//! and build phases as child processes.
//!
//! ## Architecture
//!
//! ```text
//! CLI args + env → build::BuildConfig → build::runner → cmake (child process)
//! ```

mod build;
mod cli;
mod error;
mod exec;
mod utils;

use clap::Parser;

use cli::Cli;
use error::DobuildError;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        match err.downcast_ref::<DobuildError>() {
            Some(known) => known.display_with_hints(),
            None => utils::terminal::print_error(&format!("{err:#}")),
        }
        std::process::exit(1);
    }
}
