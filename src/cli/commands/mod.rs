//! Command implementations for the SLD OCD-ID CLI
//!
//! Each subcommand lives in its own module; this one only dispatches.

pub mod join;
pub mod shared;
pub mod sources;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Run the subcommand selected on the command line
///
/// Does nothing when no subcommand was given; the binary prints help
/// before getting here.
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Join(join_args)) => join::run_join(join_args).await.map(|_| ()),
        Some(Commands::Sources(sources_args)) => sources::run_sources(sources_args).await,
        None => Ok(()),
    }
}
