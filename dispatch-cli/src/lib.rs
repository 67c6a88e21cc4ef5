//! Command-line interface for the fleet dispatch engine.
//!
//! `dispatch ingest` validates order and vehicle batches and stores them in
//! a SQLite database; `dispatch plan` reads the database back and prints a
//! dispatch plan as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod ingest;
mod plan;

pub use error::CliError;

use ingest::IngestArgs;
use plan::PlanArgs;

pub(crate) const ARG_ORDERS: &str = "orders";
pub(crate) const ARG_VEHICLES: &str = "vehicles";
pub(crate) const ARG_DB: &str = "db";
pub(crate) const ENV_INGEST_ORDERS: &str = "DISPATCH_CMDS_INGEST_ORDERS";
pub(crate) const ENV_INGEST_VEHICLES: &str = "DISPATCH_CMDS_INGEST_VEHICLES";
pub(crate) const DEFAULT_DB: &str = "dispatch.db";

/// Run the dispatch CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    match cli.command {
        Command::Ingest(args) => ingest::run_ingest(args),
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dispatch",
    about = "Assign delivery orders to the nearest vehicle with room",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate and store order and vehicle batches.
    Ingest(IngestArgs),
    /// Generate a dispatch plan from the stored orders and vehicles.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
