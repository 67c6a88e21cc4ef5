//! `plan` command: print a dispatch plan for the stored records.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use dispatch_core::{DispatchPlan, DispatchPlanner, SqliteDispatchStore};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::ingest::require_existing;
use crate::{ARG_DB, CliError, DEFAULT_DB};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Load every stored order and vehicle and assign orders \
                 greedily: highest priority first, each to the nearest \
                 vehicle that still has room. The plan is printed as JSON.",
    about = "Generate a dispatch plan"
)]
#[ortho_config(prefix = "DISPATCH")]
pub(crate) struct PlanArgs {
    /// SQLite database to read (defaults to `dispatch.db`).
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
}

impl PlanArgs {
    fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(PlanConfig::from(merged))
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) db: Utf8PathBuf,
}

impl From<PlanArgs> for PlanConfig {
    fn from(args: PlanArgs) -> Self {
        Self {
            db: args.db.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DB)),
        }
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &mut stdout)
}

pub(crate) fn run_plan_with(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    // Opening a missing path would silently create an empty database.
    require_existing(&config.db, ARG_DB)?;

    let store = SqliteDispatchStore::open(config.db.as_std_path())?;
    let plan = DispatchPlanner::new(store).generate_plan()?;
    write_plan(writer, &plan)
}

fn write_plan(writer: &mut dyn Write, plan: &DispatchPlan) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(plan).map_err(CliError::SerialiseOutput)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}
