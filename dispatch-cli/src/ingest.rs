//! `ingest` command: validate batch files and store them.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use dispatch_core::ingest::{
    IngestError, OrdersBatch, VehiclesBatch, validate_orders, validate_vehicles,
};
use dispatch_core::{DeliveryOrder, DispatchStore, SqliteDispatchStore, Vehicle};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::fs::{ensure_parent_dir, file_is_file, open_utf8_file};
use crate::{
    ARG_DB, ARG_ORDERS, ARG_VEHICLES, CliError, DEFAULT_DB, ENV_INGEST_ORDERS, ENV_INGEST_VEHICLES,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ingest",
    long_about = "Validate order and vehicle batches and store them in the \
                 dispatch database. Each batch is accepted or rejected as a \
                 whole; re-ingesting an identifier replaces the stored record. \
                 Paths can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Validate and store order and vehicle batches"
)]
#[ortho_config(prefix = "DISPATCH")]
pub(crate) struct IngestArgs {
    /// Path to a JSON file with an `orders` array.
    #[arg(long = ARG_ORDERS, value_name = "path")]
    #[serde(default)]
    pub(crate) orders: Option<Utf8PathBuf>,
    /// Path to a JSON file with a `vehicles` array.
    #[arg(long = ARG_VEHICLES, value_name = "path")]
    #[serde(default)]
    pub(crate) vehicles: Option<Utf8PathBuf>,
    /// SQLite database to write (defaults to `dispatch.db`).
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
}

impl IngestArgs {
    fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) orders: Option<Utf8PathBuf>,
    pub(crate) vehicles: Option<Utf8PathBuf>,
    pub(crate) db: Utf8PathBuf,
}

impl IngestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if let Some(path) = &self.orders {
            require_existing(path, ARG_ORDERS)?;
        }
        if let Some(path) = &self.vehicles {
            require_existing(path, ARG_VEHICLES)?;
        }
        Ok(())
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        if args.orders.is_none() && args.vehicles.is_none() {
            return Err(CliError::NothingToIngest {
                orders: ARG_ORDERS,
                orders_env: ENV_INGEST_ORDERS,
                vehicles: ARG_VEHICLES,
                vehicles_env: ENV_INGEST_VEHICLES,
            });
        }
        Ok(Self {
            orders: args.orders,
            vehicles: args.vehicles,
            db: args.db.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DB)),
        })
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Summary printed after a successful ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestReceipt {
    pub(crate) status: String,
    pub(crate) message: String,
    pub(crate) orders_accepted: usize,
    pub(crate) vehicles_accepted: usize,
}

impl IngestReceipt {
    fn new(orders: Option<&[DeliveryOrder]>, vehicles: Option<&[Vehicle]>) -> Self {
        let message = match (orders.is_some(), vehicles.is_some()) {
            (true, true) => "Delivery orders and vehicle details accepted.",
            (true, false) => "Delivery orders accepted.",
            _ => "Vehicle details accepted.",
        };
        Self {
            status: "success".to_owned(),
            message: message.to_owned(),
            orders_accepted: orders.map_or(0, <[DeliveryOrder]>::len),
            vehicles_accepted: vehicles.map_or(0, <[Vehicle]>::len),
        }
    }
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_ingest_with(args, &mut stdout)
}

pub(crate) fn run_ingest_with(args: IngestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;

    // Both batches are validated before anything is written, so a bad
    // vehicles file never leaves a fresh orders batch behind.
    let orders = config
        .orders
        .as_deref()
        .map(|path| load_batch::<OrdersBatch, _>(path, ARG_ORDERS, validate_orders))
        .transpose()?;
    let vehicles = config
        .vehicles
        .as_deref()
        .map(|path| load_batch::<VehiclesBatch, _>(path, ARG_VEHICLES, validate_vehicles))
        .transpose()?;

    let mut store = open_store(&config.db)?;
    if let Some(batch) = &orders {
        store.save_orders(batch)?;
        log::info!("saved {} orders to {}", batch.len(), config.db);
    }
    if let Some(batch) = &vehicles {
        store.save_vehicles(batch)?;
        log::info!("saved {} vehicles to {}", batch.len(), config.db);
    }

    let receipt = IngestReceipt::new(orders.as_deref(), vehicles.as_deref());
    write_receipt(writer, &receipt)
}

fn load_batch<B, T>(
    path: &Utf8Path,
    field: &'static str,
    validate: fn(&B) -> Result<Vec<T>, IngestError>,
) -> Result<Vec<T>, CliError>
where
    B: DeserializeOwned,
{
    let file = open_utf8_file(path).map_err(|source| CliError::OpenBatch {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    let batch: B = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        CliError::ParseBatch {
            field,
            path: path.to_path_buf(),
            source,
        }
    })?;
    validate(&batch).map_err(|source| {
        log::warn!("rejected {field} batch {path}: {source}");
        CliError::InvalidBatch {
            field,
            path: path.to_path_buf(),
            source,
        }
    })
}

fn open_store(db: &Utf8Path) -> Result<SqliteDispatchStore, CliError> {
    ensure_parent_dir(db).map_err(|source| CliError::CreateDatabaseDirectory {
        path: db.to_path_buf(),
        source,
    })?;
    Ok(SqliteDispatchStore::open(db.as_std_path())?)
}

fn write_receipt(writer: &mut dyn Write, receipt: &IngestReceipt) -> Result<(), CliError> {
    let payload = serde_json::to_string(receipt).map_err(CliError::SerialiseOutput)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}
