//! Error types emitted by the dispatch CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use dispatch_core::SqliteDispatchStoreError;
use dispatch_core::ingest::IngestError;
use thiserror::Error;

/// Errors emitted by the dispatch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// `ingest` was given neither an orders nor a vehicles batch.
    #[error(
        "nothing to ingest (set --{orders} or {orders_env}, and/or --{vehicles} or {vehicles_env})"
    )]
    NothingToIngest {
        orders: &'static str,
        orders_env: &'static str,
        vehicles: &'static str,
        vehicles_env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening a batch file failed.
    #[error("failed to open {field} batch at {path:?}: {source}")]
    OpenBatch {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A batch file is not valid JSON for its shape.
    #[error("failed to parse {field} batch JSON at {path:?}: {source}")]
    ParseBatch {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A batch failed validation and nothing from it was stored.
    #[error("{field} batch in {path:?} was rejected: {source}")]
    InvalidBatch {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: IngestError,
    },
    /// The database's parent directory could not be created.
    #[error("failed to create directory for database {path:?}: {source}")]
    CreateDatabaseDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading from or writing to the dispatch database failed.
    #[error("dispatch store failed: {0}")]
    Store(#[from] SqliteDispatchStoreError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl CliError {
    /// Individual field problems behind a rejected batch, one per line.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::InvalidBatch {
                source: source @ IngestError::Validation { .. },
                ..
            } => source.details(),
            _ => Vec::new(),
        }
    }
}
