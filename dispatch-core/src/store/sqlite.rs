//! SQLite-backed store for ingested orders and vehicles.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use rusqlite::{Connection, Error as SqliteError, Row, Transaction, params};
use thiserror::Error;

use crate::{DeliveryOrder, Priority, PriorityParseError, Vehicle};

use super::{DispatchStore, Snapshot};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS delivery_orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id TEXT NOT NULL UNIQUE,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        address TEXT NOT NULL,
        package_weight REAL NOT NULL,
        priority TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS vehicles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vehicle_id TEXT NOT NULL UNIQUE,
        capacity REAL NOT NULL,
        current_latitude REAL NOT NULL,
        current_longitude REAL NOT NULL,
        current_address TEXT NOT NULL
    );
";

// Upserts keep the original row id, so a re-ingested record keeps its
// place in load order.
const UPSERT_ORDER: &str = "
    INSERT INTO delivery_orders
        (order_id, latitude, longitude, address, package_weight, priority)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(order_id) DO UPDATE SET
        latitude = excluded.latitude,
        longitude = excluded.longitude,
        address = excluded.address,
        package_weight = excluded.package_weight,
        priority = excluded.priority
";

const UPSERT_VEHICLE: &str = "
    INSERT INTO vehicles
        (vehicle_id, capacity, current_latitude, current_longitude, current_address)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(vehicle_id) DO UPDATE SET
        capacity = excluded.capacity,
        current_latitude = excluded.current_latitude,
        current_longitude = excluded.current_longitude,
        current_address = excluded.current_address
";

const SELECT_ORDERS: &str = "
    SELECT order_id, latitude, longitude, address, package_weight, priority
    FROM delivery_orders ORDER BY id
";

const SELECT_VEHICLES: &str = "
    SELECT vehicle_id, capacity, current_latitude, current_longitude, current_address
    FROM vehicles ORDER BY id
";

/// Errors raised while reading or writing the dispatch database.
#[derive(Debug, Error)]
pub enum SqliteDispatchStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Location of the database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the tables failed.
    #[error("failed to create dispatch tables")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning a transaction failed.
    #[error("failed to begin transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Preparing a statement failed.
    #[error("failed to prepare statement")]
    Prepare {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing an order row failed.
    #[error("failed to persist order {order_id}")]
    PersistOrder {
        /// Identifier of the order being written.
        order_id: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing a vehicle row failed.
    #[error("failed to persist vehicle {vehicle_id}")]
    PersistVehicle {
        /// Identifier of the vehicle being written.
        vehicle_id: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Reading rows failed.
    #[error("failed to read {table}")]
    Read {
        /// Table being read.
        table: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A stored order carries a priority outside the known set.
    #[error("order {order_id} has an invalid stored priority")]
    InvalidPriority {
        /// Identifier of the offending order.
        order_id: String,
        /// Parse failure.
        #[source]
        source: PriorityParseError,
    },
    /// Committing a transaction failed.
    #[error("failed to commit transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Dispatch store persisted in a single SQLite file.
///
/// Both tables are created on open when missing.
pub struct SqliteDispatchStore {
    connection: Connection,
}

impl fmt::Debug for SqliteDispatchStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDispatchStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteDispatchStore {
    /// Open or create the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteDispatchStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteDispatchStoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteDispatchStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteDispatchStoreError::Open {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqliteDispatchStoreError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|source| SqliteDispatchStoreError::CreateSchema { source })?;
        Ok(Self { connection })
    }
}

impl DispatchStore for SqliteDispatchStore {
    type Error = SqliteDispatchStoreError;

    fn snapshot(&self) -> Result<Snapshot, Self::Error> {
        // Both tables are read inside one transaction so a concurrent
        // ingest cannot interleave between them.
        let transaction = self
            .connection
            .unchecked_transaction()
            .map_err(|source| SqliteDispatchStoreError::BeginTransaction { source })?;
        let orders = load_orders(&transaction)?;
        let vehicles = load_vehicles(&transaction)?;
        transaction
            .commit()
            .map_err(|source| SqliteDispatchStoreError::Commit { source })?;
        log::debug!(
            "loaded {} orders and {} vehicles from SQLite",
            orders.len(),
            vehicles.len()
        );
        Ok(Snapshot { orders, vehicles })
    }

    fn save_orders(&mut self, orders: &[DeliveryOrder]) -> Result<(), Self::Error> {
        let transaction = self
            .connection
            .transaction()
            .map_err(|source| SqliteDispatchStoreError::BeginTransaction { source })?;
        persist_orders(&transaction, orders)?;
        transaction
            .commit()
            .map_err(|source| SqliteDispatchStoreError::Commit { source })
    }

    fn save_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<(), Self::Error> {
        let transaction = self
            .connection
            .transaction()
            .map_err(|source| SqliteDispatchStoreError::BeginTransaction { source })?;
        persist_vehicles(&transaction, vehicles)?;
        transaction
            .commit()
            .map_err(|source| SqliteDispatchStoreError::Commit { source })
    }
}

fn persist_orders(
    transaction: &Transaction<'_>,
    orders: &[DeliveryOrder],
) -> Result<(), SqliteDispatchStoreError> {
    if orders.is_empty() {
        return Ok(());
    }
    let mut statement = transaction
        .prepare(UPSERT_ORDER)
        .map_err(|source| SqliteDispatchStoreError::Prepare { source })?;
    for order in orders {
        statement
            .execute(params![
                order.id,
                order.latitude(),
                order.longitude(),
                order.address,
                order.package_weight,
                order.priority.as_str(),
            ])
            .map_err(|source| SqliteDispatchStoreError::PersistOrder {
                order_id: order.id.clone(),
                source,
            })?;
    }
    Ok(())
}

fn persist_vehicles(
    transaction: &Transaction<'_>,
    vehicles: &[Vehicle],
) -> Result<(), SqliteDispatchStoreError> {
    if vehicles.is_empty() {
        return Ok(());
    }
    let mut statement = transaction
        .prepare(UPSERT_VEHICLE)
        .map_err(|source| SqliteDispatchStoreError::Prepare { source })?;
    for vehicle in vehicles {
        statement
            .execute(params![
                vehicle.id,
                vehicle.capacity,
                vehicle.latitude(),
                vehicle.longitude(),
                vehicle.address,
            ])
            .map_err(|source| SqliteDispatchStoreError::PersistVehicle {
                vehicle_id: vehicle.id.clone(),
                source,
            })?;
    }
    Ok(())
}

struct OrderRow {
    id: String,
    latitude: f64,
    longitude: f64,
    address: String,
    package_weight: f64,
    priority: String,
}

impl OrderRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            latitude: row.get(1)?,
            longitude: row.get(2)?,
            address: row.get(3)?,
            package_weight: row.get(4)?,
            priority: row.get(5)?,
        })
    }

    fn into_order(self) -> Result<DeliveryOrder, SqliteDispatchStoreError> {
        let priority = self.priority.parse::<Priority>().map_err(|source| {
            SqliteDispatchStoreError::InvalidPriority {
                order_id: self.id.clone(),
                source,
            }
        })?;
        Ok(DeliveryOrder::new(
            self.id,
            Coord {
                x: self.longitude,
                y: self.latitude,
            },
            self.address,
            self.package_weight,
            priority,
        ))
    }
}

fn load_orders(
    transaction: &Transaction<'_>,
) -> Result<Vec<DeliveryOrder>, SqliteDispatchStoreError> {
    let read_err = |source| SqliteDispatchStoreError::Read {
        table: "delivery_orders",
        source,
    };
    let mut statement = transaction.prepare(SELECT_ORDERS).map_err(read_err)?;
    let rows = statement
        .query_map([], OrderRow::from_row)
        .map_err(read_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    rows.into_iter().map(OrderRow::into_order).collect()
}

fn load_vehicles(transaction: &Transaction<'_>) -> Result<Vec<Vehicle>, SqliteDispatchStoreError> {
    let read_err = |source| SqliteDispatchStoreError::Read {
        table: "vehicles",
        source,
    };
    let mut statement = transaction.prepare(SELECT_VEHICLES).map_err(read_err)?;
    let vehicles = statement
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let capacity: f64 = row.get(1)?;
            let latitude: f64 = row.get(2)?;
            let longitude: f64 = row.get(3)?;
            let address: String = row.get(4)?;
            Ok(Vehicle::new(
                id,
                capacity,
                Coord {
                    x: longitude,
                    y: latitude,
                },
                address,
            ))
        })
        .map_err(read_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    Ok(vehicles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn order(id: &str, weight: f64, priority: Priority) -> DeliveryOrder {
        DeliveryOrder::new(
            id,
            Coord {
                x: 77.1025,
                y: 28.7041,
            },
            "Karol Bagh",
            weight,
            priority,
        )
    }

    fn vehicle(id: &str, capacity: f64) -> Vehicle {
        Vehicle::new(
            id,
            capacity,
            Coord {
                x: 77.2090,
                y: 28.6139,
            },
            "Connaught Place",
        )
    }

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    #[rstest]
    fn fresh_database_is_empty() {
        let store = SqliteDispatchStore::open_in_memory().expect("open store");
        assert_eq!(store.snapshot().expect("snapshot"), Snapshot::default());
    }

    #[rstest]
    fn records_round_trip_in_insertion_order() {
        let mut store = SqliteDispatchStore::open_in_memory().expect("open store");
        let orders = vec![
            order("ORD-B", 2.0, Priority::Low),
            order("ORD-A", 3.5, Priority::High),
        ];
        let vehicles = vec![vehicle("VEH-2", 10.0), vehicle("VEH-1", 20.0)];
        store.save_orders(&orders).expect("save orders");
        store.save_vehicles(&vehicles).expect("save vehicles");

        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot.orders, orders);
        assert_eq!(snapshot.vehicles, vehicles);
    }

    #[rstest]
    fn upsert_replaces_fields_and_keeps_position() {
        let mut store = SqliteDispatchStore::open_in_memory().expect("open store");
        store
            .save_orders(&[
                order("ORD-1", 1.0, Priority::Low),
                order("ORD-2", 1.0, Priority::Low),
            ])
            .expect("first batch");
        store
            .save_orders(&[order("ORD-1", 9.0, Priority::High)])
            .expect("second batch");

        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(
            snapshot.orders,
            vec![
                order("ORD-1", 9.0, Priority::High),
                order("ORD-2", 1.0, Priority::Low),
            ]
        );
    }

    #[rstest]
    fn data_survives_reopen(temp_dir: TempDir) {
        let path = temp_dir.path().join("dispatch.db");
        {
            let mut store = SqliteDispatchStore::open(&path).expect("open store");
            store
                .save_vehicles(&[vehicle("VEH001", 100.0)])
                .expect("save vehicles");
        }
        let store = SqliteDispatchStore::open(&path).expect("reopen store");
        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot.vehicles, vec![vehicle("VEH001", 100.0)]);
    }

    #[rstest]
    fn corrupt_priority_is_reported(temp_dir: TempDir) {
        let path = temp_dir.path().join("dispatch.db");
        let mut store = SqliteDispatchStore::open(&path).expect("open store");
        store
            .save_orders(&[order("ORD001", 1.0, Priority::Medium)])
            .expect("save orders");
        let raw = Connection::open(&path).expect("open raw connection");
        raw.execute(
            "UPDATE delivery_orders SET priority = 'URGENT' WHERE order_id = 'ORD001'",
            [],
        )
        .expect("corrupt row");

        let err = store.snapshot().expect_err("corrupt priority should fail");
        assert!(matches!(
            err,
            SqliteDispatchStoreError::InvalidPriority { ref order_id, .. } if order_id == "ORD001"
        ));
    }
}
