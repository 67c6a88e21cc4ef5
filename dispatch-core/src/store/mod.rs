//! Persistence boundary for orders and vehicles.
//!
//! The planner only needs a consistent [`Snapshot`] per pass. Ingestion
//! writes whole batches: a batch is either stored completely or not at all,
//! and re-ingesting an identifier replaces the stored record in place.

use crate::{DeliveryOrder, Vehicle};

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryDispatchStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteDispatchStore, SqliteDispatchStoreError};

/// Orders and vehicles read together for one planning pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Orders in load order.
    pub orders: Vec<DeliveryOrder>,
    /// Vehicles in load order.
    pub vehicles: Vec<Vehicle>,
}

/// Read and write access to stored orders and vehicles.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use dispatch_core::{DispatchStore, MemoryDispatchStore, Vehicle};
///
/// let mut store = MemoryDispatchStore::default();
/// let vehicle = Vehicle::new("VEH001", 100.0, Coord { x: 0.0, y: 0.0 }, "Depot");
/// store.save_vehicles(&[vehicle.clone()])?;
///
/// let snapshot = store.snapshot()?;
/// assert_eq!(snapshot.vehicles, vec![vehicle]);
/// assert!(snapshot.orders.is_empty());
/// # Ok::<(), std::convert::Infallible>(())
/// ```
pub trait DispatchStore {
    /// Failure raised by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read every stored order and vehicle as one consistent view.
    fn snapshot(&self) -> Result<Snapshot, Self::Error>;

    /// Upsert a batch of orders atomically.
    fn save_orders(&mut self, orders: &[DeliveryOrder]) -> Result<(), Self::Error>;

    /// Upsert a batch of vehicles atomically.
    fn save_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<(), Self::Error>;
}
