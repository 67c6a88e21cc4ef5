//! Core types and planning for the fleet dispatch engine.
//!
//! Orders and vehicles are validated once at ingestion
//! ([`ingest`]) and persisted behind a [`DispatchStore`]. A planning pass
//! reads a [`Snapshot`] and assigns orders greedily: highest priority first,
//! each to the nearest vehicle that still has room, using great-circle
//! distance from the vehicle's current position. The result is a
//! [`DispatchPlan`] ready for serialisation.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod distance;
pub mod ingest;
mod order;
mod plan;
mod planner;
mod priority;
mod state;
pub mod store;
mod vehicle;

pub use order::DeliveryOrder;
pub use plan::{AssignedOrder, DispatchPlan, VehiclePlan, format_distance_km};
pub use planner::{DispatchPlanner, plan_dispatch};
pub use priority::{Priority, PriorityParseError};
pub use state::VehicleState;
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteDispatchStore, SqliteDispatchStoreError};
pub use store::{DispatchStore, MemoryDispatchStore, Snapshot};
pub use vehicle::Vehicle;
