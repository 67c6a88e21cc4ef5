//! Facade crate for the fleet dispatch engine.
//!
//! This crate re-exports the core domain types, the greedy planner, and the
//! store implementations. The SQLite store sits behind the `store-sqlite`
//! feature.
//!
//! # Examples
//!
//! ```
//! use fleet_dispatch::{DeliveryOrder, Priority, Vehicle, plan_dispatch};
//! use geo::Coord;
//!
//! let depot = Coord { x: 77.5946, y: 12.9716 };
//! let vehicles = [Vehicle::new("VEH001", 50.0, depot, "MG Road")];
//! let orders = [DeliveryOrder::new("ORD001", depot, "MG Road", 10.0, Priority::High)];
//!
//! let plan = plan_dispatch(&orders, &vehicles);
//! assert_eq!(plan.assigned_count(), 1);
//! assert_eq!(plan.dispatch_plan[0].total_distance, "0.00 km");
//! ```

#![forbid(unsafe_code)]

pub use dispatch_core::{
    AssignedOrder, DeliveryOrder, DispatchPlan, DispatchPlanner, DispatchStore,
    MemoryDispatchStore, Priority, PriorityParseError, Snapshot, Vehicle, VehiclePlan,
    VehicleState, distance, format_distance_km, ingest, plan_dispatch,
};

#[cfg(feature = "store-sqlite")]
pub use dispatch_core::{SqliteDispatchStore, SqliteDispatchStoreError};
