//! External shape of a dispatch plan.
//!
//! These types carry no decisions; they render the final
//! [`VehicleState`] values and the unassigned orders of a pass.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DeliveryOrder, Priority, VehicleState};

/// Complete output of one planning pass.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DispatchPlan {
    /// One entry per vehicle, sorted by vehicle identifier.
    pub dispatch_plan: Vec<VehiclePlan>,
    /// Orders no vehicle could take, in processing order.
    pub unassigned_orders: Vec<AssignedOrder>,
}

/// Assignments for a single vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VehiclePlan {
    /// Identifier of the vehicle.
    pub vehicle_id: String,
    /// Sum of assigned package weights.
    pub total_load: f64,
    /// Travelled distance, e.g. `"12.34 km"`.
    pub total_distance: String,
    /// Orders in the sequence they were assigned.
    pub assigned_orders: Vec<AssignedOrder>,
}

/// An order as it appears in a plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AssignedOrder {
    /// Order identifier.
    pub order_id: String,
    /// Drop point latitude.
    pub latitude: f64,
    /// Drop point longitude.
    pub longitude: f64,
    /// Delivery address.
    pub address: String,
    /// Package weight.
    pub package_weight: f64,
    /// Delivery urgency.
    pub priority: Priority,
}

impl DispatchPlan {
    /// Number of orders placed on a vehicle.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.dispatch_plan
            .iter()
            .map(|vehicle| vehicle.assigned_orders.len())
            .sum()
    }

    /// Find the entry for a vehicle.
    #[must_use]
    pub fn vehicle(&self, vehicle_id: &str) -> Option<&VehiclePlan> {
        self.dispatch_plan
            .iter()
            .find(|vehicle| vehicle.vehicle_id == vehicle_id)
    }
}

impl From<&DeliveryOrder> for AssignedOrder {
    fn from(order: &DeliveryOrder) -> Self {
        Self {
            order_id: order.id.clone(),
            latitude: order.latitude(),
            longitude: order.longitude(),
            address: order.address.clone(),
            package_weight: order.package_weight,
            priority: order.priority,
        }
    }
}

impl From<&VehicleState<'_>> for VehiclePlan {
    fn from(state: &VehicleState<'_>) -> Self {
        Self {
            vehicle_id: state.id().to_owned(),
            total_load: state.total_load(),
            total_distance: format_distance_km(state.total_distance()),
            assigned_orders: state
                .assigned_orders()
                .iter()
                .map(|order| AssignedOrder::from(*order))
                .collect(),
        }
    }
}

/// Render kilometres with two decimals and a unit suffix.
///
/// Rounding works on the shortest decimal form of `km` and sends midpoints
/// away from zero, so `0.125` renders as `0.13` even though its binary
/// value sits just below the midpoint.
///
/// # Examples
/// ```
/// use dispatch_core::format_distance_km;
///
/// assert_eq!(format_distance_km(0.1514), "0.15 km");
/// assert_eq!(format_distance_km(0.0), "0.00 km");
/// assert_eq!(format_distance_km(2.675), "2.68 km");
/// ```
#[must_use]
pub fn format_distance_km(km: f64) -> String {
    match Decimal::from_str(&km.to_string()) {
        Ok(value) => {
            let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2} km")
        }
        // Non-finite or out-of-range values have no decimal form.
        Err(_) => format!("{km:.2} km"),
    }
}
