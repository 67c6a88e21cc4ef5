//! Per-vehicle working state for a single planning pass.
//!
//! A [`VehicleState`] borrows its [`Vehicle`] and the orders assigned to it,
//! so it cannot outlive the snapshot it was built from.

use geo::Coord;

use crate::distance::haversine_km;
use crate::{DeliveryOrder, Vehicle};

/// Mutable planning view of one vehicle.
///
/// `total_load + remaining_capacity` always equals the vehicle's capacity,
/// up to floating-point rounding.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use dispatch_core::{DeliveryOrder, Priority, Vehicle, VehicleState};
///
/// let vehicle = Vehicle::new("VEH001", 10.0, Coord { x: 0.0, y: 0.0 }, "Depot");
/// let order = DeliveryOrder::new("ORD001", Coord { x: 0.0, y: 1.0 }, "North", 4.0, Priority::Low);
///
/// let mut state = VehicleState::new(&vehicle);
/// assert!(state.can_carry(&order));
/// state.assign(&order);
///
/// assert_eq!(state.remaining_capacity(), 6.0);
/// assert_eq!(state.position(), order.location);
/// assert_eq!(state.assigned_orders().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VehicleState<'a> {
    vehicle: &'a Vehicle,
    remaining_capacity: f64,
    position: Coord<f64>,
    total_load: f64,
    total_distance: f64,
    assigned: Vec<&'a DeliveryOrder>,
}

impl<'a> VehicleState<'a> {
    /// Start a pass with the vehicle empty and at its starting position.
    #[must_use]
    pub const fn new(vehicle: &'a Vehicle) -> Self {
        Self {
            vehicle,
            remaining_capacity: vehicle.capacity,
            position: vehicle.location,
            total_load: 0.0,
            total_distance: 0.0,
            assigned: Vec::new(),
        }
    }

    /// The source record.
    #[must_use]
    pub const fn vehicle(&self) -> &'a Vehicle {
        self.vehicle
    }

    /// Identifier of the source vehicle.
    #[must_use]
    pub fn id(&self) -> &'a str {
        &self.vehicle.id
    }

    /// Capacity left after the assignments made so far.
    #[must_use]
    pub const fn remaining_capacity(&self) -> f64 {
        self.remaining_capacity
    }

    /// Sum of assigned package weights.
    #[must_use]
    pub const fn total_load(&self) -> f64 {
        self.total_load
    }

    /// Sum of the legs travelled so far, in kilometres.
    #[must_use]
    pub const fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Where the vehicle is now: its start, or the last assigned drop point.
    #[must_use]
    pub const fn position(&self) -> Coord<f64> {
        self.position
    }

    /// Assigned orders in assignment order.
    #[must_use]
    pub fn assigned_orders(&self) -> &[&'a DeliveryOrder] {
        &self.assigned
    }

    /// Whether the order fits in the remaining capacity.
    ///
    /// A package that exactly fills the vehicle is accepted.
    #[must_use]
    pub fn can_carry(&self, order: &DeliveryOrder) -> bool {
        order.package_weight <= self.remaining_capacity
    }

    /// Distance in kilometres from the current position to `location`.
    #[must_use]
    pub fn distance_to(&self, location: Coord<f64>) -> f64 {
        haversine_km(self.position, location)
    }

    /// Load the order and drive to its drop point.
    ///
    /// The mutation is permanent for the pass. Callers check
    /// [`can_carry`](Self::can_carry) first; this method does not.
    pub fn assign(&mut self, order: &'a DeliveryOrder) {
        let leg = self.distance_to(order.location);
        self.remaining_capacity -= order.package_weight;
        self.total_load += order.package_weight;
        self.total_distance += leg;
        self.position = order.location;
        self.assigned.push(order);
    }
}
