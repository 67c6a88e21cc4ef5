//! Greedy priority-first assignment of orders to vehicles.
//!
//! Orders are processed highest priority first (stable within a priority).
//! Each order goes to the capacity-feasible vehicle whose *current* position
//! is nearest to the drop point; the vehicle then moves there, so later
//! orders see the updated fleet. Decisions are never revisited.

use crate::{
    AssignedOrder, DeliveryOrder, DispatchPlan, DispatchStore, Vehicle, VehiclePlan, VehicleState,
};

/// Compute a dispatch plan from a snapshot of orders and vehicles.
///
/// The function is total: an order no vehicle can take is reported in
/// [`DispatchPlan::unassigned_orders`], never as an error. Vehicles are
/// listed by identifier, including those left empty.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use dispatch_core::{plan_dispatch, DeliveryOrder, Priority, Vehicle};
///
/// let vehicles = [Vehicle::new("VEH001", 10.0, Coord { x: 0.0, y: 0.0 }, "Depot")];
/// let orders = [
///     DeliveryOrder::new("ORD-LOW", Coord { x: 0.0, y: 0.0 }, "Depot", 10.0, Priority::Low),
///     DeliveryOrder::new("ORD-HIGH", Coord { x: 0.1, y: 0.1 }, "Elsewhere", 10.0, Priority::High),
/// ];
///
/// let plan = plan_dispatch(&orders, &vehicles);
/// assert_eq!(plan.dispatch_plan[0].assigned_orders[0].order_id, "ORD-HIGH");
/// assert_eq!(plan.unassigned_orders[0].order_id, "ORD-LOW");
/// ```
#[must_use]
pub fn plan_dispatch(orders: &[DeliveryOrder], vehicles: &[Vehicle]) -> DispatchPlan {
    log::info!(
        "generating plan for {} orders and {} vehicles",
        orders.len(),
        vehicles.len()
    );

    let mut fleet: Vec<&Vehicle> = vehicles.iter().collect();
    fleet.sort_by(|lhs, rhs| lhs.id.cmp(&rhs.id));
    let mut states: Vec<VehicleState<'_>> = fleet.into_iter().map(VehicleState::new).collect();

    let mut queue: Vec<&DeliveryOrder> = orders.iter().collect();
    // `sort_by_key` is stable: equal priorities keep their load order.
    queue.sort_by_key(|order| order.priority.rank());

    let mut unassigned = Vec::new();
    for order in queue {
        match nearest_feasible(&mut states, order) {
            Some(state) => {
                log::debug!("assigning order {} to vehicle {}", order.id, state.id());
                state.assign(order);
            }
            None => {
                log::debug!("no vehicle can carry order {}", order.id);
                unassigned.push(AssignedOrder::from(order));
            }
        }
    }

    let plan = DispatchPlan {
        dispatch_plan: states.iter().map(VehiclePlan::from).collect(),
        unassigned_orders: unassigned,
    };
    log::info!(
        "generated plan with {} vehicles and {} unassigned orders",
        plan.dispatch_plan.len(),
        plan.unassigned_orders.len()
    );
    plan
}

/// Pick the feasible vehicle nearest to the order right now.
///
/// Ties keep the vehicle met first in scan order.
fn nearest_feasible<'s, 'a>(
    states: &'s mut [VehicleState<'a>],
    order: &DeliveryOrder,
) -> Option<&'s mut VehicleState<'a>> {
    let mut best: Option<(f64, &'s mut VehicleState<'a>)> = None;
    for state in states.iter_mut() {
        if !state.can_carry(order) {
            continue;
        }
        let distance = state.distance_to(order.location);
        if best.as_ref().is_none_or(|(nearest, _)| distance < *nearest) {
            best = Some((distance, state));
        }
    }
    best.map(|(_, state)| state)
}

/// Plans against a [`DispatchStore`], reading a fresh snapshot per call.
///
/// Store failures surface as the store's error type; planning itself
/// cannot fail.
#[derive(Debug)]
pub struct DispatchPlanner<S> {
    store: S,
}

impl<S: DispatchStore> DispatchPlanner<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the current orders and vehicles and plan them.
    pub fn generate_plan(&self) -> Result<DispatchPlan, S::Error> {
        let snapshot = self.store.snapshot()?;
        Ok(plan_dispatch(&snapshot.orders, &snapshot.vehicles))
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}
