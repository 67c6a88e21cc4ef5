//! Validation of raw order and vehicle batches.
//!
//! Batches arrive as loosely typed payloads where every field may be absent.
//! [`validate_orders`] and [`validate_vehicles`] turn a payload into domain
//! records or reject the whole batch. Checks run in three stages and stop at
//! the first stage that fails:
//!
//! 1. field validation, which reports every problem in the batch at once;
//! 2. duplicate identifiers, compared after trimming;
//! 3. mapping, which trims text and parses priorities.

use std::collections::HashSet;

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DeliveryOrder, Priority, PriorityParseError, Vehicle};

/// A batch of orders as submitted for ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct OrdersBatch {
    /// Submitted orders.
    pub orders: Vec<OrderRequest>,
}

/// One order as submitted; every field is optional until validated.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct OrderRequest {
    /// Order identifier.
    pub order_id: Option<String>,
    /// Drop point latitude.
    pub latitude: Option<f64>,
    /// Drop point longitude.
    pub longitude: Option<f64>,
    /// Delivery address.
    pub address: Option<String>,
    /// Package weight.
    pub package_weight: Option<f64>,
    /// Priority text, case-insensitive.
    pub priority: Option<String>,
}

/// A batch of vehicles as submitted for ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct VehiclesBatch {
    /// Submitted vehicles.
    pub vehicles: Vec<VehicleRequest>,
}

/// One vehicle as submitted; every field is optional until validated.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct VehicleRequest {
    /// Vehicle identifier.
    pub vehicle_id: Option<String>,
    /// Maximum load.
    pub capacity: Option<f64>,
    /// Starting latitude.
    pub current_latitude: Option<f64>,
    /// Starting longitude.
    pub current_longitude: Option<f64>,
    /// Starting address.
    pub current_address: Option<String>,
}

/// Reasons a batch is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// One or more fields were missing or out of range.
    #[error("validation failed")]
    Validation {
        /// One entry per problem, formatted as `<path>: <message>`.
        details: Vec<String>,
    },
    /// Two orders in the batch share an identifier.
    #[error("duplicate orderId found in request: {id}")]
    DuplicateOrderId {
        /// The trimmed identifier.
        id: String,
    },
    /// Two vehicles in the batch share an identifier.
    #[error("duplicate vehicleId found in request: {id}")]
    DuplicateVehicleId {
        /// The trimmed identifier.
        id: String,
    },
    /// An order names an unknown priority.
    #[error("invalid priority for order {order_id}; allowed values: HIGH, MEDIUM, LOW")]
    InvalidPriority {
        /// Identifier of the offending order.
        order_id: String,
        /// Parse failure.
        #[source]
        source: PriorityParseError,
    },
}

impl IngestError {
    /// Human-readable problem list.
    ///
    /// Field validation yields one line per problem; other failures yield
    /// their message.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Validation { details } => details.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Collects `<path>: <message>` entries for one batch.
#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn push(&mut self, path: &str, message: &str) {
        self.0.push(format!("{path}: {message}"));
    }

    fn require_text(&mut self, path: &str, field: &str, value: Option<&String>) {
        if value.is_none_or(|text| text.trim().is_empty()) {
            self.push(&format!("{path}.{field}"), &format!("{field} is required"));
        }
    }

    fn require_number(&mut self, path: &str, field: &str, value: Option<f64>) {
        if value.is_none() {
            self.push(&format!("{path}.{field}"), &format!("{field} is required"));
        }
    }

    fn require_positive(&mut self, path: &str, field: &str, value: Option<f64>) {
        match value {
            None => self.require_number(path, field, value),
            Some(number) if number <= 0.0 => {
                self.push(&format!("{path}.{field}"), &format!("{field} must be positive"));
            }
            Some(_) => {}
        }
    }

    fn into_result(self) -> Result<(), IngestError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(IngestError::Validation { details: self.0 })
        }
    }
}

/// Validate an order batch and map it to domain records.
///
/// # Examples
/// ```
/// use dispatch_core::ingest::{validate_orders, OrderRequest, OrdersBatch};
/// use dispatch_core::Priority;
///
/// let batch = OrdersBatch {
///     orders: vec![OrderRequest {
///         order_id: Some(" ORD001 ".into()),
///         latitude: Some(12.9716),
///         longitude: Some(77.5946),
///         address: Some("MG Road".into()),
///         package_weight: Some(10.0),
///         priority: Some("high".into()),
///     }],
/// };
///
/// let orders = validate_orders(&batch)?;
/// assert_eq!(orders[0].id, "ORD001");
/// assert_eq!(orders[0].priority, Priority::High);
/// # Ok::<(), dispatch_core::ingest::IngestError>(())
/// ```
pub fn validate_orders(batch: &OrdersBatch) -> Result<Vec<DeliveryOrder>, IngestError> {
    check_order_fields(batch)?;
    check_unique(
        batch.orders.iter().map(|o| o.order_id.as_deref()),
        |id| IngestError::DuplicateOrderId { id },
    )?;
    batch.orders.iter().map(map_order).collect()
}

/// Validate a vehicle batch and map it to domain records.
pub fn validate_vehicles(batch: &VehiclesBatch) -> Result<Vec<Vehicle>, IngestError> {
    check_vehicle_fields(batch)?;
    check_unique(
        batch.vehicles.iter().map(|v| v.vehicle_id.as_deref()),
        |id| IngestError::DuplicateVehicleId { id },
    )?;
    Ok(batch.vehicles.iter().map(map_vehicle).collect())
}

fn check_order_fields(batch: &OrdersBatch) -> Result<(), IngestError> {
    let mut violations = Violations::default();
    if batch.orders.is_empty() {
        violations.push("orders", "orders must not be empty");
    }
    for (index, order) in batch.orders.iter().enumerate() {
        let path = format!("orders[{index}]");
        violations.require_text(&path, "orderId", order.order_id.as_ref());
        violations.require_number(&path, "latitude", order.latitude);
        violations.require_number(&path, "longitude", order.longitude);
        violations.require_text(&path, "address", order.address.as_ref());
        violations.require_positive(&path, "packageWeight", order.package_weight);
        violations.require_text(&path, "priority", order.priority.as_ref());
    }
    violations.into_result()
}

fn check_vehicle_fields(batch: &VehiclesBatch) -> Result<(), IngestError> {
    let mut violations = Violations::default();
    if batch.vehicles.is_empty() {
        violations.push("vehicles", "vehicles must not be empty");
    }
    for (index, vehicle) in batch.vehicles.iter().enumerate() {
        let path = format!("vehicles[{index}]");
        violations.require_text(&path, "vehicleId", vehicle.vehicle_id.as_ref());
        violations.require_positive(&path, "capacity", vehicle.capacity);
        violations.require_number(&path, "currentLatitude", vehicle.current_latitude);
        violations.require_number(&path, "currentLongitude", vehicle.current_longitude);
        violations.require_text(&path, "currentAddress", vehicle.current_address.as_ref());
    }
    violations.into_result()
}

fn check_unique<'a>(
    ids: impl Iterator<Item = Option<&'a str>>,
    duplicate: impl Fn(String) -> IngestError,
) -> Result<(), IngestError> {
    let mut seen = HashSet::new();
    for id in ids.map(|id| id.unwrap_or_default().trim()) {
        if !seen.insert(id) {
            return Err(duplicate(id.to_owned()));
        }
    }
    Ok(())
}

fn trimmed(value: Option<&String>) -> String {
    value.map(|text| text.trim().to_owned()).unwrap_or_default()
}

// Field validation has already run, so absent numbers cannot reach here;
// zero stands in to keep the mapping total.
fn map_order(request: &OrderRequest) -> Result<DeliveryOrder, IngestError> {
    let id = trimmed(request.order_id.as_ref());
    let priority = request
        .priority
        .as_deref()
        .unwrap_or_default()
        .parse::<Priority>()
        .map_err(|source| IngestError::InvalidPriority {
            order_id: id.clone(),
            source,
        })?;
    Ok(DeliveryOrder::new(
        id,
        Coord {
            x: request.longitude.unwrap_or_default(),
            y: request.latitude.unwrap_or_default(),
        },
        trimmed(request.address.as_ref()),
        request.package_weight.unwrap_or_default(),
        priority,
    ))
}

fn map_vehicle(request: &VehicleRequest) -> Vehicle {
    Vehicle::new(
        trimmed(request.vehicle_id.as_ref()),
        request.capacity.unwrap_or_default(),
        Coord {
            x: request.current_longitude.unwrap_or_default(),
            y: request.current_latitude.unwrap_or_default(),
        },
        trimmed(request.current_address.as_ref()),
    )
}
