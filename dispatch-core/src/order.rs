use geo::Coord;

use crate::Priority;

/// A package waiting to be delivered.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Records
/// reaching the planner have already passed ingestion, so the identifier is
/// trimmed and unique, and the weight is positive.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use dispatch_core::{DeliveryOrder, Priority};
///
/// let order = DeliveryOrder::new(
///     "ORD001",
///     Coord { x: 77.5933, y: 12.9721 },
///     "MG Road",
///     10.0,
///     Priority::High,
/// );
///
/// assert_eq!(order.id, "ORD001");
/// assert_eq!(order.latitude(), 12.9721);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOrder {
    /// Externally assigned identifier.
    pub id: String,
    /// Drop point.
    pub location: Coord<f64>,
    /// Free-text delivery address.
    pub address: String,
    /// Package weight in the same unit as vehicle capacity.
    pub package_weight: f64,
    /// Delivery urgency.
    pub priority: Priority,
}

impl DeliveryOrder {
    /// Construct an order from already validated parts.
    pub fn new(
        id: impl Into<String>,
        location: Coord<f64>,
        address: impl Into<String>,
        package_weight: f64,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            address: address.into(),
            package_weight,
            priority,
        }
    }

    /// Latitude of the drop point in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude of the drop point in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}
