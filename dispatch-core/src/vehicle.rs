use geo::Coord;

/// A delivery vehicle as stored between planning passes.
///
/// Planning never mutates this record; each pass derives a fresh
/// [`VehicleState`](crate::VehicleState) from it instead.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use dispatch_core::Vehicle;
///
/// let vehicle = Vehicle::new("VEH001", 100.0, Coord { x: 77.2090, y: 28.6139 }, "Delhi");
/// assert_eq!(vehicle.capacity, 100.0);
/// assert_eq!(vehicle.longitude(), 77.2090);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Unique identifier.
    pub id: String,
    /// Maximum total package weight the vehicle can carry.
    pub capacity: f64,
    /// Position at the start of a planning pass.
    pub location: Coord<f64>,
    /// Free-text address of the starting position.
    pub address: String,
}

impl Vehicle {
    /// Construct a vehicle from already validated parts.
    pub fn new(
        id: impl Into<String>,
        capacity: f64,
        location: Coord<f64>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            capacity,
            location,
            address: address.into(),
        }
    }

    /// Latitude of the starting position.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude of the starting position.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}
