//! In-memory store for tests and embedders that keep records themselves.

use std::convert::Infallible;

use crate::{DeliveryOrder, Vehicle};

use super::{DispatchStore, Snapshot};

/// `DispatchStore` backed by two vectors.
///
/// Lookups are linear scans; the store is meant for small datasets.
#[derive(Debug, Clone, Default)]
pub struct MemoryDispatchStore {
    orders: Vec<DeliveryOrder>,
    vehicles: Vec<Vehicle>,
}

impl MemoryDispatchStore {
    /// Create a store holding the given records.
    pub fn with_records<O, V>(orders: O, vehicles: V) -> Self
    where
        O: IntoIterator<Item = DeliveryOrder>,
        V: IntoIterator<Item = Vehicle>,
    {
        let mut store = Self::default();
        store.insert_orders(orders);
        store.insert_vehicles(vehicles);
        store
    }

    /// Upsert orders by identifier.
    pub fn insert_orders<I>(&mut self, orders: I)
    where
        I: IntoIterator<Item = DeliveryOrder>,
    {
        for order in orders {
            upsert(&mut self.orders, order, |o| o.id.as_str());
        }
    }

    /// Upsert vehicles by identifier.
    pub fn insert_vehicles<I>(&mut self, vehicles: I)
    where
        I: IntoIterator<Item = Vehicle>,
    {
        for vehicle in vehicles {
            upsert(&mut self.vehicles, vehicle, |v| v.id.as_str());
        }
    }
}

fn upsert<T>(records: &mut Vec<T>, record: T, key: fn(&T) -> &str) {
    match records.iter_mut().find(|existing| key(existing) == key(&record)) {
        Some(slot) => *slot = record,
        None => records.push(record),
    }
}

impl DispatchStore for MemoryDispatchStore {
    type Error = Infallible;

    fn snapshot(&self) -> Result<Snapshot, Self::Error> {
        Ok(Snapshot {
            orders: self.orders.clone(),
            vehicles: self.vehicles.clone(),
        })
    }

    fn save_orders(&mut self, orders: &[DeliveryOrder]) -> Result<(), Self::Error> {
        self.insert_orders(orders.iter().cloned());
        Ok(())
    }

    fn save_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<(), Self::Error> {
        self.insert_vehicles(vehicles.iter().cloned());
        Ok(())
    }
}
