//! Test helpers: temporary workspaces and sample batch payloads.

use camino::{Utf8Path, Utf8PathBuf};
use dispatch_core::{DispatchStore, Snapshot, SqliteDispatchStore};
use tempfile::TempDir;

/// Three orders around Bangalore with one of each priority.
pub(super) const ORDERS_JSON: &str = r#"{
  "orders": [
    {"orderId": "ORD001", "latitude": 12.9756, "longitude": 77.6050,
     "address": "MG Road, Bangalore", "packageWeight": 10, "priority": "HIGH"},
    {"orderId": "ORD002", "latitude": 12.9698, "longitude": 77.7500,
     "address": "Whitefield, Bangalore", "packageWeight": 30, "priority": "medium"},
    {"orderId": "ORD003", "latitude": 12.9250, "longitude": 77.5938,
     "address": "Jayanagar, Bangalore", "packageWeight": 80, "priority": "Low"}
  ]
}"#;

/// Two vehicles; VEH002 is too small for ORD003 once it carries ORD002.
pub(super) const VEHICLES_JSON: &str = r#"{
  "vehicles": [
    {"vehicleId": "VEH002", "capacity": 50, "currentLatitude": 12.9352,
     "currentLongitude": 77.6245, "currentAddress": "Koramangala, Bangalore"},
    {"vehicleId": "VEH001", "capacity": 100, "currentLatitude": 12.9716,
     "currentLongitude": 77.6413, "currentAddress": "Indiranagar, Bangalore"}
  ]
}"#;

/// An order missing its identifier and carrying a negative weight.
pub(super) const INVALID_ORDERS_JSON: &str = r#"{
  "orders": [
    {"latitude": 12.9756, "longitude": 77.6050, "address": "MG Road",
     "packageWeight": -1, "priority": "HIGH"}
  ]
}"#;

pub(super) const DUPLICATE_VEHICLES_JSON: &str = r#"{
  "vehicles": [
    {"vehicleId": "VEH001", "capacity": 100, "currentLatitude": 12.9716,
     "currentLongitude": 77.6413, "currentAddress": "Indiranagar"},
    {"vehicleId": " VEH001 ", "capacity": 50, "currentLatitude": 12.9352,
     "currentLongitude": 77.6245, "currentAddress": "Koramangala"}
  ]
}"#;

/// A temporary directory addressed with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn db(&self) -> Utf8PathBuf {
        self.path("dispatch.db")
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn stored_snapshot(db: &Utf8Path) -> Snapshot {
    SqliteDispatchStore::open(db.as_std_path())
        .expect("open store")
        .snapshot()
        .expect("read snapshot")
}

pub(super) fn stored_order_ids(db: &Utf8Path) -> Vec<String> {
    stored_snapshot(db)
        .orders
        .into_iter()
        .map(|order| order.id)
        .collect()
}
