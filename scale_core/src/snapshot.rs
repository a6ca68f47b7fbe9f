//! Latest-value publication between the ingest path and readers.
//!
//! One `SnapshotPublisher` (owned by the session) replaces an `Arc<Snapshot>`
//! under a short write lock; any number of `SnapshotReader` clones load the
//! current `Arc` and never observe a half-updated snapshot.

use crate::decoder::DecodedReading;
use crate::types::Measurement;
use serde::Serialize;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Last successfully decoded sample, stable or not.
    pub latest_reading: Option<DecodedReading>,
    /// Last stable weight (both modes).
    pub stable_weight_kg: Option<f64>,
    /// Last full report (full mode only).
    pub measurement: Option<Arc<Measurement>>,
}

type Slot = Arc<RwLock<Arc<Snapshot>>>;

/// Single writer. Deliberately not `Clone`.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    slot: Slot,
}

/// Read-only handle.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Slot,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn publish_reading(&self, reading: DecodedReading) {
        self.update(|s| s.latest_reading = Some(reading));
    }

    pub fn publish_stable_weight(&self, weight_kg: f64) {
        self.update(|s| s.stable_weight_kg = Some(weight_kg));
    }

    pub fn publish_measurement(&self, m: Arc<Measurement>) {
        self.update(|s| {
            s.stable_weight_kg = Some(m.reading.weight_kg);
            s.measurement = Some(m);
        });
    }

    fn update(&self, f: impl FnOnce(&mut Snapshot)) {
        // A poisoned lock still holds a complete snapshot; keep publishing.
        let mut guard = match self.slot.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = Snapshot::clone(&guard);
        f(&mut next);
        *guard = Arc::new(next);
    }
}

impl SnapshotReader {
    pub fn load(&self) -> Arc<Snapshot> {
        match self.slot.read() {
            Ok(g) => Arc::clone(&g),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_see_published_values() {
        let p = SnapshotPublisher::new();
        let r = p.reader();
        assert!(r.load().latest_reading.is_none());
        let reading = DecodedReading {
            weight_kg: 70.5,
            impedance_ohm: 520.3,
        };
        p.publish_reading(reading);
        p.publish_stable_weight(70.5);
        let snap = r.clone().load();
        assert_eq!(snap.latest_reading, Some(reading));
        assert_eq!(snap.stable_weight_kg, Some(70.5));
        assert!(snap.measurement.is_none());
    }

    #[test]
    fn loaded_snapshot_is_frozen() {
        let p = SnapshotPublisher::new();
        let r = p.reader();
        p.publish_stable_weight(60.0);
        let before = r.load();
        p.publish_stable_weight(61.0);
        assert_eq!(before.stable_weight_kg, Some(60.0));
        assert_eq!(r.load().stable_weight_kg, Some(61.0));
    }
}
