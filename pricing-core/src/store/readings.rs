use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::ElectricityReading;

/// Per-meter storage of electricity readings.
///
/// `get` hands out an immutable snapshot, so callers never observe a
/// collection that is being replaced underneath them.
pub trait ReadingStore: Send + Sync {
    /// Replace the readings recorded for `meter_id`.
    fn put(&self, meter_id: &str, readings: Vec<ElectricityReading>);

    fn get(&self, meter_id: &str) -> Option<Arc<[ElectricityReading]>>;
}

#[derive(Debug, Default)]
pub struct InMemoryReadingStore {
    readings: DashMap<String, Arc<[ElectricityReading]>>,
}

impl InMemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meters with recorded readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl ReadingStore for InMemoryReadingStore {
    fn put(&self, meter_id: &str, readings: Vec<ElectricityReading>) {
        tracing::debug!(meter_id, count = readings.len(), "storing readings");
        self.readings.insert(meter_id.to_string(), readings.into());
    }

    fn get(&self, meter_id: &str) -> Option<Arc<[ElectricityReading]>> {
        self.readings.get(meter_id).map(|entry| Arc::clone(entry.value()))
    }
}
