//! Traits for publishing sensor readings.

use crate::metrics::Dimension;
use crate::sensor::Reading;

/// Destination for decoded readings.
///
/// Implementations hold one gauge slot per [`Dimension`]. Each call
/// overwrites the previous value of that slot; no history is kept.
pub trait MetricsSink: Send + Sync {
    /// Set the gauge for a single dimension.
    fn set_reading(&self, dimension: Dimension, value: u16);

    /// Publish all three dimensions of a reading.
    fn publish(&self, reading: &Reading) {
        for dimension in Dimension::ALL {
            self.set_reading(dimension, reading.get(dimension));
        }
    }
}
