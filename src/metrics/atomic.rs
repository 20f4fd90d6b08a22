//! Lock-free in-process gauges.

use crate::metrics::{Dimension, MetricsSink};
use crate::sensor::Reading;
use std::sync::atomic::{AtomicU32, Ordering};

// Values are u16, so anything above u16::MAX marks a slot as never set.
const UNSET: u32 = u32::MAX;

/// Three gauge slots backed by atomics.
#[derive(Debug)]
pub struct AtomicGauges {
    slots: [AtomicU32; 3],
}

impl AtomicGauges {
    /// Create gauges with every slot unset.
    pub fn new() -> Self {
        Self {
            slots: [
                AtomicU32::new(UNSET),
                AtomicU32::new(UNSET),
                AtomicU32::new(UNSET),
            ],
        }
    }

    /// Current value of one dimension, `None` until first set.
    pub fn get(&self, dimension: Dimension) -> Option<u16> {
        match self.slots[dimension.index()].load(Ordering::Relaxed) {
            UNSET => None,
            value => Some(value as u16),
        }
    }

    /// The full reading, once every dimension has been published.
    pub fn reading(&self) -> Option<Reading> {
        Some(Reading {
            pm2_5: self.get(Dimension::Pm2_5)?,
            pm1_0: self.get(Dimension::Pm1_0)?,
            pm10: self.get(Dimension::Pm10)?,
        })
    }
}

impl Default for AtomicGauges {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for AtomicGauges {
    fn set_reading(&self, dimension: Dimension, value: u16) {
        self.slots[dimension.index()].store(u32::from(value), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_gauges() {
        let gauges = AtomicGauges::new();
        assert_eq!(gauges.get(Dimension::Pm10), None);
        assert!(gauges.reading().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let gauges = AtomicGauges::new();
        gauges.set_reading(Dimension::Pm2_5, 12);
        gauges.set_reading(Dimension::Pm2_5, 65535);
        assert_eq!(gauges.get(Dimension::Pm2_5), Some(65535));
        assert_eq!(gauges.get(Dimension::Pm1_0), None);
    }

    #[test]
    fn test_publish_sets_every_dimension() {
        let gauges = AtomicGauges::new();
        let reading = Reading {
            pm2_5: 300,
            pm1_0: 100,
            pm10: 50,
        };
        gauges.publish(&reading);
        assert_eq!(gauges.reading(), Some(reading));
    }
}
