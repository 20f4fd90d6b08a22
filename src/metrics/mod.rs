//! Gauge sinks for decoded particulate readings.
//!
//! The decoder pushes each reading dimension into a [`MetricsSink`]. The
//! Prometheus-backed sink is what the scrape endpoint renders; the atomic
//! sink keeps raw values in-process.

pub mod atomic;
pub mod prometheus;
pub mod traits;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used items
pub use atomic::AtomicGauges;
pub use prometheus::PrometheusSink;
pub use traits::MetricsSink;

/// One measured particulate size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// PM1.0
    Pm1_0,
    /// PM2.5
    Pm2_5,
    /// PM10
    Pm10,
}

impl Dimension {
    /// All dimensions in gauge registration order.
    pub const ALL: [Dimension; 3] = [Dimension::Pm1_0, Dimension::Pm2_5, Dimension::Pm10];

    /// Value of the `value` label for this dimension.
    pub const fn label(&self) -> &'static str {
        match self {
            Dimension::Pm1_0 => "1",
            Dimension::Pm2_5 => "2.5",
            Dimension::Pm10 => "10",
        }
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            Dimension::Pm1_0 => 0,
            Dimension::Pm2_5 => 1,
            Dimension::Pm10 => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PM{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_labels() {
        assert_eq!(Dimension::Pm1_0.label(), "1");
        assert_eq!(Dimension::Pm2_5.label(), "2.5");
        assert_eq!(Dimension::Pm10.label(), "10");
        assert_eq!(Dimension::Pm2_5.to_string(), "PM2.5");
    }

    #[test]
    fn test_dimension_indices_are_distinct() {
        let mut seen = [false; 3];
        for dim in Dimension::ALL {
            assert!(!seen[dim.index()]);
            seen[dim.index()] = true;
        }
    }
}
