//! Prometheus gauge family for the sensor readings.
//!
//! The recorder is built locally and never installed as the global
//! `metrics` recorder, so the sink is an ordinary value that can be handed
//! to the decoder while the scrape endpoint holds the render handle.

use crate::metrics::{Dimension, MetricsSink};
use metrics::{Gauge, Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metric family name.
pub const METRIC_NAME: &str = "sensor";
/// Constant `sensor` label.
pub const SENSOR_LABEL: &str = "PM1006";
/// Constant `type` label.
pub const TYPE_LABEL: &str = "PM";

const DESCRIPTION: &str = "Particulate matter concentration reported by the PM1006 sensor (ug/m3)";

/// Gauge sink whose values are rendered in Prometheus text format.
pub struct PrometheusSink {
    handle: PrometheusHandle,
    gauges: [Gauge; 3],
}

impl PrometheusSink {
    /// Build a recorder and register one gauge per dimension.
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        recorder.describe_gauge(METRIC_NAME.into(), None, DESCRIPTION.into());

        let metadata = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));
        let gauges = Dimension::ALL.map(|dimension| {
            let key = Key::from_parts(
                METRIC_NAME,
                vec![
                    Label::new("sensor", SENSOR_LABEL),
                    Label::new("type", TYPE_LABEL),
                    Label::new("value", dimension.label()),
                ],
            );
            recorder.register_gauge(&key, &metadata)
        });

        Self {
            handle,
            gauges,
        }
    }

    /// Handle used by the scrape path to render current values.
    pub fn handle(&self) -> PrometheusHandle {
        self.handle.clone()
    }

    /// Render the current exposition text.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for PrometheusSink {
    fn set_reading(&self, dimension: Dimension, value: u16) {
        self.gauges[dimension.index()].set(f64::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_labelled_gauges() {
        let sink = PrometheusSink::new();
        sink.set_reading(Dimension::Pm2_5, 300);
        sink.set_reading(Dimension::Pm1_0, 100);
        sink.set_reading(Dimension::Pm10, 50);

        let text = sink.render();
        assert!(text.contains("# TYPE sensor gauge"), "{}", text);
        assert!(text.contains(r#"sensor="PM1006""#));
        assert!(text.contains(r#"type="PM""#));
        assert!(text.contains(r#"value="2.5"} 300"#), "{}", text);
        assert!(text.contains(r#"value="1"} 100"#), "{}", text);
        assert!(text.contains(r#"value="10"} 50"#), "{}", text);
    }

    #[test]
    fn test_handle_observes_updates() {
        let sink = PrometheusSink::new();
        let handle = sink.handle();
        sink.set_reading(Dimension::Pm10, 7);
        sink.set_reading(Dimension::Pm10, 9);
        let text = handle.render();
        assert!(text.contains(r#"value="10"} 9"#), "{}", text);
        assert!(!text.contains(r#"value="10"} 7"#));
    }

    #[test]
    fn test_separate_sinks_do_not_share_state() {
        let first = PrometheusSink::new();
        let second = PrometheusSink::new();
        first.set_reading(Dimension::Pm1_0, 42);
        assert!(!second.render().contains(r#"value="1"} 42"#));
    }
}
