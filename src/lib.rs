//! # PM1006 Exporter
//!
//! Reads the byte stream of a PM1006 particulate sensor over a serial link,
//! locks onto its 20-byte frames, decodes PM1.0 / PM2.5 / PM10 readings and
//! serves them as Prometheus gauges.
//!
//! ## Features
//!
//! - **Frame resynchronization**: recovers from mid-frame starts and garbage
//! - **Checksum reporting**: damaged frames are logged, publishing is configurable
//! - **Scrape endpoint**: `/metrics` in the Prometheus text format
//! - **Library + Binary**: embed the decoder with any byte source, or run the exporter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pm1006_exporter::{
//!     open_port, run_acquisition, DecoderConfig, FrameDecoder, PrometheusSink, SensorConfig,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let port = open_port(&SensorConfig::new("/dev/ttyUSB0"))?;
//!     let sink = Arc::new(PrometheusSink::new());
//!     let decoder = FrameDecoder::new(sink.clone(), DecoderConfig::default());
//!     let (_stop, shutdown) = tokio::sync::watch::channel(false);
//!
//!     run_acquisition(std::io::BufReader::new(port), decoder, shutdown).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod metrics;
pub mod sensor;
pub mod web;

// Re-export public API
pub use error::{Result, SensorError};
pub use metrics::{AtomicGauges, Dimension, MetricsSink, PrometheusSink};
pub use sensor::{
    list_ports, open_port, run_acquisition, ByteSource, ChecksumStatus, DecodeOutcome,
    DecoderConfig, Frame, FrameDecoder, FrameReader, FrameSynchronizer, PortInfo, Reading,
    SensorConfig, SyncState,
};
pub use web::{start_web_server, AppState, WebConfig};

/// The PM1006 serial line speed
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// The default serial read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// The default scrape endpoint port
pub const DEFAULT_WEB_PORT: u16 = 33141;
