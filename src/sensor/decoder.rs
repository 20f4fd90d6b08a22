//! Frame validation and gauge publication.

use crate::metrics::MetricsSink;
use crate::sensor::frame::{ChecksumStatus, Frame, Reading};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// What to do with frames that fail the checksum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// When false (the default) damaged frames are still published.
    pub reject_on_checksum_failure: bool,
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub reading: Reading,
    pub checksum: ChecksumStatus,
    /// Whether the reading reached the sink
    pub published: bool,
}

/// Checks frames and pushes their readings into a sink.
pub struct FrameDecoder {
    sink: Arc<dyn MetricsSink>,
    config: DecoderConfig,
}

impl FrameDecoder {
    pub fn new(sink: Arc<dyn MetricsSink>, config: DecoderConfig) -> Self {
        Self { sink, config }
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Validate, log and publish a single frame.
    pub fn process(&self, frame: &Frame) -> DecodeOutcome {
        let checksum = frame.checksum_status();
        if checksum.is_ok() {
            info!("{:X} ({})", frame, checksum);
        } else {
            warn!("{:X} ({})", frame, checksum);
        }

        let reading = frame.decode();
        let published = checksum.is_ok() || !self.config.reject_on_checksum_failure;
        if published {
            self.sink.publish(&reading);
            info!("{}", reading);
        } else {
            warn!("{} (discarded)", reading);
        }

        DecodeOutcome {
            reading,
            checksum,
            published,
        }
    }
}
