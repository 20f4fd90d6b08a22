//! PM1006 frame acquisition: synchronization, decoding and the read loop.

pub mod acquisition;
pub mod config;
pub mod decoder;
pub mod frame;
pub mod source;
pub mod sync;

// Re-export commonly used items
pub use acquisition::{run_acquisition, spawn_reader, FrameReader};
pub use config::SensorConfig;
pub use decoder::{DecodeOutcome, DecoderConfig, FrameDecoder};
pub use frame::{ChecksumStatus, Frame, Reading, FRAME_LEN, HEADER};
pub use source::{list_ports, open_port, ByteSource, PortInfo};
pub use sync::{FrameSynchronizer, SyncState};
