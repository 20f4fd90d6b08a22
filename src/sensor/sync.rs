//! Byte-stream resynchronization onto 20-byte frames.

use crate::sensor::frame::{Frame, FRAME_LEN, HEADER};

/// Where the synchronizer is in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Matching header byte `p` (0..=2)
    SeekHeader(usize),
    /// Header matched, filling byte `p` (3..=19)
    FillBody(usize),
}

/// Assembles frames one byte at a time.
///
/// While fewer than three bytes are held, every byte must equal the next
/// header byte. A mismatch drops back to position 0 and the offending byte
/// is discarded without being compared against `HEADER[0]`, so a stream
/// like `16 16 11 0B ..` does not lock on the second `16`.
#[derive(Debug, Clone)]
pub struct FrameSynchronizer {
    buf: [u8; FRAME_LEN],
    pos: usize,
}

impl FrameSynchronizer {
    pub fn new() -> Self {
        Self {
            buf: [0; FRAME_LEN],
            pos: 0,
        }
    }

    /// Feed one byte; returns a frame when the 20th byte lands.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if self.pos < HEADER.len() && byte != HEADER[self.pos] {
            self.pos = 0;
            return None;
        }

        self.buf[self.pos] = byte;
        self.pos += 1;

        if self.pos == FRAME_LEN {
            self.pos = 0;
            return Some(Frame::new(self.buf));
        }
        None
    }

    /// Feed a chunk, collecting every frame completed along the way.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().filter_map(|b| self.push(*b)).collect()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn state(&self) -> SyncState {
        if self.pos < HEADER.len() {
            SyncState::SeekHeader(self.pos)
        } else {
            SyncState::FillBody(self.pos)
        }
    }

    /// Forget any partially assembled frame.
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
