//! PM1006 frame layout, checksum and field extraction.
//!
//! A frame is 20 bytes: the header `16 11 0B`, then the payload. Three
//! big-endian 16-bit readings live at fixed offsets and the additive 8-bit
//! sum of all 20 bytes is zero for an intact frame.

use crate::error::SensorError;
use crate::metrics::Dimension;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal header that starts every frame.
pub const HEADER: [u8; 3] = [0x16, 0x11, 0x0B];

/// Total frame length in bytes, header and checksum byte included.
pub const FRAME_LEN: usize = 20;

const PM2_5_OFFSET: usize = 5;
const PM1_0_OFFSET: usize = 9;
const PM10_OFFSET: usize = 13;

/// One complete candidate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Wrap raw bytes. The header is not checked here; see `TryFrom<&[u8]>`.
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Sum of all bytes with 8-bit wraparound.
    pub fn checksum(&self) -> u8 {
        self.0.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
    }

    /// A frame is intact when its bytes sum to zero.
    pub fn is_valid(&self) -> bool {
        self.checksum() == 0
    }

    pub fn checksum_status(&self) -> ChecksumStatus {
        match self.checksum() {
            0 => ChecksumStatus::Ok,
            residual => ChecksumStatus::Mismatch(residual),
        }
    }

    /// Extract the three readings. Never fails: the layout is trusted once
    /// 20 bytes have been collected, whatever the checksum says.
    pub fn decode(&self) -> Reading {
        Reading {
            pm2_5: self.field(PM2_5_OFFSET),
            pm1_0: self.field(PM1_0_OFFSET),
            pm10: self.field(PM10_OFFSET),
        }
    }

    fn field(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.0[offset], self.0[offset + 1]])
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = SensorError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; FRAME_LEN] = bytes.try_into().map_err(|_| {
            SensorError::config_error(format!(
                "Frame must be {} bytes, got {}",
                FRAME_LEN,
                bytes.len()
            ))
        })?;
        if bytes[..HEADER.len()] != HEADER {
            return Err(SensorError::config_error(format!(
                "Frame header {:02X?} does not match {:02X?}",
                &bytes[..HEADER.len()],
                HEADER
            )));
        }
        Ok(Self(bytes))
    }
}

impl fmt::UpperHex for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Outcome of the checksum test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
    Ok,
    /// Non-zero residual of the byte sum
    Mismatch(u8),
}

impl ChecksumStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ChecksumStatus::Ok)
    }
}

impl fmt::Display for ChecksumStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumStatus::Ok => f.write_str("Checksum OK"),
            ChecksumStatus::Mismatch(residual) => write!(f, "Checksum ERR: {:X}", residual),
        }
    }
}

/// Decoded particulate concentrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub pm2_5: u16,
    pub pm1_0: u16,
    pub pm10: u16,
}

impl Reading {
    pub fn get(&self, dimension: Dimension) -> u16 {
        match dimension {
            Dimension::Pm1_0 => self.pm1_0,
            Dimension::Pm2_5 => self.pm2_5,
            Dimension::Pm10 => self.pm10,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PM2.5: {}\tPM1.0: {}\tPM10: {}",
            self.pm2_5, self.pm1_0, self.pm10
        )
    }
}
