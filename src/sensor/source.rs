//! Byte sources and the serial transport.

use crate::error::{Result, SensorError};
use crate::sensor::SensorConfig;
use serialport::{SerialPort, SerialPortType};
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info};

/// Anything frames can be read from.
///
/// A read of zero bytes means end of stream. `TimedOut` and `Interrupted`
/// errors mean "nothing yet" and are retried by the reader.
pub trait ByteSource: Send {
    fn read_bytes(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

impl<R: Read + Send + ?Sized> ByteSource for R {
    fn read_bytes(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read(buf)
    }
}

/// A discovered serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub kind: String,
}

/// Enumerate serial ports on this machine.
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;
    if ports.is_empty() {
        return Err(SensorError::NoPortsFound);
    }

    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            name: port.port_name,
            kind: describe_port_type(&port.port_type),
        })
        .collect())
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => match &usb.product {
            Some(product) => format!("USB {:04x}:{:04x} {}", usb.vid, usb.pid, product),
            None => format!("USB {:04x}:{:04x}", usb.vid, usb.pid),
        },
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}

/// Open the configured serial device (8N1 at the configured baud rate).
pub fn open_port(config: &SensorConfig) -> Result<Box<dyn SerialPort>> {
    if config.device.is_empty() {
        return Err(SensorError::config_error("No serial device given"));
    }

    debug!(
        "Opening {} at {} baud (read timeout {}ms)",
        config.device, config.baud_rate, config.read_timeout_ms
    );

    let port = serialport::new(&config.device, config.baud_rate)
        .timeout(Duration::from_millis(config.read_timeout_ms))
        .open()
        .map_err(|e| SensorError::config_error(format!("Failed to open {}: {}", config.device, e)))?;

    info!("Opened serial port {}", config.device);
    Ok(port)
}
