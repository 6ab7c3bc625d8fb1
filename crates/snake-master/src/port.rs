use std::time::Duration;
use tokio_serial::{SerialPort, SerialPortType};
use tracing::info;

use crate::MasterError;

/// Where the master's USB serial adapter usually shows up.
pub fn default_serial_dev() -> Option<&'static str> {
    match std::env::consts::OS {
        "windows" => Some("COM3"),
        "macos" => Some("/dev/tty.usbserial-A9007UX1"),
        "linux" => Some("/dev/ttyUSB0"),
        _ => None,
    }
}

/// Opens the master link for blocking reads and writes.
///
/// `read_timeout` bounds every read so discovery can watch its deadline.
pub fn open_serial(dev: &str, baud: u32, read_timeout: Duration) -> Result<Box<dyn SerialPort>, MasterError> {
    let port = tokio_serial::new(dev, baud)
        .timeout(read_timeout)
        .open()
        .map_err(|source| MasterError::Open { dev: dev.to_string(), source })?;
    info!("master link: opened {} @ {}", dev, baud);
    Ok(port)
}

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub name: String,
    pub description: String,
}

pub fn list_ports() -> Result<Vec<PortInfo>, MasterError> {
    let ports = tokio_serial::available_ports().map_err(MasterError::Enumerate)?;
    Ok(ports
        .into_iter()
        .map(|p| PortInfo {
            description: describe(&p.port_type),
            name: p.port_name,
        })
        .collect())
}

fn describe(kind: &SerialPortType) -> String {
    match kind {
        SerialPortType::UsbPort(usb) => format!(
            "usb {:04x}:{:04x} {}",
            usb.vid,
            usb.pid,
            usb.product.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string(),
        SerialPortType::PciPort => "pci".into(),
        SerialPortType::BluetoothPort => "bluetooth".into(),
        SerialPortType::Unknown => "unknown".into(),
    }
}
