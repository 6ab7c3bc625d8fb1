pub mod control;
pub mod discovery;
pub mod error;
pub mod port;
pub mod session;

pub use control::{Controller, LoopReport, LoopState};
pub use error::{FrameError, MasterError};
pub use session::{DeviceSession, SendOutcome, SessionStats};

use serde::Deserialize;
use std::time::Duration;

/// Serial rate of the master board.
pub const DEFAULT_BAUD: u32 = 57600;

/// How long the master gets to announce its slaves.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Read poll granularity while waiting for status lines.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkConfig {
    /// Serial device of the master. Falls back to the platform default.
    pub serial_dev: Option<String>,

    pub baud: Option<u32>,

    /// Wait for "total devices number: N" before giving up.
    pub discovery_timeout_ms: Option<u64>,

    pub read_timeout_ms: Option<u64>,
}

impl LinkConfig {
    pub fn baud(&self) -> u32 {
        self.baud.unwrap_or(DEFAULT_BAUD)
    }

    pub fn discovery_timeout(&self) -> Duration {
        self.discovery_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DISCOVERY_TIMEOUT)
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_READ_TIMEOUT)
    }

    pub fn serial_dev(&self) -> Result<String, MasterError> {
        match &self.serial_dev {
            Some(dev) if !dev.is_empty() => Ok(dev.clone()),
            _ => port::default_serial_dev()
                .map(str::to_string)
                .ok_or(MasterError::NoSerialDevice),
        }
    }
}
