use snake_gait::GaitError;
use snake_proto::EncodeError;
use std::time::Duration;
use thiserror::Error;

/// Failures that end the session. None of them has a degraded mode.
#[derive(Debug, Error)]
pub enum MasterError {
    #[error("could not find slaves: no \"total devices number\" line within {0:?}")]
    NoSlavesDetectedTimeout(Duration),

    #[error("master reported 0 slaves")]
    ZeroSlavesDetected,

    #[error("no default serial device for this platform; set link.serial_dev")]
    NoSerialDevice,

    #[error("open serial device {dev}: {source}")]
    Open {
        dev: String,
        #[source]
        source: tokio_serial::Error,
    },

    #[error("list serial ports: {0}")]
    Enumerate(#[source] tokio_serial::Error),

    #[error("serial I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single frame was dropped instead of sent.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Gait(#[from] GaitError),
}
