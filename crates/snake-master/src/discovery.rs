//! Start-up handshake: the master prints status text and eventually
//! `total devices number: N` once it has enumerated its slaves.

use std::io::{BufRead, ErrorKind};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::MasterError;

const DEVICE_COUNT_PREFIX: &str = "total devices number";

/// Pause after a read came back empty, so a stream at EOF does not spin.
pub(crate) const IDLE_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine {
    DeviceCount(usize),
    /// Has the device count prefix but no usable number.
    Malformed,
    Other,
}

pub fn parse_status_line(line: &str) -> StatusLine {
    let line = line.trim();
    if !line.starts_with(DEVICE_COUNT_PREFIX) {
        return StatusLine::Other;
    }
    match line.split(':').nth(1).map(|n| n.trim().parse::<usize>()) {
        Some(Ok(n)) => StatusLine::DeviceCount(n),
        _ => StatusLine::Malformed,
    }
}

/// Reads status lines until the slave count shows up or `timeout` passes.
///
/// `now` is the clock the deadline is measured with. Reads that time out or
/// hit EOF count as idle and only advance the clock. Lines are decoded
/// lossily; boot noise that is not UTF-8 is skipped like any other line.
pub fn wait_for_slaves<R: BufRead>(
    reader: &mut R,
    timeout: Duration,
    mut now: impl FnMut() -> Instant,
) -> Result<usize, MasterError> {
    let start = now();
    let mut buf = Vec::new();

    loop {
        let idle = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => true,
            Ok(_) if buf.ends_with(b"\n") => {
                let line = String::from_utf8_lossy(&buf);
                match parse_status_line(&line) {
                    StatusLine::DeviceCount(0) => return Err(MasterError::ZeroSlavesDetected),
                    StatusLine::DeviceCount(n) => {
                        info!("discovery: {} slaves were found", n);
                        return Ok(n);
                    }
                    StatusLine::Malformed => warn!("discovery: unreadable device count {:?}", line.trim()),
                    StatusLine::Other => debug!("discovery: ignoring {:?}", line.trim()),
                }
                buf.clear();
                false
            }
            // partial line, keep accumulating
            Ok(_) => false,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted) => true,
            Err(e) => return Err(e.into()),
        };

        if now().saturating_duration_since(start) >= timeout {
            return Err(MasterError::NoSlavesDetectedTimeout(timeout));
        }
        if idle {
            std::thread::sleep(IDLE_POLL);
        }
    }
}
