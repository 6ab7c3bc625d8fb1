//! In-memory stand-in for the master's serial port.

#![allow(dead_code)]

use std::cell::Cell;
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Replays scripted status text and records everything written to it.
pub struct MockPort {
    input: Cursor<Vec<u8>>,
    written: Arc<Mutex<Vec<u8>>>,
    fail_writes: bool,
}

impl MockPort {
    pub fn new(status_text: &str) -> (Self, Arc<Mutex<Vec<u8>>>) {
        Self::from_bytes(status_text.as_bytes())
    }

    /// Same as [`MockPort::new`] for input that is not valid text.
    pub fn from_bytes(raw: &[u8]) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let port = Self {
            input: Cursor::new(raw.to_vec()),
            written: written.clone(),
            fail_writes: false,
        };
        (port, written)
    }

    /// A port whose cable was pulled after the handshake.
    pub fn failing_writes(status_text: &str) -> Self {
        let (mut port, _) = Self::new(status_text);
        port.fail_writes = true;
        port
    }
}

impl Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Clock that advances by `step` every time it is read.
pub fn stepping_clock(step: Duration) -> impl FnMut() -> Instant {
    let t = Cell::new(Instant::now());
    move || {
        let now = t.get();
        t.set(now + step);
        now
    }
}

/// Splits a byte stream into terminated frames.
pub fn frames(bytes: &[u8]) -> Vec<Vec<u8>> {
    bytes
        .split_inclusive(|b| *b == 0xFF)
        .map(|f| f.to_vec())
        .collect()
}
