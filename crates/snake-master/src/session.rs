use snake_gait::{resolve_phases, GaitError, MAX_JOINTS};
use snake_proto::{encode_frame, CommandKind, JointCommand};
use std::io::{BufReader, Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::{discovery::wait_for_slaves, FrameError, MasterError};

/// Minimum gap between two drop warnings; drops in between log at debug.
const DROP_WARN_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_sent: u64,
    pub frames_dropped: u64,
    pub bytes_written: u64,
    pub last_drop: Option<String>,
}

#[derive(Debug)]
pub enum SendOutcome {
    Sent { bytes: usize },
    /// Nothing was written; the next iteration tries again.
    Dropped(FrameError),
}

#[derive(Debug)]
struct WarnLimit {
    last: Option<Instant>,
    min_interval: Duration,
}

impl WarnLimit {
    fn new(min_interval: Duration) -> Self {
        Self { last: None, min_interval }
    }

    fn allow(&mut self) -> bool {
        let now = Instant::now();
        if let Some(t) = self.last {
            if now.duration_since(t) < self.min_interval { return false; }
        }
        self.last = Some(now);
        true
    }
}

/// Exclusive owner of the byte stream to the master board.
///
/// A session only exists once discovery has succeeded, so the slave count
/// is always known and never changes.
pub struct DeviceSession<T> {
    conn: BufReader<T>,
    slave_count: usize,
    stats: SessionStats,
    drop_warn: WarnLimit,
}

impl<T: Read + Write> DeviceSession<T> {
    /// Waits for the master's slave count announcement on `conn`.
    pub fn discover(conn: T, timeout: Duration) -> Result<Self, MasterError> {
        Self::discover_with_clock(conn, timeout, Instant::now)
    }

    pub fn discover_with_clock(
        conn: T,
        timeout: Duration,
        now: impl FnMut() -> Instant,
    ) -> Result<Self, MasterError> {
        let mut conn = BufReader::new(conn);
        info!("discovery: waiting up to {:?} for the master", timeout);
        let slave_count = wait_for_slaves(&mut conn, timeout, now)?;
        if slave_count > MAX_JOINTS {
            warn!(
                "discovery: {} slaves but gaits cover {}; frames will be dropped",
                slave_count, MAX_JOINTS
            );
        }
        Ok(Self {
            conn,
            slave_count,
            stats: SessionStats::default(),
            drop_warn: WarnLimit::new(DROP_WARN_INTERVAL),
        })
    }

    pub fn slave_count(&self) -> usize {
        self.slave_count
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Builds the frame addressing joints `1..=slave_count` with one kind.
    ///
    /// Parameter lists may be longer than the slave count; extra slots are
    /// ignored. Phases come split by parity and are merged here.
    pub fn build_frame(
        &self,
        kind: CommandKind,
        amplitudes: &[i32],
        frequencies: &[i32],
        phase_odd: &[i32],
        phase_even: &[i32],
    ) -> Result<Vec<u8>, FrameError> {
        let n = self.slave_count;
        let amplitudes = active(amplitudes, n, "amplitude")?;
        let frequencies = active(frequencies, n, "frequency")?;
        let phases = resolve_phases(phase_odd, phase_even, n)?;

        let commands: Vec<JointCommand> = (0..n)
            .map(|i| JointCommand::new(i as i32 + 1, kind, amplitudes[i], frequencies[i], phases[i]))
            .collect();
        Ok(encode_frame(&commands)?)
    }

    /// Sends one command per active joint.
    ///
    /// A frame that fails validation is dropped and counted; only a failing
    /// write is returned as an error.
    pub fn send_individual(
        &mut self,
        kind: CommandKind,
        amplitudes: &[i32],
        frequencies: &[i32],
        phase_odd: &[i32],
        phase_even: &[i32],
    ) -> Result<SendOutcome, MasterError> {
        let frame = match self.build_frame(kind, amplitudes, frequencies, phase_odd, phase_even) {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.frames_dropped += 1;
                self.stats.last_drop = Some(e.to_string());
                if self.drop_warn.allow() {
                    warn!("frame dropped ({} so far): {}", self.stats.frames_dropped, e);
                } else {
                    debug!("frame dropped: {}", e);
                }
                return Ok(SendOutcome::Dropped(e));
            }
        };

        let out = self.conn.get_mut();
        out.write_all(&frame)?;
        out.flush()?;

        self.stats.frames_sent += 1;
        self.stats.bytes_written += frame.len() as u64;
        Ok(SendOutcome::Sent { bytes: frame.len() })
    }

    pub fn into_inner(self) -> T {
        self.conn.into_inner()
    }
}

fn active<'a>(values: &'a [i32], n: usize, field: &'static str) -> Result<&'a [i32], GaitError> {
    values.get(..n).ok_or(GaitError::ParameterListTooShort {
        field,
        needed: n,
        got: values.len(),
    })
}
