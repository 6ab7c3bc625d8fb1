//! The control loop: discover the slaves once, then keep transmitting the
//! current gait for as long as its producer is alive.

use snake_gait::{resolve_speed, GaitSource};
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::{discovery::IDLE_POLL, DeviceSession, MasterError, SessionStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingDiscovery,
    Running,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    pub slave_count: usize,
    /// Iterations that had a gait selected and attempted a send.
    pub iterations: u64,
    pub stats: SessionStats,
}

pub struct Controller<T, S> {
    conn: T,
    source: S,
    discovery_timeout: Duration,
}

impl<T: Read + Write, S: GaitSource> Controller<T, S> {
    pub fn new(conn: T, source: S, discovery_timeout: Duration) -> Self {
        Self { conn, source, discovery_timeout }
    }

    /// Runs until the gait source goes away. Discovery and write failures
    /// end the loop with an error.
    pub fn run(self) -> Result<LoopReport, MasterError> {
        self.run_with_clock(Instant::now)
    }

    pub fn run_with_clock(self, now: impl FnMut() -> Instant) -> Result<LoopReport, MasterError> {
        let Self { conn, source, discovery_timeout } = self;
        let mut state = LoopState::AwaitingDiscovery;

        let mut session = match DeviceSession::discover_with_clock(conn, discovery_timeout, now) {
            Ok(session) => session,
            Err(e) => {
                transition(&mut state, LoopState::Terminated);
                error!("discovery failed: {}", e);
                return Err(e);
            }
        };
        transition(&mut state, LoopState::Running);

        let result = drive(&mut session, &source);
        transition(&mut state, LoopState::Terminated);

        let iterations = result?;
        let stats = session.stats().clone();
        info!(
            "control loop done: {} iterations, {} frames sent, {} dropped, {} bytes",
            iterations, stats.frames_sent, stats.frames_dropped, stats.bytes_written
        );
        Ok(LoopReport { slave_count: session.slave_count(), iterations, stats })
    }
}

fn transition(state: &mut LoopState, next: LoopState) {
    info!("control loop: {:?} -> {:?}", state, next);
    *state = next;
}

/// No pacing while a gait runs: the loop goes as fast as the serial writes
/// drain. Without a selection it naps between polls.
fn drive<T: Read + Write, S: GaitSource>(
    session: &mut DeviceSession<T>,
    source: &S,
) -> Result<u64, MasterError> {
    let n = session.slave_count();
    let mut iterations = 0u64;

    while source.is_alive() {
        let Some(snap) = source.current() else {
            std::thread::sleep(IDLE_POLL);
            continue;
        };
        let p = &snap.params;
        let resolved = resolve_speed(head(&p.frequency, n), head(&p.amplitude, n), snap.speed);
        session.send_individual(
            snap.kind,
            &resolved.amplitude,
            &resolved.frequency,
            &p.phase_odd,
            &p.phase_even,
        )?;
        iterations += 1;
    }
    Ok(iterations)
}

fn head(values: &[i32], n: usize) -> &[i32] {
    &values[..n.min(values.len())]
}
