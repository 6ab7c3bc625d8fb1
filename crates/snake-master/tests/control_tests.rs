mod common;

use common::{frames, stepping_clock, MockPort};
use snake_gait::{gait_feed, GaitLibrary, GaitParameterSet, GaitSnapshot, GaitSource};
use snake_master::{Controller, MasterError};
use snake_proto::CommandKind;
use std::cell::Cell;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Alive for a fixed number of liveness checks, then gone.
struct Scripted {
    checks_left: Cell<usize>,
    snapshot: Option<Arc<GaitSnapshot>>,
}

impl Scripted {
    fn new(checks: usize, snapshot: Option<GaitSnapshot>) -> Self {
        Self { checks_left: Cell::new(checks), snapshot: snapshot.map(Arc::new) }
    }
}

impl GaitSource for Scripted {
    fn is_alive(&self) -> bool {
        let left = self.checks_left.get();
        if left == 0 {
            return false;
        }
        self.checks_left.set(left - 1);
        true
    }

    fn current(&self) -> Option<Arc<GaitSnapshot>> {
        self.snapshot.clone()
    }
}

fn snapshot(params: GaitParameterSet, speed: f64, kind: CommandKind) -> GaitSnapshot {
    GaitSnapshot { gait_id: "test".into(), params, speed, kind }
}

#[test]
fn test_loop_sends_until_source_ends() {
    let (port, written) = MockPort::new("total devices number: 3\n");
    let source = Scripted::new(4, Some(snapshot(GaitParameterSet::uniform(2, 40, 0, 314), 1.0, CommandKind::Relative)));

    let report = Controller::new(port, source, TIMEOUT).run().unwrap();
    assert_eq!(report.slave_count, 3);
    assert_eq!(report.iterations, 4);
    assert_eq!(report.stats.frames_sent, 4);

    let bytes = written.lock().unwrap().clone();
    let sent = frames(&bytes);
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0], vec![9, 40, 2, 0, 17, 40, 2, 125, 25, 40, 2, 0, 255]);
    assert!(sent.iter().all(|f| *f == sent[0]));
}

#[test]
fn test_loop_applies_speed_clamp() {
    let (port, written) = MockPort::new("total devices number: 3\n");
    let mut params = GaitParameterSet::uniform(0, 20, 0, 0);
    params.frequency[..3].copy_from_slice(&[5, 8, 12]);
    params.amplitude[..3].copy_from_slice(&[20, 30, 40]);
    let source = Scripted::new(1, Some(snapshot(params, 1.5, CommandKind::Relative)));

    Controller::new(port, source, TIMEOUT).run().unwrap();

    let bytes = written.lock().unwrap().clone();
    // frequencies [4, 7, 10], amplitudes boosted by 1.5
    assert_eq!(bytes, vec![9, 30, 4, 0, 17, 45, 7, 0, 25, 60, 10, 0, 255]);
}

#[test]
fn test_clamp_only_considers_active_joints() {
    let (port, written) = MockPort::new("total devices number: 2\n");
    let mut params = GaitParameterSet::uniform(4, 50, 0, 0);
    // outside the two active joints; must not trigger the ceiling
    params.frequency[5] = 40;
    let source = Scripted::new(1, Some(snapshot(params, 2.0, CommandKind::Relative)));

    Controller::new(port, source, TIMEOUT).run().unwrap();
    assert_eq!(*written.lock().unwrap(), vec![9, 50, 8, 0, 17, 50, 8, 0, 255]);
}

#[test]
fn test_no_selection_sends_nothing() {
    let (port, written) = MockPort::new("total devices number: 3\n");
    let report = Controller::new(port, Scripted::new(5, None), TIMEOUT).run().unwrap();
    assert_eq!(report.iterations, 0);
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_idle_loop_waits_between_polls() {
    let (port, _) = MockPort::new("total devices number: 1\n");
    let started = Instant::now();
    Controller::new(port, Scripted::new(4, None), TIMEOUT).run().unwrap();
    // four empty polls, each followed by a nap
    assert!(started.elapsed() >= Duration::from_millis(80), "{:?}", started.elapsed());
}

#[test]
fn test_invalid_parameters_are_dropped_and_loop_continues() {
    let (port, written) = MockPort::new("total devices number: 2\n");
    let params = GaitParameterSet::uniform(2, 300, 0, 0);
    let source = Scripted::new(5, Some(snapshot(params, 1.0, CommandKind::Relative)));

    let report = Controller::new(port, source, TIMEOUT).run().unwrap();
    assert_eq!(report.iterations, 5);
    assert_eq!(report.stats.frames_dropped, 5);
    assert_eq!(report.stats.frames_sent, 0);
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_discovery_timeout_terminates_without_sending() {
    let (port, written) = MockPort::new("");
    let source = Scripted::new(10, Some(snapshot(GaitParameterSet::uniform(2, 40, 0, 0), 1.0, CommandKind::Relative)));

    let err = Controller::new(port, source, TIMEOUT)
        .run_with_clock(stepping_clock(Duration::from_secs(2)))
        .unwrap_err();
    assert!(matches!(err, MasterError::NoSlavesDetectedTimeout(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_write_failure_ends_loop() {
    let port = MockPort::failing_writes("total devices number: 1\n");
    let source = Scripted::new(10, Some(snapshot(GaitParameterSet::uniform(2, 40, 0, 0), 1.0, CommandKind::Relative)));
    let err = Controller::new(port, source, TIMEOUT).run().unwrap_err();
    assert!(matches!(err, MasterError::Io(_)));
}

#[test]
fn test_feed_drives_loop_across_threads() {
    let lib = GaitLibrary::from_toml_str(
        r#"
[[gait]]
id = "Individual Control"
freq_robot = [3]
amp_robot = [90]
phase_o_robot = [0]
phase_e_robot = [0]
"#,
    )
    .unwrap();
    let (mut writer, reader) = gait_feed();
    writer.select(lib.get("Individual Control").unwrap());
    writer.set_kind(CommandKind::Absolute).unwrap();

    let (port, written) = MockPort::new("total devices number: 1\n");
    let worker = std::thread::spawn(move || Controller::new(port, reader, TIMEOUT).run());

    // let a few frames out, then close the feed
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while written.lock().unwrap().len() < 5 * 3 && std::time::Instant::now() < deadline {
        std::thread::yield_now();
    }
    drop(writer);

    let report = worker.join().unwrap().unwrap();
    assert!(report.stats.frames_sent >= 3);
    let bytes = written.lock().unwrap().clone();
    assert_eq!(&bytes[..5], &[8, 90, 3, 0, 255]);
}
