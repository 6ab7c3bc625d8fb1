use snake_gait::{doctor, gait_feed, resolve_phases, resolve_speed, GaitLibrary, GaitSource, MAX_JOINTS};
use snake_proto::{encode_frame, CommandKind, JointCommand};

const SHIPPED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/gaits.toml");

#[test]
fn test_shipped_library_loads_clean() {
    let lib = GaitLibrary::load(SHIPPED).unwrap();
    assert!(lib.ids().any(|id| id == "Individual Control"));
    assert!(lib.ids().any(|id| id == "Hold"));
    assert_eq!(doctor::check_library(&lib), Vec::<String>::new());
}

#[test]
fn test_every_shipped_gait_encodes_at_every_speed() {
    let lib = GaitLibrary::load(SHIPPED).unwrap();
    let (mut writer, reader) = gait_feed();

    for gait in lib.iter() {
        writer.select(gait);
        for step in 1..=10 {
            writer.set_speed(f64::from(step) * 0.2).unwrap();
            let snap = reader.current().unwrap();
            let p = &snap.params;

            let r = resolve_speed(&p.frequency, &p.amplitude, snap.speed);
            let phases = resolve_phases(&p.phase_odd, &p.phase_even, MAX_JOINTS).unwrap();
            let cmds: Vec<JointCommand> = (0..MAX_JOINTS)
                .map(|i| JointCommand::new(i as i32 + 1, CommandKind::Relative, r.amplitude[i], r.frequency[i], phases[i]))
                .collect();

            let frame = encode_frame(&cmds)
                .unwrap_or_else(|e| panic!("{} @ {}: {}", gait.id, snap.speed, e));
            assert_eq!(frame.len(), 4 * MAX_JOINTS + 1);
        }
    }
}

#[test]
fn test_missing_file_reports_path() {
    let err = GaitLibrary::load("/nonexistent/gaits.toml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/gaits.toml"));
}
