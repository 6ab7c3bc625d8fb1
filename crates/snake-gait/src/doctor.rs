use anyhow::Result;
use snake_proto::{FIELD_LIMIT, PHASE_MAX};

use crate::{library::GaitPattern, GaitLibrary, MAX_SPEED, MIN_SPEED};

pub fn check_speed(speed: f64) -> Result<()> {
    anyhow::ensure!(
        speed.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&speed),
        "gaits.speed should be {}..={}", MIN_SPEED, MAX_SPEED
    );
    Ok(())
}

/// Lists gait values the wire format cannot carry.
///
/// Frames built from them are dropped at run time, so these are warnings
/// rather than errors.
pub fn check_library(lib: &GaitLibrary) -> Vec<String> {
    let mut warnings = Vec::new();
    let byte = |v: &i32| (0..FIELD_LIMIT).contains(v);
    let phase = |v: &i32| *v >= 0 && f64::from(*v) <= PHASE_MAX;

    for gait in lib.iter() {
        let (freq, rest) = match &gait.pattern {
            GaitPattern::Full(p) => (&p.frequency, Some(p)),
            GaitPattern::Hold { frequency } => (frequency, None),
        };
        if !freq.iter().all(byte) {
            warnings.push(format!("gait {:?}: frequency outside 0..255", gait.id));
        }
        if let Some(p) = rest {
            if !p.amplitude.iter().all(byte) {
                warnings.push(format!("gait {:?}: amplitude outside 0..255", gait.id));
            }
            if !p.phase_odd.iter().chain(&p.phase_even).all(phase) {
                warnings.push(format!("gait {:?}: phase outside 0..=628", gait.id));
            }
        }
    }
    warnings
}
