//! Turns raw gait parameters plus the operator speed scalar into the
//! per-joint values that go on the wire.

use tracing::debug;

use crate::{params::phase_slots, GaitError, MAX_FREQUENCY};

/// Frequencies and amplitudes ready for per-joint assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedResolution {
    pub frequency: Vec<i32>,
    pub amplitude: Vec<i32>,
    /// Scalar actually applied to the frequencies when the ceiling bound.
    pub corrected_speed: Option<f64>,
}

fn scale(values: &[i32], speed: f64) -> Vec<i32> {
    values.iter().map(|v| (f64::from(*v) * speed).round() as i32).collect()
}

/// Applies `speed` to every joint frequency without exceeding
/// [`MAX_FREQUENCY`].
///
/// When the fastest scaled joint would pass the ceiling, all frequencies are
/// rescaled so the joint with the highest raw frequency lands exactly on it,
/// keeping the ratio between joints. Amplitude is then boosted by the
/// requested `speed` to make up for the lost frequency. Otherwise amplitude
/// passes through untouched.
pub fn resolve_speed(frequency: &[i32], amplitude: &[i32], speed: f64) -> SpeedResolution {
    let scaled = scale(frequency, speed);
    let over = scaled.iter().any(|f| *f > MAX_FREQUENCY);

    // Keyed on the raw value: two joints may round to the same scaled peak,
    // and rescaling by the slower one would push the faster past the ceiling.
    // First maximum wins among equal raw values.
    let peak = frequency
        .iter()
        .enumerate()
        .fold(None::<(usize, i32)>, |best, (i, f)| match best {
            Some((_, b)) if *f <= b => best,
            _ => Some((i, *f)),
        });

    match peak {
        Some((idx, raw_max)) if over && raw_max > 0 => {
            let corrected = f64::from(MAX_FREQUENCY) / f64::from(raw_max);
            debug!(speed, corrected, joint = idx + 1, "frequency ceiling reached");
            SpeedResolution {
                frequency: scale(frequency, corrected),
                amplitude: scale(amplitude, speed),
                corrected_speed: Some(corrected),
            }
        }
        _ => SpeedResolution {
            frequency: scaled,
            amplitude: amplitude.to_vec(),
            corrected_speed: None,
        },
    }
}

/// Interleaves per-parity phases back into joint order:
/// `[odd[0], even[0], odd[1], even[1], ...]`.
///
/// `odd` may carry one extra value for a trailing unmatched joint.
pub fn merge_phases(odd: &[i32], even: &[i32]) -> Result<Vec<i32>, GaitError> {
    if odd.len() != even.len() && odd.len() != even.len() + 1 {
        return Err(GaitError::PhaseListSizeMismatch { odd: odd.len(), even: even.len() });
    }
    let mut merged = Vec::with_capacity(odd.len() + even.len());
    for (i, p) in odd.iter().enumerate() {
        merged.push(*p);
        if let Some(e) = even.get(i) {
            merged.push(*e);
        }
    }
    Ok(merged)
}

/// Sizes full-length phase lists down to `joints` active joints and merges
/// them.
pub fn resolve_phases(phase_odd: &[i32], phase_even: &[i32], joints: usize) -> Result<Vec<i32>, GaitError> {
    let (n_odd, n_even) = phase_slots(joints);
    let odd = phase_odd.get(..n_odd).ok_or(GaitError::ParameterListTooShort {
        field: "phase_odd",
        needed: joints,
        got: phase_odd.len() + phase_even.len(),
    })?;
    let even = phase_even.get(..n_even).ok_or(GaitError::ParameterListTooShort {
        field: "phase_even",
        needed: joints,
        got: phase_odd.len() + phase_even.len(),
    })?;
    merge_phases(odd, even)
}
