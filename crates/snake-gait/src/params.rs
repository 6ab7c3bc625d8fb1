use crate::MAX_JOINTS;

/// Raw per-joint gait parameters as the operator selected them.
///
/// `frequency` and `amplitude` hold one value per joint slot. Phases are
/// split by slot parity: `phase_odd` covers slots 0, 2, 4, ... (the odd
/// joints counting from one) and `phase_even` covers slots 1, 3, 5, ...
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GaitParameterSet {
    pub frequency: Vec<i32>,
    pub amplitude: Vec<i32>,
    pub phase_odd: Vec<i32>,
    pub phase_even: Vec<i32>,
}

impl GaitParameterSet {
    /// All slots at zero: the robot lies still.
    pub fn zeroed() -> Self {
        Self::uniform(0, 0, 0, 0)
    }

    /// Same parameters on every joint slot.
    pub fn uniform(frequency: i32, amplitude: i32, phase_odd: i32, phase_even: i32) -> Self {
        Self {
            frequency: vec![frequency; MAX_JOINTS],
            amplitude: vec![amplitude; MAX_JOINTS],
            phase_odd: vec![phase_odd; MAX_JOINTS / 2],
            phase_even: vec![phase_even; MAX_JOINTS / 2],
        }
    }

    /// Number of joints the set can drive.
    pub fn slots(&self) -> usize {
        self.frequency.len().min(self.amplitude.len())
    }
}

/// Odd and even phase slot counts needed to cover `joints` joints.
pub fn phase_slots(joints: usize) -> (usize, usize) {
    (joints.div_ceil(2), joints / 2)
}
