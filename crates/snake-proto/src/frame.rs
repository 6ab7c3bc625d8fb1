use crate::{
    command::parse_legacy_command, EncodeError, JointCommand, BYTES_PER_JOINT, FIELD_LIMIT,
    FRAME_TERMINATOR, MAX_JOINT_ID, PHASE_DIVISOR, PHASE_MAX,
};

impl JointCommand {
    /// Range checks the command and packs it into its four wire bytes.
    pub fn pack(&self) -> Result<[u8; BYTES_PER_JOINT], EncodeError> {
        let joint = self.joint_id;
        if !(1..=MAX_JOINT_ID).contains(&joint) {
            return Err(EncodeError::InvalidJointId { id: joint });
        }
        if !(0..FIELD_LIMIT).contains(&self.amplitude) {
            return Err(EncodeError::AmplitudeOutOfRange { joint, value: self.amplitude });
        }
        if !(0..FIELD_LIMIT).contains(&self.frequency) {
            return Err(EncodeError::FrequencyOutOfRange { joint, value: self.frequency });
        }
        // The bound is 200π rather than 255 * divisor; the firmware was
        // calibrated against this check, keep both as they are.
        if self.phase < 0 || f64::from(self.phase) > PHASE_MAX {
            return Err(EncodeError::PhaseOutOfRange { joint, value: self.phase });
        }

        let first = ((joint as u8) << 3) | self.kind.type_code();
        let phase = (f64::from(self.phase) / PHASE_DIVISOR).round() as u8;
        Ok([first, self.amplitude as u8, self.frequency as u8, phase])
    }
}

/// Packs every command and appends the terminator.
///
/// All or nothing: the first invalid command fails the whole frame.
pub fn encode_frame(commands: &[JointCommand]) -> Result<Vec<u8>, EncodeError> {
    let mut frame = Vec::with_capacity(crate::frame_len(commands.len()));
    for cmd in commands {
        frame.extend_from_slice(&cmd.pack()?);
    }
    frame.push(FRAME_TERMINATOR);
    Ok(frame)
}

/// Converts a text command (`id:K:amp:freq:phase&...`) straight to a frame.
pub fn encode_legacy_command(text: &str) -> Result<Vec<u8>, EncodeError> {
    encode_frame(&parse_legacy_command(text)?)
}
