use thiserror::Error;

/// Reasons a joint command cannot be put on the wire.
///
/// Any of these aborts the whole frame; callers never transmit a partial
/// command set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("joint id {id} outside 1..=30")]
    InvalidJointId { id: i32 },

    #[error("joint {joint}: unknown command type {code:?} (expected \"R\" or \"S\")")]
    InvalidCommandType { joint: i32, code: String },

    #[error("joint {joint}: amplitude {value} outside 0..255")]
    AmplitudeOutOfRange { joint: i32, value: i32 },

    #[error("joint {joint}: frequency {value} outside 0..255")]
    FrequencyOutOfRange { joint: i32, value: i32 },

    #[error("joint {joint}: phase {value} outside 0..=628")]
    PhaseOutOfRange { joint: i32, value: i32 },

    /// Legacy text command that does not follow `id:K:amp:freq:phase`.
    #[error("malformed command {segment:?}: expected id:type:amplitude:frequency:phase")]
    MalformedCommand { segment: String },
}
