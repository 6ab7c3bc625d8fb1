//! Wire protocol spoken to the snake robot master board.
//!
//! Every joint command is packed into four bytes:
//!
//! ```text
//! [ (joint_id << 3) | type_code, amplitude, frequency, round(phase / 2.512) ]
//! ```
//!
//! and a frame is any number of packed commands followed by a single
//! `0xFF` terminator. Nothing before the terminator can equal `0xFF`
//! because every field is range checked below it.

pub mod command;
pub mod error;
pub mod frame;

pub use command::{parse_legacy_command, CommandKind, JointCommand};
pub use error::EncodeError;
pub use frame::{encode_frame, encode_legacy_command};

/// Bytes emitted per joint command.
pub const BYTES_PER_JOINT: usize = 4;

/// Final byte of every frame.
pub const FRAME_TERMINATOR: u8 = 0xFF;

/// Highest joint id addressable in the 5 high bits of the first byte.
pub const MAX_JOINT_ID: i32 = 30;

/// Exclusive upper bound for amplitude and frequency bytes.
pub const FIELD_LIMIT: i32 = 255;

/// Inclusive upper bound of the phase input, `2π · 100`.
pub const PHASE_MAX: f64 = 2.0 * std::f64::consts::PI * 100.0;

/// Firmware angular resolution used to squeeze the phase into one byte.
pub const PHASE_DIVISOR: f64 = 2.512;

/// Length of a frame carrying `joints` commands.
pub const fn frame_len(joints: usize) -> usize {
    joints * BYTES_PER_JOINT + 1
}
