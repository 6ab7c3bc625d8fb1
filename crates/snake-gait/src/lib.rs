pub mod doctor;
pub mod error;
pub mod feed;
pub mod library;
pub mod params;
pub mod resolver;

pub use error::GaitError;
pub use feed::{gait_feed, GaitFeedReader, GaitFeedWriter, GaitSnapshot, GaitSource};
pub use library::{GaitDefinition, GaitLibrary, GaitPattern};
pub use params::GaitParameterSet;
pub use resolver::{merge_phases, resolve_phases, resolve_speed, SpeedResolution};

/// Joint slots a gait definition carries.
pub const MAX_JOINTS: usize = 20;

/// Highest frequency any joint may be driven at after speed scaling.
pub const MAX_FREQUENCY: i32 = 10;

/// Operator speed scalar range.
pub const MIN_SPEED: f64 = 0.2;
pub const MAX_SPEED: f64 = 2.0;

/// The only gait allowed to drive joints with absolute angles.
pub const INDIVIDUAL_CONTROL: &str = "Individual Control";
