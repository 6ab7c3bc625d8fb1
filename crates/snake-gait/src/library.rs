//! Predefined gaits loaded from a TOML file.
//!
//! ```toml
//! [[gait]]
//! id = "Forward"
//! freq_robot = [4]
//! amp_robot = [60]
//! phase_o_robot = [0]
//! phase_e_robot = [157]
//!
//! [[gait]]
//! id = "Hold"
//! freq_robot = [0]
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::{GaitError, GaitParameterSet, MAX_JOINTS};

#[derive(Debug, Deserialize)]
struct GaitFile {
    #[serde(default)]
    gait: Vec<GaitEntry>,
}

#[derive(Debug, Deserialize)]
struct GaitEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    freq_robot: Vec<i32>,
    #[serde(default)]
    amp_robot: Vec<i32>,
    #[serde(default)]
    phase_o_robot: Vec<i32>,
    #[serde(default)]
    phase_e_robot: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GaitPattern {
    /// Complete per-joint parameters.
    Full(GaitParameterSet),
    /// Only the frequency changes; amplitude and phases stay as they were.
    Hold { frequency: Vec<i32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaitDefinition {
    pub id: String,
    pub pattern: GaitPattern,
}

impl GaitDefinition {
    /// Parameters to run once this gait replaces `previous`.
    pub fn apply(&self, previous: Option<&GaitParameterSet>) -> GaitParameterSet {
        match &self.pattern {
            GaitPattern::Full(params) => params.clone(),
            GaitPattern::Hold { frequency } => {
                let mut params = previous.cloned().unwrap_or_else(GaitParameterSet::zeroed);
                params.frequency = frequency.clone();
                params
            }
        }
    }

    fn from_entry(entry: GaitEntry) -> Result<Self, GaitError> {
        let GaitEntry { id, freq_robot, amp_robot, phase_o_robot, phase_e_robot } = entry;
        let half = MAX_JOINTS / 2;
        let shape = (freq_robot.len(), amp_robot.len(), phase_o_robot.len(), phase_e_robot.len());

        let pattern = if shape == (1, 1, 1, 1) {
            GaitPattern::Full(GaitParameterSet::uniform(
                freq_robot[0],
                amp_robot[0],
                phase_o_robot[0],
                phase_e_robot[0],
            ))
        } else if shape == (MAX_JOINTS, MAX_JOINTS, half, half) {
            GaitPattern::Full(GaitParameterSet {
                frequency: freq_robot,
                amplitude: amp_robot,
                phase_odd: phase_o_robot,
                phase_even: phase_e_robot,
            })
        } else if shape == (1, 0, 0, 0) {
            GaitPattern::Hold { frequency: vec![freq_robot[0]; MAX_JOINTS] }
        } else {
            return Err(GaitError::InvalidGaitShape {
                id,
                detail: format!(
                    "freq={} amp={} phase_o={} phase_e={} (expected 1/1/1/1, {MAX_JOINTS}/{MAX_JOINTS}/{half}/{half} or 1/0/0/0)",
                    shape.0, shape.1, shape.2, shape.3
                ),
            });
        };
        Ok(Self { id, pattern })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GaitLibrary {
    gaits: Vec<GaitDefinition>,
}

impl GaitLibrary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GaitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GaitError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let lib = Self::from_toml_str(&text)?;
        info!("gait library: {} gaits from {}", lib.len(), path.display());
        Ok(lib)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, GaitError> {
        let file: GaitFile = toml::from_str(text)?;
        if file.gait.is_empty() {
            return Err(GaitError::NoGaits);
        }
        let mut gaits: Vec<GaitDefinition> = Vec::with_capacity(file.gait.len());
        for entry in file.gait {
            if entry.id.is_empty() {
                warn!("gait without an id; it can only be selected by the empty name");
            }
            let gait = GaitDefinition::from_entry(entry)?;
            // later definitions replace earlier ones, keeping the listing order
            match gaits.iter_mut().find(|g| g.id == gait.id) {
                Some(existing) => {
                    warn!("gait {:?} defined more than once; the last definition is used", gait.id);
                    *existing = gait;
                }
                None => gaits.push(gait),
            }
        }
        Ok(Self { gaits })
    }

    pub fn get(&self, id: &str) -> Result<&GaitDefinition, GaitError> {
        self.gaits
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| GaitError::UnknownGait(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.gaits.iter().map(|g| g.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GaitDefinition> {
        self.gaits.iter()
    }

    pub fn len(&self) -> usize {
        self.gaits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaits.is_empty()
    }
}
