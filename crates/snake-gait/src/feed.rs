//! Hand-off of the operator's gait selection to the control loop.
//!
//! The writer publishes whole [`GaitSnapshot`]s; readers always load one
//! complete snapshot, so a gait change can never be observed half applied.

use arc_swap::ArcSwapOption;
use snake_proto::CommandKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::{GaitDefinition, GaitError, GaitParameterSet, INDIVIDUAL_CONTROL, MAX_SPEED, MIN_SPEED};

/// Everything the control loop needs for one transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct GaitSnapshot {
    pub gait_id: String,
    pub params: GaitParameterSet,
    pub speed: f64,
    pub kind: CommandKind,
}

/// Read side of the gait selection, sampled once per control iteration.
pub trait GaitSource {
    /// False once the producer is gone; the control loop stops then.
    fn is_alive(&self) -> bool;

    /// Latest complete selection, `None` until a gait has been chosen.
    fn current(&self) -> Option<Arc<GaitSnapshot>>;
}

#[derive(Debug)]
struct Shared {
    current: ArcSwapOption<GaitSnapshot>,
    alive: AtomicBool,
}

/// Creates a connected writer/reader pair with no gait selected.
pub fn gait_feed() -> (GaitFeedWriter, GaitFeedReader) {
    let shared = Arc::new(Shared {
        current: ArcSwapOption::empty(),
        alive: AtomicBool::new(true),
    });
    let writer = GaitFeedWriter {
        shared: shared.clone(),
        selected: None,
        speed: 1.0,
        kind: CommandKind::Relative,
    };
    (writer, GaitFeedReader { shared })
}

/// The single producer. Dropping it ends the feed.
#[derive(Debug)]
pub struct GaitFeedWriter {
    shared: Arc<Shared>,
    selected: Option<(String, GaitParameterSet)>,
    speed: f64,
    kind: CommandKind,
}

impl GaitFeedWriter {
    pub fn select(&mut self, gait: &GaitDefinition) {
        let previous = self.selected.as_ref().map(|(_, p)| p);
        let params = gait.apply(previous);
        if gait.id != INDIVIDUAL_CONTROL {
            self.kind = CommandKind::Relative;
        }
        info!("gait: {:?} selected ({:?})", gait.id, self.kind);
        self.selected = Some((gait.id.clone(), params));
        self.publish();
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), GaitError> {
        if !speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(GaitError::SpeedOutOfRange(speed));
        }
        self.speed = speed;
        self.publish();
        Ok(())
    }

    /// Absolute mode is only available while [`INDIVIDUAL_CONTROL`] runs.
    pub fn set_kind(&mut self, kind: CommandKind) -> Result<(), GaitError> {
        if kind == CommandKind::Absolute {
            match &self.selected {
                Some((id, _)) if id == INDIVIDUAL_CONTROL => {}
                Some((id, _)) => return Err(GaitError::ModeLocked(id.clone())),
                None => return Err(GaitError::ModeLocked(String::new())),
            }
        }
        self.kind = kind;
        self.publish();
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn selected_gait(&self) -> Option<&str> {
        self.selected.as_ref().map(|(id, _)| id.as_str())
    }

    fn publish(&self) {
        if let Some((gait_id, params)) = &self.selected {
            self.shared.current.store(Some(Arc::new(GaitSnapshot {
                gait_id: gait_id.clone(),
                params: params.clone(),
                speed: self.speed,
                kind: self.kind,
            })));
        }
    }
}

impl Drop for GaitFeedWriter {
    fn drop(&mut self) {
        self.shared.alive.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct GaitFeedReader {
    shared: Arc<Shared>,
}

impl GaitSource for GaitFeedReader {
    fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::Acquire)
    }

    fn current(&self) -> Option<Arc<GaitSnapshot>> {
        self.shared.current.load_full()
    }
}
