//! Per-gesture classification state machine

use tracing::{debug, trace};

use crate::sample::{DragConfig, DragSample};

/// Outcome of classifying one drag sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Pointer is down: mirror it 1:1 at this offset.
    Tracking(f32),
    /// Dismiss threshold crossed on release. Terminal.
    Commit,
    /// Released without crossing the threshold: animate back. Terminal.
    ResetToRest,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Tracking,
    Finished(GestureOutcome),
}

/// Classifies one gesture, pointer-down to pointer-up.
///
/// While the pointer is down every sample yields [`GestureOutcome::Tracking`]
/// with the raw offset; the element follows the finger exactly, no damping.
/// The release sample is gated on velocity (and optionally direction) to
/// decide between [`GestureOutcome::Commit`] and
/// [`GestureOutcome::ResetToRest`]. Commit deliberately ignores the final
/// offset: a fast short flick commits where a slow long drag does not.
#[derive(Clone, Debug)]
pub struct DragClassifier {
    config: DragConfig,
    phase: Phase,
    /// Sign of the most recent non-zero motion, used when the release sample
    /// itself reports no motion.
    last_direction: f32,
}

impl DragClassifier {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            last_direction: 0.0,
        }
    }

    /// Feed the next sample of this gesture.
    ///
    /// Returns `None` for samples arriving after the terminal outcome; stale
    /// input is expected (gesture timing is racy against rendering) and never
    /// an error.
    pub fn on_sample(&mut self, sample: DragSample) -> Option<GestureOutcome> {
        if let Phase::Finished(outcome) = self.phase {
            trace!(?sample, ?outcome, "stale sample after terminal outcome ignored");
            return None;
        }

        if sample.direction != 0.0 {
            self.last_direction = sample.direction;
        }

        if sample.active {
            self.phase = Phase::Tracking;
            return Some(GestureOutcome::Tracking(sample.delta));
        }

        // Release: the one terminal decision for this gesture.
        let direction = if sample.direction != 0.0 {
            sample.direction
        } else {
            self.last_direction
        };
        let fast_enough = sample.velocity > self.config.threshold_velocity;
        let right_way = self
            .config
            .required_direction
            .map_or(true, |d| d.matches(direction));

        let outcome = if fast_enough && right_way {
            GestureOutcome::Commit
        } else {
            GestureOutcome::ResetToRest
        };
        debug!(
            velocity = sample.velocity,
            threshold = self.config.threshold_velocity,
            direction,
            ?outcome,
            "gesture released"
        );
        self.phase = Phase::Finished(outcome);
        Some(outcome)
    }

    /// Whether the terminal outcome has been produced.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// The terminal outcome, once produced.
    pub fn outcome(&self) -> Option<GestureOutcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}
