//! Track declarations and per-run state

use slotmap::new_key_type;

use crate::easing::Easing;
use crate::sequencer::Signal;

new_key_type! {
    /// Handle to a track declared on a sequencer builder.
    ///
    /// Only valid for the sequencer it was declared on; ordering policies
    /// referencing a foreign or stale id fail validation at build time.
    pub struct TrackId;
}

/// Declaration of one independently animatable scalar value.
///
/// `from`/`to` are the endpoints of the *forward* direction: a forward trigger
/// animates toward `to`, a reverse trigger back toward `from`.
#[derive(Clone, Copy, Debug)]
pub struct Track {
    pub from: f32,
    pub to: f32,
    /// Duration of one full traversal, in milliseconds. Must be positive.
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Track {
    pub fn new(from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// The endpoint a given signal animates toward.
    pub fn endpoint(&self, signal: Signal) -> f32 {
        match signal {
            Signal::Forward => self.to,
            Signal::Reverse => self.from,
        }
    }
}

/// Live state for one track within a running sequence.
///
/// `run_from`/`run_to` are recomputed on every trigger: `run_from` is captured
/// from the live value so an in-flight retrigger never jumps.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TrackState {
    pub(crate) decl: Track,
    pub(crate) value: f32,
    pub(crate) run_from: f32,
    pub(crate) run_to: f32,
    /// Start offset of the current run relative to sequence start, ms.
    pub(crate) offset_ms: f32,
}

impl TrackState {
    pub(crate) fn new(decl: Track) -> Self {
        Self {
            decl,
            value: decl.from,
            run_from: decl.from,
            run_to: decl.from,
            offset_ms: 0.0,
        }
    }

    /// Whether this track has reached its run target.
    pub(crate) fn at_target(&self) -> bool {
        self.value == self.run_to
    }
}
