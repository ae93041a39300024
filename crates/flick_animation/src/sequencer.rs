//! Chained animation sequencer
//!
//! A sequencer owns a set of tracks and drives them between their declared
//! endpoints in response to a forward/reverse trigger signal. The ordering
//! policy decides each track's start offset within the sequence; a distinct
//! policy may be supplied for the reverse direction so that closing can
//! sequence differently than opening.
//!
//! All timing is tick-driven: the host frame scheduler calls [`Sequencer::tick`]
//! with elapsed milliseconds. Triggering mid-flight captures every track's live
//! value as the new run start, so a retrigger never produces a visual jump.

use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use crate::track::{Track, TrackId, TrackState};

/// Errors surfaced by [`SequencerBuilder::build`].
///
/// All configuration problems fail fast at build time; trigger and tick never
/// report configuration errors.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("track {index} has zero duration")]
    ZeroDuration { index: usize },

    #[error("track {index} has a non-finite endpoint ({from}..{to})")]
    NonFiniteEndpoint { index: usize, from: f32, to: f32 },

    #[error("ordering references a track not declared on this sequencer")]
    UnknownTrack,

    #[error("ordering references the same track twice")]
    DuplicateTrack,

    #[error("lead fraction must be within 0.0..=1.0, got {0}")]
    InvalidLeadFraction(f32),
}

/// The external signal a sequencer is driven by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Animate every track toward its declared `to` endpoint.
    Forward,
    /// Animate every track back toward its declared `from` endpoint.
    Reverse,
}

/// How tracks are offset relative to the start of the sequence.
///
/// Tracks not named in an ordering start at offset 0.
#[derive(Clone, Debug, Default)]
pub enum OrderingPolicy {
    /// All tracks start together.
    #[default]
    Parallel,
    /// Track *i* starts after all earlier tracks in `order` have finished,
    /// plus `i * gap_ms`.
    Sequential {
        order: Vec<TrackId>,
        gap_ms: u32,
    },
    /// Track *i* starts `lead_fraction * duration(order[i-1])` after the
    /// previous track started, allowing partial overlap.
    Overlap {
        order: Vec<TrackId>,
        lead_fraction: f32,
    },
}

impl OrderingPolicy {
    pub fn sequential(order: Vec<TrackId>, gap_ms: u32) -> Self {
        OrderingPolicy::Sequential { order, gap_ms }
    }

    pub fn overlap(order: Vec<TrackId>, lead_fraction: f32) -> Self {
        OrderingPolicy::Overlap {
            order,
            lead_fraction,
        }
    }

    fn order(&self) -> &[TrackId] {
        match self {
            OrderingPolicy::Parallel => &[],
            OrderingPolicy::Sequential { order, .. } => order,
            OrderingPolicy::Overlap { order, .. } => order,
        }
    }
}

/// Options for [`Sequencer::trigger`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TriggerOptions {
    /// Jump every track to its target with zero duration. Used while a
    /// pointer is actively dragging, where easing is not wanted.
    pub immediate: bool,
}

impl TriggerOptions {
    pub fn immediate() -> Self {
        Self { immediate: true }
    }
}

/// Builder for [`Sequencer`]. Declare tracks, pick orderings, then `build()`.
pub struct SequencerBuilder {
    tracks: SlotMap<TrackId, TrackState>,
    declared: SmallVec<[TrackId; 4]>,
    forward: OrderingPolicy,
    reverse: Option<OrderingPolicy>,
}

impl SequencerBuilder {
    fn new() -> Self {
        Self {
            tracks: SlotMap::with_key(),
            declared: SmallVec::new(),
            forward: OrderingPolicy::default(),
            reverse: None,
        }
    }

    /// Declare a track and get its handle back.
    pub fn track(&mut self, track: Track) -> TrackId {
        let id = self.tracks.insert(TrackState::new(track));
        self.declared.push(id);
        id
    }

    /// Ordering used for forward triggers (and reverse, unless
    /// [`reverse_ordering`](Self::reverse_ordering) is set).
    pub fn ordering(mut self, policy: OrderingPolicy) -> Self {
        self.forward = policy;
        self
    }

    /// Distinct ordering for reverse triggers.
    pub fn reverse_ordering(mut self, policy: OrderingPolicy) -> Self {
        self.reverse = Some(policy);
        self
    }

    /// Validate the configuration and produce a sequencer.
    pub fn build(self) -> Result<Sequencer, ConfigError> {
        for (index, id) in self.declared.iter().enumerate() {
            let decl = self.tracks[*id].decl;
            if decl.duration_ms == 0 {
                return Err(ConfigError::ZeroDuration { index });
            }
            if !decl.from.is_finite() || !decl.to.is_finite() {
                return Err(ConfigError::NonFiniteEndpoint {
                    index,
                    from: decl.from,
                    to: decl.to,
                });
            }
        }

        self.validate_policy(&self.forward)?;
        if let Some(reverse) = &self.reverse {
            self.validate_policy(reverse)?;
        }

        Ok(Sequencer {
            tracks: self.tracks,
            declared: self.declared,
            forward: self.forward,
            reverse: self.reverse,
            signal: None,
            elapsed_ms: 0.0,
            settled: true,
        })
    }

    fn validate_policy(&self, policy: &OrderingPolicy) -> Result<(), ConfigError> {
        if let OrderingPolicy::Overlap { lead_fraction, .. } = policy {
            if !lead_fraction.is_finite() || !(0.0..=1.0).contains(lead_fraction) {
                return Err(ConfigError::InvalidLeadFraction(*lead_fraction));
            }
        }
        let mut seen: SmallVec<[TrackId; 4]> = SmallVec::new();
        for id in policy.order() {
            if !self.tracks.contains_key(*id) {
                return Err(ConfigError::UnknownTrack);
            }
            if seen.contains(id) {
                return Err(ConfigError::DuplicateTrack);
            }
            seen.push(*id);
        }
        Ok(())
    }
}

/// The chained animation sequencer.
///
/// Created through [`Sequencer::builder`]. Starts settled at every track's
/// `from` endpoint until the first trigger.
#[derive(Clone)]
pub struct Sequencer {
    tracks: SlotMap<TrackId, TrackState>,
    declared: SmallVec<[TrackId; 4]>,
    forward: OrderingPolicy,
    reverse: Option<OrderingPolicy>,
    signal: Option<Signal>,
    elapsed_ms: f32,
    settled: bool,
}

impl Sequencer {
    pub fn builder() -> SequencerBuilder {
        SequencerBuilder::new()
    }

    /// Drive the sequence toward the given signal's endpoints.
    ///
    /// A duplicate trigger with an unchanged signal (and no interleaving
    /// write-through) is a no-op: in-flight animations are not restarted.
    /// Otherwise every track's run start is captured from its live value,
    /// offsets are recomputed from the direction's ordering policy, and the
    /// sequence clock restarts. With `immediate`, tracks jump straight to
    /// their targets.
    pub fn trigger(&mut self, signal: Signal, options: TriggerOptions) {
        if self.signal == Some(signal)
            && self
                .tracks
                .values()
                .all(|t| t.run_to == t.decl.endpoint(signal))
        {
            trace!(?signal, "duplicate trigger ignored");
            return;
        }

        self.signal = Some(signal);
        self.elapsed_ms = 0.0;
        let offsets = self.offsets_for(signal);

        for (id, t) in self.tracks.iter_mut() {
            let target = t.decl.endpoint(signal);
            t.run_from = t.value;
            t.run_to = target;
            t.offset_ms = offsets.get(id).copied().unwrap_or(0.0);
            if options.immediate {
                t.value = target;
                t.run_from = target;
            }
        }

        self.settled = self.tracks.values().all(|t| t.at_target());
        debug!(
            ?signal,
            immediate = options.immediate,
            tracks = self.tracks.len(),
            settled = self.settled,
            "sequence triggered"
        );
    }

    /// Advance the sequence by `dt_ms`. Returns `true` while still animating.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.settled || self.signal.is_none() {
            return false;
        }
        self.elapsed_ms += dt_ms.max(0.0);

        let mut all_done = true;
        for t in self.tracks.values_mut() {
            if t.run_from == t.run_to {
                t.value = t.run_to;
                continue;
            }
            let local_ms = self.elapsed_ms - t.offset_ms;
            if local_ms <= 0.0 {
                t.value = t.run_from;
                all_done = false;
                continue;
            }
            let progress = local_ms / t.decl.duration_ms as f32;
            if progress >= 1.0 {
                t.value = t.run_to;
            } else {
                let eased = t.decl.easing.apply(progress);
                t.value = t.run_from + (t.run_to - t.run_from) * eased;
                all_done = false;
            }
        }

        if all_done {
            self.settled = true;
            debug!(elapsed_ms = self.elapsed_ms, "sequence settled");
        }
        !self.settled
    }

    /// Immediately write a value into one track, bypassing easing.
    ///
    /// Used for direct manipulation: the track's run target becomes the
    /// written value, so a following trigger captures it as the continuity
    /// starting point. Writes to unknown tracks are ignored.
    pub fn write_through(&mut self, id: TrackId, value: f32) {
        let Some(t) = self.tracks.get_mut(id) else {
            trace!("write_through for unknown track ignored");
            return;
        };
        t.value = value;
        t.run_from = value;
        t.run_to = value;
        self.settled = self.tracks.values().all(|t| t.at_target());
    }

    /// Current interpolated value of a track.
    pub fn value(&self, id: TrackId) -> Option<f32> {
        self.tracks.get(id).map(|t| t.value)
    }

    /// The target the track is currently running toward.
    pub fn target(&self, id: TrackId) -> Option<f32> {
        self.tracks.get(id).map(|t| t.run_to)
    }

    /// Start offset of the track's current run, in milliseconds.
    pub fn start_offset(&self, id: TrackId) -> Option<f32> {
        self.tracks.get(id).map(|t| t.offset_ms)
    }

    /// Live values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (TrackId, f32)> + '_ {
        self.declared.iter().map(|id| (*id, self.tracks[*id].value))
    }

    /// True once every track has reached its run target.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// The last signal this sequencer was triggered with.
    pub fn signal(&self) -> Option<Signal> {
        self.signal
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn offsets_for(&self, signal: Signal) -> SecondaryMap<TrackId, f32> {
        let policy = match signal {
            Signal::Forward => &self.forward,
            Signal::Reverse => self.reverse.as_ref().unwrap_or(&self.forward),
        };

        let mut offsets = SecondaryMap::new();
        match policy {
            OrderingPolicy::Parallel => {}
            OrderingPolicy::Sequential { order, gap_ms } => {
                let mut earlier_ms = 0.0;
                for (i, id) in order.iter().enumerate() {
                    offsets.insert(*id, earlier_ms + i as f32 * *gap_ms as f32);
                    earlier_ms += self.tracks[*id].decl.duration_ms as f32;
                }
            }
            OrderingPolicy::Overlap {
                order,
                lead_fraction,
            } => {
                let mut start_ms = 0.0;
                for (i, id) in order.iter().enumerate() {
                    if i > 0 {
                        let prev = order[i - 1];
                        start_ms += lead_fraction * self.tracks[prev].decl.duration_ms as f32;
                    }
                    offsets.insert(*id, start_ms);
                }
            }
        }
        offsets
    }
}
