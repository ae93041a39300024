//! Flick Animation Sequencer
//!
//! Drives multiple independently-animatable scalar tracks through an ordered
//! (or partially overlapping) sequence of phases, triggered by a single
//! forward/reverse signal.
//!
//! # Features
//!
//! - **Tracks**: scalar values with declared endpoints, duration, and easing
//! - **Ordering policies**: parallel, sequential-with-gap, overlap-by-lead
//! - **Distinct reverse ordering**: closing can sequence differently than opening
//! - **Continuity**: retriggering mid-flight restarts from the live value
//! - **Direct manipulation**: immediate write-through while a pointer drags
//! - **Settlement**: the sequence settles only when every track reaches its target
//!
//! The sequencer is pure transition logic: the host's frame scheduler calls
//! [`Sequencer::tick`] with elapsed milliseconds; no clocks are read here.
//!
//! # Example
//!
//! ```
//! use flick_animation::{OrderingPolicy, Sequencer, Signal, Track, TriggerOptions};
//!
//! let mut builder = Sequencer::builder();
//! let x = builder.track(Track::new(0.0, 100.0, 200));
//! let scale = builder.track(Track::new(0.0, 1.0, 100));
//! let mut seq = builder
//!     .ordering(OrderingPolicy::sequential(vec![scale, x], 0))
//!     .build()
//!     .unwrap();
//!
//! seq.trigger(Signal::Forward, TriggerOptions::default());
//! while seq.tick(16.0) {}
//! assert_eq!(seq.value(x), Some(100.0));
//! ```

pub mod easing;
pub mod sequencer;
pub mod track;

pub use easing::Easing;
pub use sequencer::{
    ConfigError, OrderingPolicy, Sequencer, SequencerBuilder, Signal, TriggerOptions,
};
pub use track::{Track, TrackId};
