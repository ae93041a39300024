//! Flick Gesture Classifier
//!
//! Turns a live stream of pointer drag samples into discrete outcomes: mirror
//! the pointer while it is down, then decide exactly once on release whether
//! the gesture commits (dismiss) or resets back to rest.
//!
//! One [`DragClassifier`] instance covers one gesture, from pointer-down to
//! pointer-up. State is monotonic per gesture: once a terminal outcome is
//! produced, further samples are stale input and are silently dropped.
//! Collections key one instance per item, so simultaneous gestures on
//! different items never share mutable state.
//!
//! # Example
//!
//! ```
//! use flick_gesture::{DragClassifier, DragConfig, DragSample, GestureOutcome};
//!
//! let mut classifier = DragClassifier::new(DragConfig::new(0.5));
//! let out = classifier.on_sample(DragSample::moving(24.0, 0.2, 1.0));
//! assert_eq!(out, Some(GestureOutcome::Tracking(24.0)));
//!
//! let out = classifier.on_sample(DragSample::release(80.0, 0.9, 1.0));
//! assert_eq!(out, Some(GestureOutcome::Commit));
//! assert!(classifier.is_finished());
//! ```

pub mod classifier;
pub mod sample;

pub use classifier::{DragClassifier, GestureOutcome};
pub use sample::{DragConfig, DragDirection, DragSample};
