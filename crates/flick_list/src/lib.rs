//! Flick Dismissible List
//!
//! The aggregator tying the two lower layers together: each item in the list
//! owns an independent gesture classifier and a two-track sequencer (a fling
//! along the drag axis, a height collapse). Commit outcomes start the dismiss
//! animation; the item is removed from the mapping only after its sequencer
//! reports settlement. Item state is monotonic: alive, dismissing, removed.
//!
//! The mapping is mutated exclusively by the aggregator, one whole update per
//! completion event; classifiers and sequencers only read and propose.
//!
//! # Example
//!
//! ```
//! use flick_list::{DismissConfig, DismissState, DismissibleList};
//! use flick_gesture::{DragSample, GestureOutcome};
//!
//! let mut list =
//!     DismissibleList::new(["hi", "data", "bye"], DismissConfig::default()).unwrap();
//!
//! let out = list.handle_sample(&"data", DragSample::release(40.0, 0.9, 1.0));
//! assert_eq!(out, Some(GestureOutcome::Commit));
//! assert_eq!(list.state(&"data"), Some(DismissState::Dismissing));
//!
//! while list.state(&"data").is_some() {
//!     list.tick(16.0);
//! }
//! assert_eq!(list.len(), 2);
//! ```

pub mod dismiss;

pub use dismiss::{DismissConfig, DismissError, DismissState, DismissibleList, RestorePolicy};
