//! Dismissible-list aggregator

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, trace, warn};

use flick_animation::{
    ConfigError, Easing, OrderingPolicy, Sequencer, Signal, Track, TrackId, TriggerOptions,
};
use flick_gesture::{DragClassifier, DragConfig, DragDirection, DragSample, GestureOutcome};

/// Errors from [`DismissibleList::new`]. All validation happens at
/// construction; sample handling and ticking never fail.
#[derive(Error, Debug)]
pub enum DismissError {
    #[error("fling distance must be positive and finite, got {0}")]
    InvalidFlingDistance(f32),

    #[error("rest height must be positive and finite, got {0}")]
    InvalidRestHeight(f32),

    #[error("threshold velocity must be non-negative and finite, got {0}")]
    InvalidThreshold(f32),

    #[error(transparent)]
    Sequencer(#[from] ConfigError),
}

/// Lifecycle of one dismissible item. Transitions are monotonic:
/// alive -> dismissing -> removed, never backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissState {
    Alive,
    Dismissing,
    Removed,
}

/// Bulk reset convenience: once every item has been dismissed, wait
/// `delay_ms`, then animate all items back to rest, each staggered by
/// `stagger_ms * index`.
#[derive(Clone, Copy, Debug)]
pub struct RestorePolicy {
    pub delay_ms: u32,
    pub stagger_ms: u32,
}

impl Default for RestorePolicy {
    fn default() -> Self {
        Self {
            delay_ms: 600,
            stagger_ms: 500,
        }
    }
}

/// Configuration shared by every item in a list.
///
/// `fling_distance` is the oversized off-screen target a committed item
/// animates to; it is deliberately not proportional to how far the user
/// dragged.
#[derive(Clone, Debug)]
pub struct DismissConfig {
    /// Off-screen x target for a committed dismiss.
    pub fling_distance: f32,
    /// Height of an item at rest; collapses to zero while dismissing.
    pub rest_height: f32,
    pub fling_duration_ms: u32,
    pub collapse_duration_ms: u32,
    /// Release velocity above which a gesture commits.
    pub threshold_velocity: f32,
    /// If set, the fling must travel this way to commit.
    pub required_direction: Option<DragDirection>,
    /// Optional bulk reset once the list empties.
    pub restore: Option<RestorePolicy>,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            fling_distance: 400.0,
            rest_height: 80.0,
            fling_duration_ms: 300,
            collapse_duration_ms: 200,
            threshold_velocity: 0.5,
            required_direction: Some(DragDirection::Positive),
            restore: None,
        }
    }
}

impl DismissConfig {
    fn validate(&self) -> Result<(), DismissError> {
        if !self.fling_distance.is_finite() || self.fling_distance <= 0.0 {
            return Err(DismissError::InvalidFlingDistance(self.fling_distance));
        }
        if !self.rest_height.is_finite() || self.rest_height <= 0.0 {
            return Err(DismissError::InvalidRestHeight(self.rest_height));
        }
        if !self.threshold_velocity.is_finite() || self.threshold_velocity < 0.0 {
            return Err(DismissError::InvalidThreshold(self.threshold_velocity));
        }
        Ok(())
    }

    fn drag_config(&self) -> DragConfig {
        DragConfig {
            threshold_velocity: self.threshold_velocity,
            required_direction: self.required_direction,
        }
    }
}

#[derive(Clone)]
struct Item {
    state: DismissState,
    seq: Sequencer,
    x: TrackId,
    height: TrackId,
    gesture: Option<DragClassifier>,
    /// Countdown until this item's staggered restore-to-rest trigger fires.
    pending_reverse_ms: Option<f32>,
}

impl Item {
    fn build(config: &DismissConfig) -> Result<Self, ConfigError> {
        let mut builder = Sequencer::builder();
        let x = builder.track(
            Track::new(0.0, config.fling_distance, config.fling_duration_ms)
                .with_easing(Easing::EaseOut),
        );
        let height = builder.track(
            Track::new(config.rest_height, 0.0, config.collapse_duration_ms)
                .with_easing(Easing::EaseInOut),
        );
        // Dismiss: the collapse starts halfway through the fling.
        // Restore: everything comes back together.
        let seq = builder
            .ordering(OrderingPolicy::overlap(vec![x, height], 0.5))
            .reverse_ordering(OrderingPolicy::Parallel)
            .build()?;
        Ok(Self {
            state: DismissState::Alive,
            seq,
            x,
            height,
            gesture: None,
            pending_reverse_ms: None,
        })
    }
}

/// A list of dismissible items keyed by stable identity.
///
/// Each item's classifier and sequencer are independent; simultaneous
/// gestures on different items never interact.
pub struct DismissibleList<K> {
    items: IndexMap<K, Item>,
    config: DismissConfig,
    /// Fresh at-rest item, cloned for construction and restores.
    prototype: Item,
    /// Original key order, kept for the bulk restore.
    all_keys: Vec<K>,
    restore_countdown_ms: Option<f32>,
}

impl<K> DismissibleList<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new(
        keys: impl IntoIterator<Item = K>,
        config: DismissConfig,
    ) -> Result<Self, DismissError> {
        config.validate()?;
        let prototype = Item::build(&config)?;

        let mut items = IndexMap::new();
        let mut all_keys = Vec::new();
        for key in keys {
            if items.insert(key.clone(), prototype.clone()).is_some() {
                warn!(?key, "duplicate key replaces earlier item");
            } else {
                all_keys.push(key);
            }
        }

        Ok(Self {
            items,
            config,
            prototype,
            all_keys,
            restore_countdown_ms: None,
        })
    }

    /// Route one drag sample to the item's classifier and apply the outcome.
    ///
    /// Samples for unknown, removed, or already-dismissing items are stale
    /// input: dropped and traced, never an error.
    pub fn handle_sample(&mut self, key: &K, sample: DragSample) -> Option<GestureOutcome> {
        let drag_config = self.config.drag_config();
        let Some(item) = self.items.get_mut(key) else {
            trace!(?key, "sample for unknown or removed item ignored");
            return None;
        };
        if item.state != DismissState::Alive {
            trace!(?key, "sample while dismissing ignored");
            return None;
        }

        // A finished gesture is superseded only by a fresh pointer-down.
        let start_new = match &item.gesture {
            None => true,
            Some(g) => g.is_finished() && sample.active,
        };
        if start_new {
            item.gesture = Some(DragClassifier::new(drag_config));
        }

        let outcome = item.gesture.as_mut()?.on_sample(sample)?;
        match outcome {
            GestureOutcome::Tracking(offset) => {
                // Mirror the pointer directly; offsets behind rest clamp to 0.
                item.seq.write_through(item.x, offset.max(0.0));
            }
            GestureOutcome::Commit => {
                item.state = DismissState::Dismissing;
                debug!(?key, "dismiss committed");
                item.seq.trigger(Signal::Forward, TriggerOptions::default());
            }
            GestureOutcome::ResetToRest => {
                item.seq.trigger(Signal::Reverse, TriggerOptions::default());
            }
        }
        Some(outcome)
    }

    /// Advance every item's animation by `dt_ms`.
    ///
    /// Items whose dismiss animation settled transition to removed, are
    /// dropped from the mapping, and are returned. Each completion is applied
    /// as one whole mapping update.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<K> {
        let mut removed = Vec::new();
        for (key, item) in self.items.iter_mut() {
            if let Some(ms) = &mut item.pending_reverse_ms {
                *ms -= dt_ms;
                if *ms <= 0.0 {
                    item.pending_reverse_ms = None;
                    item.seq.trigger(Signal::Reverse, TriggerOptions::default());
                }
            }
            item.seq.tick(dt_ms);
            if item.state == DismissState::Dismissing && item.seq.is_settled() {
                item.state = DismissState::Removed;
                removed.push(key.clone());
            }
        }

        for key in &removed {
            self.items.shift_remove(key);
            debug!(?key, remaining = self.items.len(), "item removed after settlement");
        }

        if let Some(policy) = self.config.restore {
            if !removed.is_empty() && self.items.is_empty() && !self.all_keys.is_empty() {
                self.restore_countdown_ms = Some(policy.delay_ms as f32);
                debug!(
                    delay_ms = policy.delay_ms,
                    "all items dismissed, scheduling bulk restore"
                );
            } else if let Some(countdown) = &mut self.restore_countdown_ms {
                *countdown -= dt_ms;
                if *countdown <= 0.0 {
                    self.restore_countdown_ms = None;
                    self.restore_all(policy);
                }
            }
        }

        removed
    }

    /// Re-insert every original key at the flung position and animate each
    /// back to rest with a per-index stagger.
    fn restore_all(&mut self, policy: RestorePolicy) {
        debug!(items = self.all_keys.len(), "bulk restore to rest");
        for (index, key) in self.all_keys.clone().into_iter().enumerate() {
            let mut item = self.prototype.clone();
            item.seq.trigger(Signal::Forward, TriggerOptions::immediate());
            item.pending_reverse_ms = Some((policy.stagger_ms as usize * index) as f32);
            self.items.insert(key, item);
        }
    }

    pub fn state(&self, key: &K) -> Option<DismissState> {
        self.items.get(key).map(|item| item.state)
    }

    /// Key/state pairs in visual order.
    pub fn states(&self) -> impl Iterator<Item = (&K, DismissState)> + '_ {
        self.items.iter().map(|(key, item)| (key, item.state))
    }

    /// Live x offset of an item (pointer mirror or fling progress).
    pub fn offset(&self, key: &K) -> Option<f32> {
        let item = self.items.get(key)?;
        item.seq.value(item.x)
    }

    /// Live height of an item (collapses while dismissing).
    pub fn height(&self, key: &K) -> Option<f32> {
        let item = self.items.get(key)?;
        item.seq.value(item.height)
    }

    /// Whether any item still has an animation in flight.
    pub fn is_animating(&self) -> bool {
        self.items
            .values()
            .any(|item| !item.seq.is_settled() || item.pending_reverse_ms.is_some())
            || self.restore_countdown_ms.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.items.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DismissConfig {
        DismissConfig::default()
    }

    fn settle<K: Clone + Eq + Hash + fmt::Debug>(list: &mut DismissibleList<K>) -> Vec<K> {
        let mut removed = Vec::new();
        for _ in 0..1000 {
            removed.extend(list.tick(16.0));
            if !list.is_animating() {
                return removed;
            }
        }
        panic!("list never settled");
    }

    #[test]
    fn test_commit_scenario_removes_only_flung_item() {
        let mut list = DismissibleList::new(["hi", "data", "bye"], config()).unwrap();

        let out = list.handle_sample(&"data", DragSample::release(40.0, 0.9, 1.0));
        assert_eq!(out, Some(GestureOutcome::Commit));
        assert_eq!(list.state(&"data"), Some(DismissState::Dismissing));
        assert_eq!(list.len(), 3);

        let removed = settle(&mut list);
        assert_eq!(removed, vec!["data"]);

        let states: Vec<_> = list.states().map(|(k, s)| (*k, s)).collect();
        assert_eq!(
            states,
            vec![("hi", DismissState::Alive), ("bye", DismissState::Alive)]
        );
    }

    #[test]
    fn test_tracking_mirrors_pointer_offset() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();

        list.handle_sample(&"a", DragSample::moving(34.0, 0.3, 1.0));
        assert_eq!(list.offset(&"a"), Some(34.0));

        // Leftward drag clamps at rest.
        list.handle_sample(&"a", DragSample::moving(-20.0, 0.3, -1.0));
        assert_eq!(list.offset(&"a"), Some(0.0));
    }

    #[test]
    fn test_slow_release_animates_back_to_rest() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();

        list.handle_sample(&"a", DragSample::moving(60.0, 0.3, 1.0));
        let out = list.handle_sample(&"a", DragSample::release(60.0, 0.3, 1.0));
        assert_eq!(out, Some(GestureOutcome::ResetToRest));

        // Continuity: the reset starts from the mirrored offset.
        assert_eq!(list.offset(&"a"), Some(60.0));
        settle(&mut list);
        assert_eq!(list.offset(&"a"), Some(0.0));
        assert_eq!(list.state(&"a"), Some(DismissState::Alive));
    }

    #[test]
    fn test_wrong_direction_never_commits() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();
        let out = list.handle_sample(&"a", DragSample::release(-40.0, 0.9, -1.0));
        assert_eq!(out, Some(GestureOutcome::ResetToRest));
    }

    #[test]
    fn test_samples_while_dismissing_are_ignored() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();
        list.handle_sample(&"a", DragSample::release(40.0, 0.9, 1.0));
        assert_eq!(list.state(&"a"), Some(DismissState::Dismissing));

        assert_eq!(
            list.handle_sample(&"a", DragSample::moving(10.0, 0.2, 1.0)),
            None
        );
        // The stale sample must not disturb the fling target.
        let removed = settle(&mut list);
        assert_eq!(removed, vec!["a"]);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();
        assert_eq!(
            list.handle_sample(&"ghost", DragSample::moving(10.0, 0.2, 1.0)),
            None
        );
    }

    #[test]
    fn test_simultaneous_gestures_are_independent() {
        let mut list = DismissibleList::new(["a", "b"], config()).unwrap();

        list.handle_sample(&"a", DragSample::moving(15.0, 0.3, 1.0));
        list.handle_sample(&"b", DragSample::moving(90.0, 0.3, 1.0));
        assert_eq!(list.offset(&"a"), Some(15.0));
        assert_eq!(list.offset(&"b"), Some(90.0));

        // One commits, the other resets; neither affects the other.
        list.handle_sample(&"a", DragSample::release(15.0, 0.9, 1.0));
        list.handle_sample(&"b", DragSample::release(90.0, 0.1, 1.0));

        let removed = settle(&mut list);
        assert_eq!(removed, vec!["a"]);
        assert_eq!(list.state(&"b"), Some(DismissState::Alive));
        assert_eq!(list.offset(&"b"), Some(0.0));
    }

    #[test]
    fn test_new_gesture_after_reset() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();

        list.handle_sample(&"a", DragSample::moving(30.0, 0.3, 1.0));
        list.handle_sample(&"a", DragSample::release(30.0, 0.1, 1.0));
        settle(&mut list);

        // A fresh pointer-down starts a new gesture that can still commit.
        list.handle_sample(&"a", DragSample::moving(10.0, 0.8, 1.0));
        let out = list.handle_sample(&"a", DragSample::release(12.0, 1.1, 1.0));
        assert_eq!(out, Some(GestureOutcome::Commit));
    }

    #[test]
    fn test_duplicate_release_is_stale() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();
        list.handle_sample(&"a", DragSample::moving(30.0, 0.3, 1.0));
        assert_eq!(
            list.handle_sample(&"a", DragSample::release(30.0, 0.1, 1.0)),
            Some(GestureOutcome::ResetToRest)
        );
        // Second release without a new pointer-down: dropped.
        assert_eq!(
            list.handle_sample(&"a", DragSample::release(30.0, 0.9, 1.0)),
            None
        );
    }

    #[test]
    fn test_height_collapses_during_dismiss() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();
        list.handle_sample(&"a", DragSample::release(40.0, 0.9, 1.0));

        // Collapse is staggered behind the fling, so the height holds at
        // rest until the overlap offset passes.
        list.tick(16.0);
        assert_eq!(list.height(&"a"), Some(config().rest_height));

        let mut saw_partial = false;
        for _ in 0..1000 {
            list.tick(16.0);
            match list.height(&"a") {
                Some(h) if h > 0.0 && h < config().rest_height => saw_partial = true,
                None => break,
                _ => {}
            }
        }
        assert!(saw_partial, "height never collapsed partway");
    }

    #[test]
    fn test_bulk_restore_after_all_dismissed() {
        let mut cfg = config();
        cfg.restore = Some(RestorePolicy {
            delay_ms: 600,
            stagger_ms: 500,
        });
        let mut list = DismissibleList::new(["a", "b"], cfg).unwrap();

        list.handle_sample(&"a", DragSample::release(40.0, 0.9, 1.0));
        list.handle_sample(&"b", DragSample::release(40.0, 0.9, 1.0));

        let mut ticks = 0;
        while list.is_empty() || list.is_animating() {
            list.tick(16.0);
            ticks += 1;
            assert!(ticks < 2000, "restore never completed");
        }

        assert_eq!(list.len(), 2);
        let states: Vec<_> = list.states().map(|(k, s)| (*k, s)).collect();
        assert_eq!(
            states,
            vec![("a", DismissState::Alive), ("b", DismissState::Alive)]
        );
        assert_eq!(list.offset(&"a"), Some(0.0));
        assert_eq!(list.offset(&"b"), Some(0.0));
        assert_eq!(list.height(&"a"), Some(config().rest_height));
    }

    #[test]
    fn test_restore_staggers_later_items() {
        let mut cfg = config();
        cfg.restore = Some(RestorePolicy {
            delay_ms: 100,
            stagger_ms: 500,
        });
        let mut list = DismissibleList::new(["a", "b"], cfg).unwrap();

        list.handle_sample(&"a", DragSample::release(40.0, 0.9, 1.0));
        list.handle_sample(&"b", DragSample::release(40.0, 0.9, 1.0));

        // Run until both removals settle, then until the restore has fired.
        let mut ticks = 0;
        while !list.is_empty() {
            list.tick(16.0);
            ticks += 1;
            assert!(ticks < 2000, "dismissals never settled");
        }
        while list.is_empty() {
            list.tick(16.0);
            ticks += 1;
            assert!(ticks < 2000, "restore never fired");
        }

        // Give the first item a head start shorter than the stagger: "a" is
        // already moving back while "b" still waits at the flung position.
        for _ in 0..10 {
            list.tick(16.0);
        }
        let a = list.offset(&"a").unwrap();
        let b = list.offset(&"b").unwrap();
        assert!(a < 400.0, "first item should be returning, at {a}");
        assert_eq!(b, 400.0, "second item should still be waiting");
    }

    #[test]
    fn test_no_restore_without_policy() {
        let mut list = DismissibleList::new(["a"], config()).unwrap();
        list.handle_sample(&"a", DragSample::release(40.0, 0.9, 1.0));
        settle(&mut list);
        assert!(list.is_empty());

        for _ in 0..200 {
            list.tick(16.0);
        }
        assert!(list.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let bad_fling = DismissConfig {
            fling_distance: 0.0,
            ..config()
        };
        assert!(matches!(
            DismissibleList::<&str>::new([], bad_fling).err(),
            Some(DismissError::InvalidFlingDistance(_))
        ));

        let bad_threshold = DismissConfig {
            threshold_velocity: -1.0,
            ..config()
        };
        assert!(matches!(
            DismissibleList::<&str>::new([], bad_threshold).err(),
            Some(DismissError::InvalidThreshold(_))
        ));

        let bad_duration = DismissConfig {
            fling_duration_ms: 0,
            ..config()
        };
        assert!(matches!(
            DismissibleList::<&str>::new([], bad_duration).err(),
            Some(DismissError::Sequencer(_))
        ));
    }
}
