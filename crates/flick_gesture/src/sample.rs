//! Drag samples and classifier configuration

/// Direction a gesture must travel in for a commit to be allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragDirection {
    /// Toward negative axis values (left / up).
    Negative,
    /// Toward positive axis values (right / down).
    Positive,
}

impl DragDirection {
    /// Whether a sample's motion sign matches this direction.
    pub fn matches(self, direction: f32) -> bool {
        match self {
            DragDirection::Negative => direction < 0.0,
            DragDirection::Positive => direction > 0.0,
        }
    }
}

/// One pointer sample of an in-progress drag.
///
/// Samples for one gesture arrive in time order; the gesture ends exactly once
/// (`active` transitions true to false one time).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSample {
    /// Signed displacement since drag start, along the drag axis.
    pub delta: f32,
    /// Non-negative speed at sample time.
    pub velocity: f32,
    /// Sign of the latest motion: `-1.0`, `0.0`, or `1.0`.
    pub direction: f32,
    /// Whether the pointer is currently down.
    pub active: bool,
}

impl DragSample {
    /// A sample taken while the pointer is down.
    pub fn moving(delta: f32, velocity: f32, direction: f32) -> Self {
        Self {
            delta,
            velocity,
            direction,
            active: true,
        }
    }

    /// The release sample ending a gesture.
    pub fn release(delta: f32, velocity: f32, direction: f32) -> Self {
        Self {
            delta,
            velocity,
            direction,
            active: false,
        }
    }
}

/// Configuration for one classifier instance.
///
/// `required_direction` is optional: some interactions commit on velocity
/// alone, others also demand the fling travel a specific way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// Release velocity above which the gesture commits.
    pub threshold_velocity: f32,
    /// If set, the release motion must also match this direction.
    pub required_direction: Option<DragDirection>,
}

impl DragConfig {
    pub fn new(threshold_velocity: f32) -> Self {
        Self {
            threshold_velocity,
            required_direction: None,
        }
    }

    pub fn with_direction(mut self, direction: DragDirection) -> Self {
        self.required_direction = Some(direction);
        self
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_matching() {
        assert!(DragDirection::Positive.matches(1.0));
        assert!(!DragDirection::Positive.matches(-1.0));
        assert!(!DragDirection::Positive.matches(0.0));
        assert!(DragDirection::Negative.matches(-1.0));
        assert!(!DragDirection::Negative.matches(0.0));
    }
}
