//! Easing curves
//!
//! The bundled default of the frame interpolation capability the sequencer
//! consumes. Cubic in/out curves; progress is clamped to `[0, 1]`.

/// Easing function applied to a track's normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant rate.
    #[default]
    Linear,
    /// Slow start, accelerates (cubic).
    EaseIn,
    /// Fast start, decelerates (cubic).
    EaseOut,
    /// Slow at both ends (cubic).
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` through this curve.
    ///
    /// Input outside `[0, 1]` is clamped before the curve is applied, so the
    /// output always lies between the run endpoints.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    u * u * u / 2.0 + 1.0
                }
            }
        }
    }
}
