//! Easing curves and tweening helpers.
//!
//! Timing is data: an animation is a start time, a duration and an easing,
//! and callers sample it with the current frame time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
    CubicOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A timed tween between two states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Raw progress in [0, 1]; zero-length tweens are immediately complete
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn eased(&self, now_ms: f64) -> f64 {
        self.easing.apply(self.progress(now_ms))
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::CubicInOut, Easing::CubicOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_tween_progress() {
        let tween = Tween::new(100.0, 600.0, Easing::Linear);
        assert_eq!(tween.progress(0.0), 0.0);
        assert_eq!(tween.progress(400.0), 0.5);
        assert!(tween.is_complete(700.0));
        assert!(Tween::new(0.0, 0.0, Easing::Linear).is_complete(0.0));
    }
}
