// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based offset tweens.

/// Easing curve mapping progress in `[0, 1]` to eased progress in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cubic acceleration then deceleration.
    #[default]
    EaseInOut,
    /// Cubic deceleration, used when settling after a fling.
    EaseOut,
}

impl Easing {
    /// Applies the curve to `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// An animation of the scroll offset between two values.
///
/// Time is supplied by the caller in milliseconds. Sampling at or after the
/// end returns exactly [`target`](Self::target), so a finished animation
/// lands on the snapped offset without rounding drift.
///
/// ```rust
/// use revolver_carousel::{Easing, OffsetAnimation};
///
/// let anim = OffsetAnimation::new(0.0, 100.0, 1_000, 300, Easing::Linear);
/// assert_eq!(anim.sample(1_150), 50.0);
/// assert!(anim.is_done(1_300));
/// assert_eq!(anim.sample(5_000), 100.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OffsetAnimation {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl OffsetAnimation {
    /// Creates an animation from `from` to `to` starting at `start_ms`.
    ///
    /// A zero duration is treated as one millisecond.
    #[must_use]
    pub fn new(from: f64, to: f64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    /// Offset the animation ends at.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.to
    }

    /// Offset the animation started from.
    #[must_use]
    pub const fn origin(&self) -> f64 {
        self.from
    }

    /// Duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Whether the animation has reached its end at `now_ms`.
    #[must_use]
    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Offset at `now_ms`.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> f64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = elapsed as f64 / self.duration_ms as f64;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_boundaries() {
        for easing in [Easing::Linear, Easing::EaseInOut, Easing::EaseOut] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at t=0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at t=1");
            assert_eq!(easing.apply(2.0), 1.0, "{easing:?} clamps");
        }
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5, "ease-out front-loads motion");
    }

    #[test]
    fn samples_before_start_stay_at_origin() {
        let anim = OffsetAnimation::new(10.0, 20.0, 100, 50, Easing::EaseOut);
        assert_eq!(anim.sample(0), 10.0);
        assert!(!anim.is_done(149));
        assert_eq!(anim.sample(150), 20.0);
    }

    #[test]
    fn zero_duration_finishes_on_the_next_millisecond() {
        let anim = OffsetAnimation::new(0.0, 5.0, 10, 0, Easing::Linear);
        assert_eq!(anim.duration_ms(), 1);
        assert!(anim.is_done(11));
    }
}
