// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indicator shapes and their transitions.

use kurbo::{Point, Rect};

use crate::Color;

/// Frame, radius and color of a shape at one instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Appearance {
    /// Frame in the indicator's coordinate space.
    pub frame: Rect,
    /// Corner radius.
    pub corner_radius: f64,
    /// Fill color.
    pub color: Color,
}

impl Appearance {
    /// Interpolates every property towards `other`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let origin = self.frame.origin().lerp(other.frame.origin(), t);
        let corner = Point::new(self.frame.x1, self.frame.y1)
            .lerp(Point::new(other.frame.x1, other.frame.y1), t);
        Self {
            frame: Rect::from_points(origin, corner),
            corner_radius: self.corner_radius + (other.corner_radius - self.corner_radius) * t,
            color: self.color.lerp(other.color, t),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Transition {
    pub(crate) from: Appearance,
    pub(crate) to: Appearance,
    pub(crate) start_ms: u64,
    pub(crate) duration_ms: u64,
}

impl Transition {
    pub(crate) fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }
}

/// One indicator dot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndicatorShape {
    appearance: Appearance,
    hidden: bool,
    transition: Option<Transition>,
}

impl IndicatorShape {
    pub(crate) const fn new(appearance: Appearance) -> Self {
        Self {
            appearance,
            hidden: false,
            transition: None,
        }
    }

    /// What to draw now.
    #[must_use]
    pub const fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// Frame to draw now.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.appearance.frame
    }

    /// Color to draw now.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.appearance.color
    }

    /// Whether the shape should not be drawn.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether a transition is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Jumps to `appearance`, cancelling any transition.
    pub(crate) fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
        self.transition = None;
    }

    /// Moves the frame only, keeping any transition's radius and color.
    pub(crate) fn set_frame(&mut self, frame: Rect) {
        match self.transition.as_mut() {
            Some(transition) => transition.to.frame = frame,
            None => self.appearance.frame = frame,
        }
    }

    pub(crate) fn animate_to(&mut self, to: Appearance, now_ms: u64, duration_ms: u64) {
        self.transition = Some(Transition {
            from: self.appearance,
            to,
            start_ms: now_ms,
            duration_ms,
        });
    }

    /// Advances the transition; returns `true` while it is still running.
    pub(crate) fn advance(&mut self, now_ms: u64, ease: impl Fn(f64) -> f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let t = transition.progress(now_ms);
        if t >= 1.0 {
            self.appearance = transition.to;
            self.transition = None;
            return false;
        }
        self.appearance = transition.from.lerp(&transition.to, ease(t));
        true
    }
}
