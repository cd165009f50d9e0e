// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and tap recognition for a single pointer.
//!
//! [`DragTracker`] turns raw pointer down/move/up events into either a tap
//! or a horizontal drag with a release velocity. A press becomes a drag once
//! the pointer travels farther than the slop from where it went down; from
//! then on, the translation is measured from the point where the slop was
//! crossed so content does not jump when the drag begins.
//!
//! ```
//! use kurbo::Point;
//! use revolver_carousel::{DragTracker, DragUpdate, Release};
//!
//! let mut tracker = DragTracker::new();
//! tracker.on_down(Point::new(200.0, 50.0), 0);
//! assert_eq!(tracker.on_move(Point::new(195.0, 50.0), 8), DragUpdate::Pending);
//! assert_eq!(tracker.on_move(Point::new(180.0, 50.0), 16), DragUpdate::Began);
//! assert_eq!(tracker.on_move(Point::new(140.0, 50.0), 32), DragUpdate::Moved { translation: -40.0 });
//!
//! // Finger moving left scrolls forward: positive scroll velocity.
//! match tracker.on_up(Point::new(140.0, 50.0), 32) {
//!     Release::Drag { velocity } => assert!(velocity > 0.0),
//!     other => panic!("expected a drag, got {other:?}"),
//! }
//! ```

use kurbo::Point;
use smallvec::SmallVec;

/// Pointer travel (points) below which a press is still a tap.
pub const DEFAULT_DRAG_SLOP: f64 = 10.0;

/// Samples older than this (ms) before the latest one are ignored for velocity.
pub const VELOCITY_WINDOW_MS: u64 = 100;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Sample {
    x: f64,
    time: u64,
}

/// State for the active press.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Press {
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp of the press.
    pub down_time: u64,
    /// Where the slop was crossed, once the press became a drag.
    pub anchor: Option<Point>,
}

/// Outcome of a pointer move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragUpdate {
    /// No press is active.
    Idle,
    /// The press has not left the slop yet.
    Pending,
    /// The press just became a drag.
    Began,
    /// The drag moved; `translation` is the horizontal travel since it began.
    Moved {
        /// Horizontal travel in points.
        translation: f64,
    },
}

/// Outcome of a pointer release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Release {
    /// No press was active.
    None,
    /// The press never left the slop.
    Tap {
        /// Where the pointer went down.
        position: Point,
    },
    /// The press was a drag.
    Drag {
        /// Scroll velocity in points per millisecond; positive scrolls forward.
        velocity: f64,
    },
}

/// Tap/drag recognizer with velocity estimation.
#[derive(Clone, Debug)]
pub struct DragTracker {
    press: Option<Press>,
    samples: SmallVec<[Sample; 8]>,
    /// Travel before a press becomes a drag.
    pub slop: f64,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DragTracker {
    /// Creates a tracker with [`DEFAULT_DRAG_SLOP`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_slop(DEFAULT_DRAG_SLOP)
    }

    /// Creates a tracker with a custom slop.
    #[must_use]
    pub fn with_slop(slop: f64) -> Self {
        Self {
            press: None,
            samples: SmallVec::new(),
            slop,
        }
    }

    /// The active press, if any.
    #[must_use]
    pub const fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }

    /// Whether a press is active.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the active press has become a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.anchor.is_some())
    }

    /// Records a pointer down, replacing any press in progress.
    pub fn on_down(&mut self, position: Point, now: u64) {
        self.press = Some(Press {
            down_position: position,
            down_time: now,
            anchor: None,
        });
        self.samples.clear();
        self.record(position, now);
    }

    /// Records a pointer move.
    pub fn on_move(&mut self, position: Point, now: u64) -> DragUpdate {
        let Some(press) = self.press.as_mut() else {
            return DragUpdate::Idle;
        };
        let update = match press.anchor {
            Some(anchor) => DragUpdate::Moved {
                translation: position.x - anchor.x,
            },
            None if press.down_position.distance(position) > self.slop => {
                press.anchor = Some(position);
                DragUpdate::Began
            }
            None => DragUpdate::Pending,
        };
        self.record(position, now);
        update
    }

    /// Records a pointer release and ends the press.
    pub fn on_up(&mut self, position: Point, now: u64) -> Release {
        let Some(press) = self.press else {
            return Release::None;
        };
        self.record(position, now);
        let release = if press.anchor.is_some() {
            Release::Drag {
                velocity: self.scroll_velocity(),
            }
        } else {
            Release::Tap {
                position: press.down_position,
            }
        };
        self.reset();
        release
    }

    /// Abandons the press. Returns `true` if it was a drag.
    pub fn on_cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.reset();
        was_dragging
    }

    /// Scroll velocity over the recent samples, in points per millisecond.
    ///
    /// The sign is opposite to the finger: moving the finger towards the
    /// leading edge scrolls forward.
    #[must_use]
    pub fn scroll_velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        let dt = last.time.saturating_sub(first.time);
        if dt == 0 {
            return 0.0;
        }
        -(last.x - first.x) / dt as f64
    }

    fn record(&mut self, position: Point, now: u64) {
        self.samples
            .retain(|s| now.saturating_sub(s.time) <= VELOCITY_WINDOW_MS);
        self.samples.push(Sample {
            x: position.x,
            time: now,
        });
    }

    fn reset(&mut self) {
        self.press = None;
        self.samples.clear();
    }
}
