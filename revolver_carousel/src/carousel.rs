// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The carousel state machine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use kurbo::{Point, Size};
use tracing::{debug, trace, warn};

use crate::gesture::{DragUpdate, Release};
use crate::layout::Invalidation;
use crate::{
    AutoplayTimer, CarouselEvent, CarouselListener, DragTracker, Easing, IndexSpace, LayoutConfig,
    LayoutEngine, MAX_SECTIONS, OffsetAnimation, RECENTER_SECTION, RECYCLE_MARGIN,
    ScrollDirection, SlotAttributes, TransformObserver, VirtualPosition,
};

/// Release speed (points per millisecond) below which a drag snaps back.
pub const SNAP_VELOCITY_THRESHOLD: f64 = 0.35;

/// Time constant (ms) used to project where a fling would coast to.
pub const DECELERATION_PROJECTION_MS: f64 = 499.0;

/// Duration of programmatic scrolls and snap-backs.
pub const SCROLL_ANIMATION_MS: u64 = 300;

const MIN_FLING_MS: f64 = 200.0;
const MAX_FLING_MS: f64 = 600.0;

/// Distance below which a release lands without decelerating.
const SETTLE_TOLERANCE: f64 = 0.5;

/// Host-side data for a carousel.
pub trait CarouselSource {
    /// Number of logical items. May be zero.
    fn item_count(&self) -> usize;

    /// Layout configuration to use until the next reload.
    fn layout_config(&self) -> LayoutConfig;
}

/// What the scroll offset is currently doing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    /// At rest, or following nothing.
    #[default]
    Idle,
    /// Following the finger.
    Dragging,
    /// Settling onto an item after a drag.
    Decelerating,
    /// Running a programmatic scroll.
    Animating,
}

/// A headless, optionally endless, paging carousel.
///
/// The carousel owns the scroll offset and derives the current
/// [`VirtualPosition`] from it. Hosts feed it a viewport size, data through a
/// [`CarouselSource`], pointer input and timestamps, and read back slot
/// attributes and [`CarouselEvent`]s.
///
/// ```rust
/// use kurbo::Size;
/// use revolver_carousel::{Carousel, CarouselSource, LayoutConfig};
///
/// struct Banners;
///
/// impl CarouselSource for Banners {
///     fn item_count(&self) -> usize {
///         5
///     }
///
///     fn layout_config(&self) -> LayoutConfig {
///         LayoutConfig {
///             infinite_loop: true,
///             ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
///         }
///     }
/// }
///
/// let mut carousel = Carousel::new();
/// carousel.set_viewport(Size::new(375.0, 220.0));
/// carousel.set_autoplay_interval(3_000);
/// carousel.reload_data(&Banners);
/// assert_eq!(carousel.current_index(), Some(0));
///
/// // The autoplay timer fires, then the animated scroll completes.
/// carousel.tick(3_000);
/// carousel.tick(3_300);
/// assert_eq!(carousel.current_index(), Some(1));
/// ```
pub struct Carousel {
    config: LayoutConfig,
    item_count: usize,
    viewport: Size,
    engine: LayoutEngine,
    offset: f64,
    position: Option<VirtualPosition>,
    phase: ScrollPhase,
    animation: Option<OffsetAnimation>,
    tracker: DragTracker,
    suppress_tap: bool,
    drag_begin_position: Option<VirtualPosition>,
    drag_start_offset: f64,
    autoplay: AutoplayTimer,
    attached: bool,
    visible: bool,
    did_reload: bool,
    did_layout: bool,
    pending_index: Option<usize>,
    reset_index_on_reload: bool,
    overscan: f64,
    listener: Option<Box<dyn CarouselListener>>,
    observer: Option<Box<dyn TransformObserver>>,
    slots: Vec<SlotAttributes>,
    realized: Range<usize>,
    invalidation: Invalidation,
    now: u64,
    torn_down: bool,
    config_warned: bool,
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("item_count", &self.item_count)
            .field("viewport", &self.viewport)
            .field("offset", &self.offset)
            .field("position", &self.position)
            .field("phase", &self.phase)
            .field("autoplay", &self.autoplay)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Carousel {
    /// Creates an empty carousel. Nothing is shown until [`reload_data`](Self::reload_data).
    #[must_use]
    pub fn new() -> Self {
        let config = LayoutConfig::default();
        Self {
            engine: LayoutEngine::new(config.clone(), Size::ZERO, 0),
            config,
            item_count: 0,
            viewport: Size::ZERO,
            offset: 0.0,
            position: None,
            phase: ScrollPhase::Idle,
            animation: None,
            tracker: DragTracker::new(),
            suppress_tap: false,
            drag_begin_position: None,
            drag_start_offset: 0.0,
            autoplay: AutoplayTimer::new(0),
            attached: true,
            visible: true,
            did_reload: false,
            did_layout: false,
            pending_index: None,
            reset_index_on_reload: true,
            overscan: 0.0,
            listener: None,
            observer: None,
            slots: Vec::new(),
            realized: 0..0,
            invalidation: Invalidation::all(),
            now: 0,
            torn_down: false,
            config_warned: false,
        }
    }

    // --- queries ---

    /// Current scroll offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Logical index of the item closest to the viewport center.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.position.map(|p| p.index)
    }

    /// Occurrence closest to the viewport center.
    #[must_use]
    pub const fn current_position(&self) -> Option<VirtualPosition> {
        self.position
    }

    /// Number of logical items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Configuration in effect (the fallback when the supplied one was invalid).
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Offset/position mapping in effect.
    #[must_use]
    pub const fn space(&self) -> &IndexSpace {
        self.engine.space()
    }

    /// Size of the scrollable content.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.engine.content_size()
    }

    /// Scroll phase.
    #[must_use]
    pub const fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Whether a finger is down.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.tracker.is_pressed()
    }

    /// Whether the content follows a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == ScrollPhase::Dragging
    }

    /// Whether the content is settling after a drag.
    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        self.phase == ScrollPhase::Decelerating
    }

    /// Whether a programmatic scroll is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase == ScrollPhase::Animating
    }

    /// Whether the autoplay timer is armed.
    #[must_use]
    pub const fn autoplay_scheduled(&self) -> bool {
        self.autoplay.is_scheduled()
    }

    /// Whether [`teardown`](Self::teardown) ran.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Attributes of every realized slot at the current offset.
    ///
    /// Flat layouts are only recomputed when the realized range changes;
    /// transformed layouts on every offset change.
    pub fn visible_slots(&mut self) -> &[SlotAttributes] {
        let range = self.engine.realized_range(self.offset, self.overscan);
        let observer = self.observer.as_deref();
        let transformed = self.engine.is_transformed(observer);
        let stale = self.invalidation.contains(Invalidation::LAYOUT)
            || range != self.realized
            || (transformed && self.invalidation.contains(Invalidation::TRANSFORMS));
        if stale {
            self.slots = self.engine.layout(self.offset, self.overscan, observer);
            self.realized = range;
            self.invalidation = Invalidation::empty();
        }
        &self.slots
    }

    /// Positions to realize at the current offset, including overscan.
    #[must_use]
    pub fn realized_positions(&self) -> Vec<VirtualPosition> {
        self.engine
            .realized_range(self.offset, self.overscan)
            .map(|g| VirtualPosition::from_global_index(g, self.item_count))
            .collect()
    }

    /// Logical indices of the slots intersecting the viewport.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.engine
            .candidate_range(self.engine.visible_rect(self.offset))
            .map(|g| VirtualPosition::from_global_index(g, self.item_count).index)
            .collect()
    }

    /// Attributes for a slot at `position` that is about to appear.
    #[must_use]
    pub fn initial_attributes(&self, position: VirtualPosition) -> Option<SlotAttributes> {
        let space = self.engine.space();
        space.is_valid(position).then(|| {
            self.engine
                .initial_attributes(position.global_index(self.item_count), self.observer.as_deref())
        })
    }

    // --- configuration ---

    /// Installs the event listener.
    pub fn set_listener(&mut self, listener: impl CarouselListener + 'static) {
        if self.torn_down {
            return;
        }
        self.listener = Some(Box::new(listener));
    }

    /// Removes the event listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Installs a transform observer, replacing the built-in pipelines.
    pub fn set_transform_observer(&mut self, observer: impl TransformObserver + 'static) {
        if self.torn_down {
            return;
        }
        self.observer = Some(Box::new(observer));
        self.invalidation |= Invalidation::all();
    }

    /// Restores the built-in pipelines.
    pub fn clear_transform_observer(&mut self) {
        self.observer = None;
        self.invalidation |= Invalidation::all();
    }

    /// Extra distance realized on both sides of the viewport.
    pub fn set_overscan(&mut self, overscan: f64) {
        self.overscan = if overscan.is_finite() { overscan.max(0.0) } else { 0.0 };
        self.invalidation |= Invalidation::LAYOUT;
    }

    /// Whether [`reload_data`](Self::reload_data) resets to the first item (the default).
    pub fn set_reset_index_on_reload(&mut self, reset: bool) {
        self.reset_index_on_reload = reset;
    }

    /// Autoplay interval in milliseconds; `0` disables autoplay.
    pub fn set_autoplay_interval(&mut self, interval_ms: u64) {
        if self.torn_down {
            return;
        }
        self.autoplay.set_interval(interval_ms);
        self.ensure_autoplay();
    }

    /// Whether the carousel is attached to a live view hierarchy.
    ///
    /// Detaching cancels the autoplay timer; attaching re-arms it.
    pub fn set_attached(&mut self, attached: bool) {
        if self.torn_down {
            return;
        }
        self.attached = attached;
        if attached {
            self.ensure_autoplay();
        } else {
            self.autoplay.cancel();
        }
    }

    /// Whether the carousel is on screen. Autoplay fires are skipped while hidden.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Sets the viewport size.
    ///
    /// The first non-empty viewport after a reload performs the deferred
    /// layout; later size changes re-center the current item.
    pub fn set_viewport(&mut self, viewport: Size) {
        if self.torn_down {
            return;
        }
        let changed = viewport != self.viewport;
        if changed {
            self.viewport = viewport;
            self.rebuild_engine();
        }
        if !has_area(viewport) {
            return;
        }
        if (changed || self.position.is_none()) && (self.item_count > 0 || self.did_reload) {
            self.did_layout = true;
            let index = self
                .pending_index
                .take()
                .or(self.current_index())
                .unwrap_or(0);
            self.reset_to_index(index);
            self.ensure_autoplay();
        }
    }

    // --- data ---

    /// Re-reads the configuration and item count from `source`.
    ///
    /// Resets to the first item unless disabled with
    /// [`set_reset_index_on_reload`](Self::set_reset_index_on_reload). An
    /// invalid configuration is replaced by [`LayoutConfig::default`], which
    /// shows nothing.
    pub fn reload_data(&mut self, source: &dyn CarouselSource) {
        if self.torn_down {
            return;
        }
        self.did_reload = true;
        self.install_config(source.layout_config());
        let previous = self.current_index();
        self.item_count = source.item_count();
        self.rebuild_engine();
        if self.item_count == 0 {
            self.clear_position();
            return;
        }
        if !has_area(self.viewport) {
            debug!("reload deferred until the viewport is sized");
            return;
        }
        self.did_layout = true;
        let fallback = if self.reset_index_on_reload {
            None
        } else {
            previous
        };
        let index = self.pending_index.take().or(fallback).unwrap_or(0);
        self.autoplay.cancel();
        self.reset_to_index(index);
        self.ensure_autoplay();
    }

    /// Re-reads only the item count, keeping the current index when it still exists.
    pub fn update_data(&mut self, source: &dyn CarouselSource) {
        if self.torn_down {
            return;
        }
        let previous = self.current_index();
        self.item_count = source.item_count();
        self.rebuild_engine();
        if self.item_count == 0 {
            self.clear_position();
            return;
        }
        if !has_area(self.viewport) || !self.did_reload {
            return;
        }
        self.did_layout = true;
        let index = self.pending_index.take().or(previous).unwrap_or(0);
        self.reset_to_index(index);
        self.ensure_autoplay();
    }

    // --- commands ---

    /// Scrolls to logical item `index`.
    ///
    /// When looping, the scroll always moves forward: an index before the
    /// current one is reached in the next section. Issued before the first
    /// layout, the index is remembered and applied once the carousel is sized.
    pub fn scroll_to_index(&mut self, index: usize, animated: bool) {
        if self.torn_down {
            return;
        }
        if !self.did_layout {
            self.pending_index = Some(index);
            return;
        }
        if index >= self.item_count {
            debug!(index, item_count = self.item_count, "scroll_to_index ignored: out of range");
            return;
        }
        let section = match (self.config.infinite_loop, self.position) {
            (false, _) => 0,
            (true, Some(current)) if index >= current.index => current.section,
            (true, Some(current)) => current.section + 1,
            (true, None) => RECENTER_SECTION,
        };
        self.scroll_to_position(VirtualPosition::new(index, section), animated);
    }

    /// Scrolls to a specific occurrence.
    ///
    /// Ignored while dragging and for positions outside the strip. An
    /// animated scroll supersedes any animation in flight.
    pub fn scroll_to_position(&mut self, position: VirtualPosition, animated: bool) {
        if self.torn_down {
            return;
        }
        let space = *self.engine.space();
        if self.item_count == 0 || !space.is_valid(position) {
            debug!(?position, "scroll_to_position ignored: invalid position");
            return;
        }
        if self.tracker.is_dragging() {
            debug!("scroll_to_position ignored while dragging");
            return;
        }
        let target = space.offset_for_position(position);
        if animated {
            self.animation = Some(OffsetAnimation::new(
                self.offset,
                target,
                self.now,
                SCROLL_ANIMATION_MS,
                Easing::EaseInOut,
            ));
            self.phase = ScrollPhase::Animating;
            self.emit(CarouselEvent::AnimationBegin);
        } else {
            self.stop_motion();
            self.apply_offset(target);
            self.recycle();
        }
    }

    /// Scrolls one item in `direction`.
    ///
    /// Without looping, the ends wrap around only while autoplay is enabled.
    pub fn scroll_to_nearest(&mut self, direction: ScrollDirection, animated: bool) {
        if self.torn_down {
            return;
        }
        let space = *self.engine.space();
        let base = match (self.phase, self.animation) {
            (ScrollPhase::Animating, Some(animation)) => {
                Some(space.position_for_offset(animation.target()))
            }
            _ => self.position,
        };
        let Some(current) = base else {
            debug!("scroll_to_nearest ignored: nothing shown");
            return;
        };
        let target = space.nearest_position(current, direction, self.autoplay.is_enabled());
        if target == current && self.phase != ScrollPhase::Animating {
            return;
        }
        self.scroll_to_position(target, animated);
    }

    /// Cancels the timer, drops the listener and the transform observer.
    ///
    /// Every later call is a no-op. Also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.autoplay.cancel();
        self.animation = None;
        self.phase = ScrollPhase::Idle;
        self.listener = None;
        self.observer = None;
        self.torn_down = true;
        debug!("carousel torn down");
    }

    // --- input ---

    /// Advances animations and the autoplay timer to `now` (milliseconds).
    pub fn tick(&mut self, now: u64) {
        if self.torn_down {
            return;
        }
        self.now = now;
        if let Some(animation) = self.animation {
            let done = animation.is_done(now);
            self.apply_offset(animation.sample(now));
            if done {
                self.finish_motion();
            }
        }
        if self.autoplay.poll(now) && self.can_autoplay() {
            trace!(now, "autoplay fired");
            self.scroll_to_nearest(ScrollDirection::Forward, true);
        }
    }

    /// A finger went down at `point` (viewport coordinates).
    ///
    /// Stops deceleration or animation in place, without end events.
    pub fn pointer_down(&mut self, point: Point, now: u64) {
        if self.torn_down {
            return;
        }
        self.now = now;
        self.tracker.on_down(point, now);
        self.suppress_tap = false;
        if matches!(self.phase, ScrollPhase::Decelerating | ScrollPhase::Animating) {
            self.animation = None;
            self.phase = ScrollPhase::Idle;
            self.suppress_tap = true;
        }
    }

    /// The finger moved to `point`.
    pub fn pointer_move(&mut self, point: Point, now: u64) {
        if self.torn_down {
            return;
        }
        self.now = now;
        match self.tracker.on_move(point, now) {
            DragUpdate::Began => {
                self.phase = ScrollPhase::Dragging;
                self.animation = None;
                self.drag_begin_position = self.position;
                self.drag_start_offset = self.offset;
                self.autoplay.cancel();
                self.emit(CarouselEvent::DragBegin);
            }
            DragUpdate::Moved { translation } => {
                let offset = self.rubber_band(self.drag_start_offset - translation);
                self.apply_offset(offset);
            }
            DragUpdate::Idle | DragUpdate::Pending => {}
        }
    }

    /// The finger lifted at `point`.
    pub fn pointer_up(&mut self, point: Point, now: u64) {
        if self.torn_down {
            return;
        }
        self.now = now;
        match self.tracker.on_up(point, now) {
            Release::Drag { velocity } => self.release(velocity),
            Release::Tap { position } => {
                if self.suppress_tap {
                    self.snap_to_current();
                } else if let Some(hit) = self.engine.position_at_point(self.offset, position) {
                    self.emit(CarouselEvent::ItemTapped { position: hit });
                }
            }
            Release::None => {}
        }
        self.suppress_tap = false;
    }

    /// The press was abandoned; a drag snaps back onto the current item.
    pub fn pointer_cancel(&mut self, now: u64) {
        if self.torn_down {
            return;
        }
        self.now = now;
        if self.tracker.on_cancel() {
            self.release(0.0);
        } else if self.suppress_tap {
            self.snap_to_current();
        }
        self.suppress_tap = false;
    }

    // --- internals ---

    fn emit(&mut self, event: CarouselEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_event(&event);
        }
    }

    fn install_config(&mut self, config: LayoutConfig) {
        match config.validate() {
            Ok(()) => self.config = config,
            Err(err) => {
                if !self.config_warned {
                    warn!(%err, "invalid layout configuration, falling back to a flat layout");
                    self.config_warned = true;
                }
                self.config = LayoutConfig::default();
            }
        }
    }

    fn rebuild_engine(&mut self) {
        self.engine = LayoutEngine::new(self.config.clone(), self.viewport, self.item_count);
        self.invalidation |= Invalidation::LAYOUT;
    }

    fn clear_position(&mut self) {
        self.stop_motion();
        self.autoplay.cancel();
        self.apply_offset(0.0);
        self.position = None;
    }

    fn apply_offset(&mut self, offset: f64) {
        if offset != self.offset {
            self.offset = offset;
            self.invalidation |= Invalidation::TRANSFORMS;
            self.emit(CarouselEvent::ScrollTick { offset });
        }
        self.observe_offset();
    }

    fn observe_offset(&mut self) {
        if !self.did_layout {
            return;
        }
        if self.item_count == 0 {
            self.position = None;
            return;
        }
        let space = self.engine.space();
        let next = space.position_for_offset(self.offset);
        if !space.is_valid(next) {
            return;
        }
        let from = self.current_index().unwrap_or(0);
        self.position = Some(next);
        if from != next.index {
            self.emit(CarouselEvent::IndexChanged {
                from,
                to: next.index,
            });
        }
    }

    fn reset_to_index(&mut self, index: usize) {
        if self.item_count == 0 {
            self.clear_position();
            return;
        }
        let index = if index < self.item_count { index } else { 0 };
        let section = if self.config.infinite_loop {
            RECENTER_SECTION
        } else {
            0
        };
        self.stop_motion();
        let target = self
            .engine
            .space()
            .offset_for_position(VirtualPosition::new(index, section));
        self.apply_offset(target);
    }

    fn recycle(&mut self) {
        if !self.config.infinite_loop {
            return;
        }
        let Some(current) = self.position else {
            return;
        };
        if (RECYCLE_MARGIN..=MAX_SECTIONS - RECYCLE_MARGIN).contains(&current.section) {
            return;
        }
        let recentered = VirtualPosition::new(current.index, RECENTER_SECTION);
        trace!(
            index = current.index,
            from = current.section,
            to = RECENTER_SECTION,
            "recycling section"
        );
        let offset = self.engine.space().offset_for_position(recentered);
        self.apply_offset(offset);
    }

    fn stop_motion(&mut self) {
        self.animation = None;
        if self.phase != ScrollPhase::Dragging {
            self.phase = ScrollPhase::Idle;
        }
    }

    fn finish_motion(&mut self) {
        let phase = self.phase;
        self.animation = None;
        self.phase = ScrollPhase::Idle;
        self.recycle();
        match phase {
            ScrollPhase::Decelerating => self.emit(CarouselEvent::DecelerationEnd),
            ScrollPhase::Animating => self.emit(CarouselEvent::AnimationEnd),
            ScrollPhase::Idle | ScrollPhase::Dragging => {}
        }
        self.ensure_autoplay();
    }

    fn can_autoplay(&self) -> bool {
        !self.torn_down
            && self.attached
            && self.visible
            && self.did_layout
            && self.item_count > 0
            && !self.tracker.is_pressed()
    }

    /// Arms the timer unless it already runs, keeping its cadence.
    fn ensure_autoplay(&mut self) {
        if !self.torn_down && self.attached && self.item_count > 0 && self.autoplay.is_enabled() {
            if !self.autoplay.is_scheduled() {
                self.autoplay.schedule(self.now);
            }
        } else {
            self.autoplay.cancel();
        }
    }

    fn rubber_band(&self, offset: f64) -> f64 {
        let max = self.engine.space().max_offset();
        if offset < 0.0 {
            offset / 2.0
        } else if offset > max {
            max + (offset - max) / 2.0
        } else {
            offset
        }
    }

    fn release(&mut self, velocity: f64) {
        self.phase = ScrollPhase::Idle;
        let begin = self.drag_begin_position.take();
        let Some(current) = self.position else {
            self.emit(CarouselEvent::DragEnd {
                will_decelerate: false,
            });
            self.ensure_autoplay();
            return;
        };
        let space = *self.engine.space();
        let target = if velocity.abs() < SNAP_VELOCITY_THRESHOLD || begin != Some(current) {
            current
        } else {
            let projected = self.offset + velocity * DECELERATION_PROJECTION_MS;
            let backward = (self.offset < 0.0 && projected <= 0.0)
                || (projected < self.offset && self.offset < space.max_offset());
            let direction = if backward {
                ScrollDirection::Backward
            } else {
                ScrollDirection::Forward
            };
            space.nearest_position(current, direction, self.autoplay.is_enabled())
        };
        let target_offset = space.offset_for_position(target);
        let distance = (target_offset - self.offset).abs();
        let will_decelerate = distance > SETTLE_TOLERANCE;
        self.emit(CarouselEvent::DragEnd { will_decelerate });
        self.ensure_autoplay();
        if !will_decelerate {
            self.apply_offset(target_offset);
            self.recycle();
            return;
        }
        let duration = if target == current {
            SCROLL_ANIMATION_MS
        } else {
            fling_duration(distance, velocity)
        };
        self.begin_deceleration(target_offset, duration);
    }

    fn snap_to_current(&mut self) {
        let Some(current) = self.position else {
            return;
        };
        let target = self.engine.space().offset_for_position(current);
        if (target - self.offset).abs() > SETTLE_TOLERANCE {
            self.begin_deceleration(target, SCROLL_ANIMATION_MS);
        } else {
            self.apply_offset(target);
            self.recycle();
            self.ensure_autoplay();
        }
    }

    fn begin_deceleration(&mut self, target: f64, duration_ms: u64) {
        self.animation = Some(OffsetAnimation::new(
            self.offset,
            target,
            self.now,
            duration_ms,
            Easing::EaseOut,
        ));
        self.phase = ScrollPhase::Decelerating;
        self.emit(CarouselEvent::DecelerationBegin);
    }
}

fn has_area(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Duration is clamped to a few hundred milliseconds before the cast"
)]
fn fling_duration(distance: f64, velocity: f64) -> u64 {
    let speed = velocity.abs();
    let ms = if speed > 0.0 {
        (3.0 * distance / speed).clamp(MIN_FLING_MS, MAX_FLING_MS)
    } else {
        MAX_FLING_MS
    };
    ms as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    use crate::TransformKind;

    struct Source {
        count: usize,
        config: LayoutConfig,
    }

    impl Source {
        fn new(count: usize, infinite_loop: bool) -> Self {
            Self {
                count,
                config: LayoutConfig {
                    infinite_loop,
                    ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
                },
            }
        }
    }

    impl CarouselSource for Source {
        fn item_count(&self) -> usize {
            self.count
        }

        fn layout_config(&self) -> LayoutConfig {
            self.config.clone()
        }
    }

    type Log = Rc<RefCell<Vec<CarouselEvent>>>;

    fn carousel(source: &Source) -> (Carousel, Log) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let mut c = Carousel::new();
        c.set_listener(move |e: &CarouselEvent| sink.borrow_mut().push(*e));
        c.set_viewport(Size::new(375.0, 220.0));
        c.reload_data(source);
        log.borrow_mut().clear();
        (c, log)
    }

    fn index_changes(log: &Log) -> Vec<(usize, usize)> {
        log.borrow()
            .iter()
            .filter_map(|e| match *e {
                CarouselEvent::IndexChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    const STRIDE: f64 = 310.0;

    #[test]
    fn first_layout_centers_the_recenter_section() {
        let (c, _) = carousel(&Source::new(5, true));
        assert_eq!(
            c.current_position(),
            Some(VirtualPosition::new(0, RECENTER_SECTION))
        );
        assert_eq!(c.offset(), STRIDE * 330.0 - 5.0 - 32.5);
    }

    #[test]
    fn autoplay_advances_exactly_one_stride() {
        let source = Source::new(5, true);
        let mut c = Carousel::new();
        c.set_viewport(Size::new(375.0, 220.0));
        c.set_autoplay_interval(3_000);
        c.reload_data(&source);
        let start = c.offset();
        assert!(c.autoplay_scheduled());

        c.tick(3_000);
        assert!(c.is_animating());
        c.tick(3_300);
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.offset() - start, STRIDE);
        assert!(c.autoplay_scheduled(), "settling re-arms autoplay");
    }

    #[test]
    fn autoplay_keeps_a_fixed_cadence() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.set_autoplay_interval(3_000);
        let mut starts = Vec::new();
        let mut now = 0;
        while now <= 12_100 {
            c.tick(now);
            let mut events = log.borrow_mut();
            if events.contains(&CarouselEvent::AnimationBegin) {
                starts.push(now);
            }
            events.clear();
            now += 50;
        }
        assert_eq!(starts, [3_000, 6_000, 9_000, 12_000]);
        assert_eq!(c.current_index(), Some(3), "the last scroll has only just started");
    }

    #[test]
    fn autoplay_arms_once_a_deferred_reload_is_laid_out() {
        let mut c = Carousel::new();
        c.set_autoplay_interval(3_000);
        c.reload_data(&Source::new(5, true));
        assert!(!c.autoplay_scheduled());
        c.set_viewport(Size::new(375.0, 220.0));
        assert!(c.autoplay_scheduled());
        c.tick(3_000);
        c.tick(3_300);
        assert_eq!(c.current_index(), Some(1));
    }

    #[test]
    fn slow_drag_at_last_item_snaps_back() {
        let (mut c, log) = carousel(&Source::new(3, false));
        c.scroll_to_index(2, false);
        assert_eq!(c.current_index(), Some(2));
        let max = c.space().max_offset();
        assert_eq!(c.offset(), max);

        c.pointer_down(Point::new(300.0, 100.0), 1_000);
        c.pointer_move(Point::new(280.0, 100.0), 1_100);
        assert!(c.is_dragging());
        c.pointer_move(Point::new(260.0, 100.0), 1_200);
        // Past the trailing edge the content moves at half speed.
        assert_eq!(c.offset(), max + 10.0);
        c.pointer_up(Point::new(260.0, 100.0), 1_300);
        assert!(c.is_decelerating());
        c.tick(1_600);

        assert_eq!(c.current_index(), Some(2));
        assert_eq!(c.offset(), max);
        let events = log.borrow();
        assert!(events.contains(&CarouselEvent::DragBegin));
        assert!(events.contains(&CarouselEvent::DragEnd {
            will_decelerate: true
        }));
        assert_eq!(events.last(), Some(&CarouselEvent::DecelerationEnd));
    }

    #[test]
    fn fast_fling_moves_a_single_item() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.pointer_down(Point::new(300.0, 100.0), 100);
        c.pointer_move(Point::new(250.0, 100.0), 110);
        c.pointer_move(Point::new(200.0, 100.0), 120);
        c.pointer_up(Point::new(150.0, 100.0), 130);
        c.tick(330);
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(index_changes(&log), [(0, 1)]);
        assert_eq!(c.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn backward_fling_wraps_into_the_previous_section() {
        let (mut c, _) = carousel(&Source::new(5, true));
        c.pointer_down(Point::new(100.0, 100.0), 100);
        c.pointer_move(Point::new(150.0, 100.0), 110);
        c.pointer_move(Point::new(160.0, 100.0), 120);
        c.pointer_up(Point::new(200.0, 100.0), 130);
        c.tick(1_000);
        assert_eq!(
            c.current_position(),
            Some(VirtualPosition::new(4, RECENTER_SECTION - 1))
        );
    }

    #[test]
    fn slow_drag_past_an_item_settles_on_it() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.pointer_down(Point::new(300.0, 100.0), 100);
        c.pointer_move(Point::new(280.0, 100.0), 200);
        c.pointer_move(Point::new(80.0, 100.0), 1_000);
        assert_eq!(c.current_index(), Some(1));
        c.pointer_up(Point::new(80.0, 100.0), 1_100);
        c.tick(1_400);
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(index_changes(&log), [(0, 1)]);
    }

    #[test]
    fn scroll_to_index_completes_on_the_requested_item() {
        let (mut c, _) = carousel(&Source::new(5, true));
        let mut now = 0;
        for index in [3, 1, 4, 0, 2] {
            c.scroll_to_index(index, true);
            now += 300;
            c.tick(now);
            assert_eq!(c.current_index(), Some(index));
        }
    }

    #[test]
    fn settling_recycles_without_changing_the_index() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.scroll_to_position(VirtualPosition::new(2, 5), false);
        assert_eq!(
            c.current_position(),
            Some(VirtualPosition::new(2, RECENTER_SECTION))
        );
        c.scroll_to_position(VirtualPosition::new(3, MAX_SECTIONS - 2), true);
        c.tick(300);
        let p = c.current_position().unwrap();
        assert_eq!(p, VirtualPosition::new(3, RECENTER_SECTION));
        assert!((RECYCLE_MARGIN..=MAX_SECTIONS - RECYCLE_MARGIN).contains(&p.section));
        assert_eq!(index_changes(&log), [(0, 2), (2, 3)]);
    }

    #[test]
    fn index_requested_before_layout_is_applied_on_first_layout() {
        let mut c = Carousel::new();
        c.reload_data(&Source::new(5, false));
        c.scroll_to_index(3, false);
        assert_eq!(c.current_index(), None);
        c.set_viewport(Size::new(375.0, 220.0));
        assert_eq!(c.current_index(), Some(3));
    }

    #[test]
    fn reload_resets_or_preserves_the_index() {
        let source = Source::new(5, true);
        let (mut c, _) = carousel(&source);
        c.scroll_to_index(3, false);
        c.reload_data(&source);
        assert_eq!(c.current_index(), Some(0));

        c.scroll_to_index(3, false);
        c.set_reset_index_on_reload(false);
        c.reload_data(&source);
        assert_eq!(c.current_index(), Some(3));

        c.update_data(&Source::new(2, true));
        assert_eq!(c.current_index(), Some(0), "index 3 no longer exists");
    }

    #[test]
    fn empty_data_shows_nothing() {
        let (mut c, _) = carousel(&Source::new(0, true));
        assert_eq!(c.current_position(), None);
        assert!(c.visible_slots().is_empty());
        c.scroll_to_index(0, true);
        c.scroll_to_nearest(ScrollDirection::Forward, true);
        assert_eq!(c.phase(), ScrollPhase::Idle);

        c.update_data(&Source::new(4, true));
        assert_eq!(c.current_index(), Some(0));
        c.update_data(&Source::new(0, true));
        assert_eq!(c.current_index(), None);
    }

    #[test]
    fn invalid_config_falls_back_to_an_empty_flat_layout() {
        let source = Source {
            count: 4,
            config: LayoutConfig {
                transform: TransformKind::Coverflow,
                ..LayoutConfig::new(Size::new(0.0, 200.0), 10.0)
            },
        };
        let (mut c, _) = carousel(&source);
        assert_eq!(c.config(), &LayoutConfig::default());
        assert!(c.visible_slots().is_empty());
        c.reload_data(&source);
        assert_eq!(c.config(), &LayoutConfig::default());
    }

    #[test]
    fn taps_report_the_occurrence_under_the_pointer() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.pointer_down(Point::new(187.5, 100.0), 10);
        c.pointer_up(Point::new(190.0, 100.0), 50);
        assert_eq!(
            log.borrow().as_slice(),
            &[CarouselEvent::ItemTapped {
                position: VirtualPosition::new(0, RECENTER_SECTION)
            }]
        );
    }

    #[test]
    fn touch_stops_an_animation_and_swallows_the_tap() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.tick(1_000);
        c.scroll_to_index(1, true);
        c.tick(1_100);
        c.pointer_down(Point::new(187.5, 100.0), 1_100);
        assert_eq!(c.phase(), ScrollPhase::Idle);
        c.pointer_up(Point::new(187.5, 100.0), 1_150);
        assert!(c.is_decelerating());
        c.tick(1_450);
        let events = log.borrow();
        assert!(!events.iter().any(|e| matches!(e, CarouselEvent::ItemTapped { .. })));
        assert!(!events.contains(&CarouselEvent::AnimationEnd));
        assert_eq!(events.last(), Some(&CarouselEvent::DecelerationEnd));
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn autoplay_waits_for_the_finger_and_for_attachment() {
        let source = Source::new(5, true);
        let (mut c, _) = carousel(&source);
        c.set_autoplay_interval(1_000);
        c.pointer_down(Point::new(100.0, 100.0), 500);
        c.tick(1_000);
        assert_eq!(c.phase(), ScrollPhase::Idle, "no fire while touched");
        c.pointer_up(Point::new(100.0, 100.0), 1_200);

        c.set_attached(false);
        assert!(!c.autoplay_scheduled());
        c.tick(5_000);
        assert_eq!(c.current_index(), Some(0));

        c.set_attached(true);
        c.set_visible(false);
        c.tick(6_000);
        assert_eq!(c.phase(), ScrollPhase::Idle, "no fire while hidden");
        c.set_visible(true);
        c.tick(7_000);
        assert!(c.is_animating());
    }

    #[test]
    fn commands_are_ignored_while_dragging() {
        let (mut c, _) = carousel(&Source::new(5, false));
        c.pointer_down(Point::new(300.0, 100.0), 0);
        c.pointer_move(Point::new(250.0, 100.0), 10);
        c.scroll_to_index(3, true);
        assert!(c.is_dragging());
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn teardown_detaches_everything() {
        let (mut c, log) = carousel(&Source::new(5, true));
        c.set_autoplay_interval(1_000);
        c.teardown();
        assert!(c.is_torn_down());
        assert!(!c.autoplay_scheduled());
        assert_eq!(Rc::strong_count(&log), 1, "listener was dropped");
        c.tick(10_000);
        c.scroll_to_index(2, false);
        assert_eq!(c.current_index(), Some(0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn flat_layout_is_cached_until_the_range_changes() {
        let (mut c, _) = carousel(&Source::new(5, false));
        let before = c.visible_slots().to_vec();
        assert_eq!(before.len(), 2);
        c.pointer_down(Point::new(300.0, 100.0), 0);
        c.pointer_move(Point::new(280.0, 100.0), 10);
        c.pointer_move(Point::new(270.0, 100.0), 20);
        assert_eq!(c.visible_slots(), before.as_slice());
        assert_eq!(c.visible_indices(), [0, 1]);
    }

    #[test]
    fn transformed_layout_follows_the_offset() {
        let source = Source {
            count: 5,
            config: LayoutConfig {
                transform: TransformKind::Linear,
                infinite_loop: true,
                ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
            },
        };
        let (mut c, _) = carousel(&source);
        let centered = c
            .visible_slots()
            .iter()
            .find(|s| s.position.index == 0)
            .map(|s| s.transform);
        assert_eq!(centered, Some(crate::Transform3d::IDENTITY));
        c.scroll_to_position(VirtualPosition::new(1, RECENTER_SECTION), false);
        let moved = c
            .visible_slots()
            .iter()
            .find(|s| s.position.index == 0)
            .map(|s| s.transform);
        assert_ne!(moved, Some(crate::Transform3d::IDENTITY));
        let initial = c
            .initial_attributes(VirtualPosition::new(2, RECENTER_SECTION))
            .map(|a| a.transform);
        assert_eq!(initial, Some(crate::Transform3d::from_scale(0.8, 0.8, 1.0)));
    }
}
