// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Revolver Carousel: a headless, endlessly scrolling paging carousel.
//!
//! This crate provides the state machine and layout math behind a horizontal
//! banner carousel: a finite sequence of items that can be paged through as if
//! it repeated forever, with optional scale/fade or coverflow transforms and
//! a repeating autoplay timer. It does not draw anything and owns no views.
//!
//! The core concepts are:
//!
//! - [`VirtualPosition`]: an occurrence `(index, section)` of a logical item
//!   in a strip that repeats the sequence [`MAX_SECTIONS`] times when looping.
//! - [`IndexSpace`]: pure functions mapping a scroll offset to the centered
//!   position and back, and stepping to a neighbour.
//! - [`LayoutEngine`]: slot frames, candidate slots for a rectangle and the
//!   per-slot `{frame, alpha, transform}` pipelines selected by
//!   [`TransformKind`]. A host may replace the pipelines with a
//!   [`TransformObserver`].
//! - [`Carousel`]: owns the offset, turns pointer input into drags, snaps and
//!   taps, runs programmatic animations and autoplay, silently recenters the
//!   strip near its ends, and reports [`CarouselEvent`]s.
//! - [`SlotPool`] and [`RealizedSlots`]: identifier-keyed reuse of the host's
//!   per-slot views.
//!
//! Host frameworks are responsible for:
//!
//! - Supplying the item count and [`LayoutConfig`] through a [`CarouselSource`].
//! - Forwarding the viewport size, pointer events and frame timestamps
//!   (milliseconds from any monotonic clock).
//! - Drawing the attributes returned by [`Carousel::visible_slots`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use revolver_carousel::{Carousel, CarouselEvent, CarouselSource, LayoutConfig, TransformKind};
//!
//! struct Source;
//!
//! impl CarouselSource for Source {
//!     fn item_count(&self) -> usize {
//!         3
//!     }
//!
//!     fn layout_config(&self) -> LayoutConfig {
//!         LayoutConfig {
//!             transform: TransformKind::Coverflow,
//!             infinite_loop: true,
//!             ..LayoutConfig::new(Size::new(280.0, 160.0), 8.0)
//!         }
//!     }
//! }
//!
//! let mut carousel = Carousel::new();
//! carousel.set_listener(|event: &CarouselEvent| {
//!     if let CarouselEvent::IndexChanged { to, .. } = event {
//!         // Mirror `to` into a page indicator.
//!         let _ = to;
//!     }
//! });
//! carousel.set_viewport(Size::new(320.0, 180.0));
//! carousel.reload_data(&Source);
//!
//! // A quick swipe to the left pages forward by exactly one item.
//! carousel.pointer_down(Point::new(250.0, 90.0), 0);
//! carousel.pointer_move(Point::new(200.0, 90.0), 16);
//! carousel.pointer_up(Point::new(150.0, 90.0), 32);
//! carousel.tick(1_000);
//! assert_eq!(carousel.current_index(), Some(1));
//!
//! for slot in carousel.visible_slots() {
//!     // Draw `slot.frame` offset by `-carousel.offset()`, with `slot.alpha`
//!     // and `slot.transform` applied about its center.
//!     assert!(slot.transform.is_finite());
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through `tracing`.

#![no_std]

extern crate alloc;

mod animation;
mod autoplay;
mod carousel;
mod config;
mod error;
mod events;
mod gesture;
mod index_space;
mod layout;
mod position;
mod slots;
mod transform;

pub use animation::{Easing, OffsetAnimation};
pub use autoplay::AutoplayTimer;
pub use carousel::{
    Carousel, CarouselSource, DECELERATION_PROJECTION_MS, SCROLL_ANIMATION_MS,
    SNAP_VELOCITY_THRESHOLD, ScrollPhase,
};
pub use config::{LayoutConfig, TransformKind};
pub use error::{ConfigError, SlotError};
pub use events::{CarouselEvent, CarouselListener};
pub use gesture::{DEFAULT_DRAG_SLOP, DragTracker, DragUpdate, Press, Release, VELOCITY_WINDOW_MS};
pub use index_space::IndexSpace;
pub use layout::{
    Invalidation, LayoutEngine, SectionInsets, SlotAttributes, TransformContext,
    TransformObserver,
};
pub use position::{MAX_SECTIONS, RECENTER_SECTION, RECYCLE_MARGIN, ScrollDirection, VirtualPosition};
pub use slots::{PooledSlot, RealizedSlots, SlotPool};
pub use transform::{COVERFLOW_PERSPECTIVE, Transform3d};
