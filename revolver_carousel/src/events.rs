// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications emitted by a [`Carousel`](crate::Carousel).

use crate::VirtualPosition;

/// Something observable happened to a carousel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CarouselEvent {
    /// The scroll offset changed.
    ScrollTick {
        /// New offset.
        offset: f64,
    },
    /// The logical item closest to the viewport center changed.
    IndexChanged {
        /// Previous logical index (`0` when there was none).
        from: usize,
        /// New logical index.
        to: usize,
    },
    /// A press turned into a drag.
    DragBegin,
    /// The finger lifted after a drag.
    DragEnd {
        /// Whether the content keeps moving to snap onto an item.
        will_decelerate: bool,
    },
    /// The content started settling after a drag.
    DecelerationBegin,
    /// The content settled after a drag.
    DecelerationEnd,
    /// A programmatic animated scroll started.
    AnimationBegin,
    /// A programmatic animated scroll finished.
    AnimationEnd,
    /// A slot was tapped.
    ItemTapped {
        /// The occurrence under the pointer.
        position: VirtualPosition,
    },
}

/// Receiver for [`CarouselEvent`]s.
///
/// Closures taking `&CarouselEvent` implement this trait.
pub trait CarouselListener {
    /// Called for every event, in emission order.
    fn on_event(&mut self, event: &CarouselEvent);
}

impl<F: FnMut(&CarouselEvent)> CarouselListener for F {
    fn on_event(&mut self, event: &CarouselEvent) {
        self(event);
    }
}
