// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Revolver Page Indicator: a headless row of page dots.
//!
//! A [`PageIndicator`] keeps one [`IndicatorShape`] per page and lays them
//! out inside its bounds according to a [`PageIndicatorStyle`]. The current
//! page is drawn wider and in its own color; switching pages can animate the
//! two affected shapes while the rest move into place.
//!
//! The crate draws nothing. Hosts read each shape's [`Appearance`] and paint a
//! rounded rectangle with it, and call [`PageIndicator::tick`] every frame
//! while [`PageIndicator::is_animating`] reports a running transition.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use revolver_page_indicator::{HorizontalAlignment, PageIndicator, PageIndicatorStyle};
//!
//! let mut indicator = PageIndicator::new(PageIndicatorStyle {
//!     horizontal_alignment: HorizontalAlignment::Leading,
//!     ..PageIndicatorStyle::default()
//! });
//! indicator.set_bounds(Rect::new(0.0, 0.0, 120.0, 10.0));
//! indicator.set_page_count(4);
//!
//! // Typically driven by a carousel's `IndexChanged { to, .. }` event.
//! indicator.set_current_page(1, false, 0);
//!
//! let shapes = indicator.shapes();
//! assert_eq!(shapes[0].frame(), Rect::new(0.0, 2.0, 6.0, 8.0));
//! assert_eq!(shapes[1].frame(), Rect::new(16.0, 2.0, 32.0, 8.0));
//! for shape in shapes {
//!     let radius = shape.appearance().corner_radius;
//!     assert_eq!(radius, 3.0);
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod indicator;
mod shape;
mod style;

pub use indicator::PageIndicator;
pub use shape::{Appearance, IndicatorShape};
pub use style::{Color, HorizontalAlignment, PageIndicatorStyle, VerticalAlignment};
