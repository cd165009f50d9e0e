// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page indicator state.

use alloc::vec::Vec;

use kurbo::{Rect, Size};
use tracing::debug;

use crate::shape::Appearance;
use crate::{HorizontalAlignment, IndicatorShape, PageIndicatorStyle, VerticalAlignment};

/// A row of shapes mirroring a page count and a current page.
///
/// Shapes are reused across page count changes: growing appends shapes,
/// shrinking drops them from the end. Changing the current page animates
/// only the previous and the new current shape.
///
/// ```rust
/// use kurbo::Rect;
/// use revolver_page_indicator::{PageIndicator, PageIndicatorStyle};
///
/// let mut indicator = PageIndicator::new(PageIndicatorStyle::default());
/// indicator.set_bounds(Rect::new(0.0, 0.0, 200.0, 20.0));
/// indicator.set_page_count(3);
/// assert_eq!(indicator.shapes().len(), 3);
///
/// indicator.set_current_page(2, true, 1_000);
/// assert!(indicator.tick(1_150), "still animating");
/// assert!(!indicator.tick(1_300));
/// assert_eq!(indicator.shapes()[2].frame().width(), 16.0);
/// ```
#[derive(Clone, Debug)]
pub struct PageIndicator {
    style: PageIndicatorStyle,
    page_count: usize,
    current_page: usize,
    bounds: Rect,
    shapes: Vec<IndicatorShape>,
}

impl PageIndicator {
    /// Creates an indicator with no pages.
    #[must_use]
    pub fn new(style: PageIndicatorStyle) -> Self {
        Self {
            style,
            page_count: 0,
            current_page: 0,
            bounds: Rect::ZERO,
            shapes: Vec::new(),
        }
    }

    /// The style in use.
    #[must_use]
    pub const fn style(&self) -> &PageIndicatorStyle {
        &self.style
    }

    /// Number of pages.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// The current page.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Bounds the row is laid out in.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// One shape per page.
    #[must_use]
    pub fn shapes(&self) -> &[IndicatorShape] {
        &self.shapes
    }

    /// Whether any shape is mid-transition.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.shapes.iter().any(IndicatorShape::is_animating)
    }

    /// Natural size of the row, ignoring alignment and insets.
    #[must_use]
    pub fn content_size(&self) -> Size {
        if self.page_count == 0 {
            return Size::ZERO;
        }
        let style = &self.style;
        let others = (self.page_count - 1) as f64;
        Size::new(
            style.current_page_size.width
                + others * (style.page_size.width + style.page_spacing),
            style.page_size.height.max(style.current_page_size.height),
        )
    }

    /// Replaces the style and lays the row out again without animation.
    pub fn set_style(&mut self, style: PageIndicatorStyle) {
        self.style = style;
        self.apply_layout();
    }

    /// Sets the bounds and lays the row out again without animation.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.apply_layout();
    }

    /// Sets the number of pages.
    ///
    /// Existing shapes are kept; the current page falls back to `0` when it
    /// no longer exists. The new appearance applies immediately.
    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
        if self.current_page >= page_count {
            self.current_page = 0;
        }
        let template = IndicatorShape::new(self.appearance_for(0, Rect::ZERO));
        self.shapes.resize(page_count, template);
        self.apply_layout();
    }

    /// Makes `page` current.
    ///
    /// When `animate` is set, the previous and the new current shape
    /// transition over the style's duration starting at `now_ms`; the other
    /// shapes only move to their new place. Out-of-range pages are ignored.
    pub fn set_current_page(&mut self, page: usize, animate: bool, now_ms: u64) {
        if page >= self.page_count {
            debug!(page, page_count = self.page_count, "ignoring out-of-range page");
            return;
        }
        if page == self.current_page {
            return;
        }
        let previous = self.current_page;
        self.current_page = page;
        if !animate {
            self.apply_layout();
            return;
        }
        let frames = self.frames();
        let duration = self.style.animation_duration_ms;
        for (i, frame) in frames.into_iter().enumerate() {
            let target = self.appearance_for(i, frame);
            let Some(shape) = self.shapes.get_mut(i) else {
                break;
            };
            if i == previous || i == page {
                shape.animate_to(target, now_ms, duration);
            } else {
                shape.set_frame(frame);
            }
        }
    }

    /// Advances transitions to `now_ms`. Returns `true` while any is running.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let mut running = false;
        for shape in &mut self.shapes {
            running |= shape.advance(now_ms, ease_in_out);
        }
        running
    }

    fn appearance_for(&self, page: usize, frame: Rect) -> Appearance {
        let color = if page == self.current_page {
            self.style.current_page_color
        } else {
            self.style.page_color
        };
        Appearance {
            frame,
            corner_radius: frame.height() / 2.0,
            color,
        }
    }

    fn apply_layout(&mut self) {
        let hidden = self.style.hides_for_single_page && self.page_count == 1;
        let frames = self.frames();
        for (i, frame) in frames.into_iter().enumerate() {
            let appearance = self.appearance_for(i, frame);
            if let Some(shape) = self.shapes.get_mut(i) {
                shape.set_appearance(appearance);
                shape.set_hidden(hidden);
            }
        }
    }

    fn frames(&self) -> Vec<Rect> {
        let count = self.page_count;
        if count == 0 {
            return Vec::new();
        }
        let style = &self.style;
        let inset = style.content_inset;
        let area = Rect::new(
            self.bounds.x0 + inset.x0,
            self.bounds.y0 + inset.y0,
            self.bounds.x1 - inset.x1,
            self.bounds.y1 - inset.y1,
        );
        let others = (count - 1) as f64;
        let natural = style.current_page_size.width + others * style.page_size.width;
        let spacing = match style.horizontal_alignment {
            HorizontalAlignment::Fill if count > 1 => (area.width() - natural) / others,
            _ => style.page_spacing,
        };
        let row_width = natural + others * spacing;
        let mut x = match style.horizontal_alignment {
            HorizontalAlignment::Leading | HorizontalAlignment::Fill => area.x0,
            HorizontalAlignment::Center => area.x0 + (area.width() - row_width) / 2.0,
            HorizontalAlignment::Trailing => area.x1 - row_width,
        };
        let mut frames = Vec::with_capacity(count);
        for page in 0..count {
            let size = if page == self.current_page {
                style.current_page_size
            } else {
                style.page_size
            };
            let (y, height) = match style.vertical_alignment {
                VerticalAlignment::Top => (area.y0, size.height),
                VerticalAlignment::Center => {
                    (area.y0 + (area.height() - size.height) / 2.0, size.height)
                }
                VerticalAlignment::Bottom => (area.y1 - size.height, size.height),
                VerticalAlignment::Fill => (area.y0, area.height()),
            };
            frames.push(Rect::new(x, y, x + size.width, y + height));
            x += size.width + spacing;
        }
        frames
    }
}

/// Cubic ease-in-out, the same curve as the carousel's `Easing::EaseInOut`.
///
/// Kept local so the indicator does not depend on `revolver_carousel`.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}
