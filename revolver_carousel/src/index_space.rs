// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset <-> virtual position math.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Size;

use crate::layout::SectionInsets;
use crate::{LayoutConfig, MAX_SECTIONS, ScrollDirection, VirtualPosition};

/// Pure mapping between horizontal scroll offsets and virtual positions.
///
/// An `IndexSpace` is a snapshot of everything the mapping depends on: the
/// item count, the viewport width, the item stride and the strip insets. It
/// is cheap to copy and is rebuilt by the carousel whenever one of those
/// inputs changes.
///
/// An offset maps to the item whose center is closest to the viewport
/// center, and a position maps back to the offset that centers it:
///
/// ```rust
/// use kurbo::Size;
/// use revolver_carousel::{IndexSpace, LayoutConfig, VirtualPosition};
///
/// let config = LayoutConfig {
///     infinite_loop: true,
///     ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
/// };
/// let space = IndexSpace::new(&config, Size::new(375.0, 220.0), 5);
///
/// let p = VirtualPosition::new(2, 66);
/// let offset = space.offset_for_position(p);
/// assert_eq!(space.position_for_offset(offset), p);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndexSpace {
    item_count: usize,
    viewport_width: f64,
    item_width: f64,
    spacing: f64,
    leading_inset: f64,
    trailing_inset: f64,
    infinite_loop: bool,
    center_edge_items: bool,
    show_in_center: bool,
}

impl IndexSpace {
    /// Builds the mapping for `item_count` items laid out with `config` inside `viewport`.
    #[must_use]
    pub fn new(config: &LayoutConfig, viewport: Size, item_count: usize) -> Self {
        let insets = SectionInsets::new(config, viewport);
        let (leading_inset, trailing_inset) = if config.infinite_loop {
            (config.section_inset.x0, config.section_inset.x1)
        } else {
            (insets.single.x0, insets.single.x1)
        };
        Self {
            item_count,
            viewport_width: viewport.width,
            item_width: config.item_size.width,
            spacing: config.item_spacing,
            leading_inset,
            trailing_inset,
            infinite_loop: config.infinite_loop,
            center_edge_items: config.center_edge_items,
            show_in_center: config.show_in_center,
        }
    }

    /// Number of logical items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Width of the viewport the mapping was built for.
    #[must_use]
    pub const fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Item width plus spacing.
    #[must_use]
    pub fn item_stride(&self) -> f64 {
        self.item_width + self.spacing
    }

    /// Inset before the first item of the strip.
    #[must_use]
    pub const fn leading_inset(&self) -> f64 {
        self.leading_inset
    }

    /// Inset after the last item of the strip.
    #[must_use]
    pub const fn trailing_inset(&self) -> f64 {
        self.trailing_inset
    }

    /// Whether the sequence repeats.
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        self.infinite_loop
    }

    /// Number of repetitions of the item sequence.
    #[must_use]
    pub const fn section_count(&self) -> usize {
        if self.infinite_loop { MAX_SECTIONS } else { 1 }
    }

    /// Total number of item occurrences in the strip.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.item_count * self.section_count()
    }

    /// Whether `position` addresses an occurrence inside the strip.
    #[must_use]
    pub const fn is_valid(&self, position: VirtualPosition) -> bool {
        position.index < self.item_count && position.section < self.section_count()
    }

    fn is_degenerate(&self) -> bool {
        let stride = self.item_stride();
        self.item_count == 0 || stride.is_nan() || stride <= 0.0
    }

    /// Width of the whole strip including insets. Zero when there are no items.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        if self.item_count == 0 {
            return 0.0;
        }
        self.leading_inset + self.slot_count() as f64 * self.item_stride() - self.spacing
            + self.trailing_inset
    }

    /// Largest offset that keeps the viewport inside the strip.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.content_width() - self.viewport_width).max(0.0)
    }

    /// Position of the item whose center is closest to the viewport center at `offset`.
    ///
    /// Without [`show_in_center`](LayoutConfig::show_in_center), the item
    /// whose leading edge is closest to the alignment line is returned.
    #[must_use]
    pub fn position_for_offset(&self, offset: f64) -> VirtualPosition {
        if self.is_degenerate() {
            return VirtualPosition::ORIGIN;
        }
        let stride = self.item_stride();
        let (along, bias) = if self.show_in_center {
            (
                offset + self.viewport_width / 2.0 - self.leading_inset,
                self.spacing / 2.0,
            )
        } else {
            (offset + self.spacing - self.leading_inset, stride / 2.0)
        };
        if along.is_nan() || along < 0.0 {
            return VirtualPosition::ORIGIN;
        }
        let last = self.slot_count() - 1;
        let slot = ((along + bias) / stride).floor();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Global index is clamped to the strip immediately after the cast"
        )]
        let global = (slot as usize).min(last);
        VirtualPosition::from_global_index(global, self.item_count)
    }

    /// Offset that centers `position` in the viewport.
    ///
    /// Without looping and without edge centering, the last item is aligned
    /// with the trailing edge instead. Without
    /// [`show_in_center`](LayoutConfig::show_in_center), other items sit one
    /// spacing away from the leading edge. The result is never negative.
    #[must_use]
    pub fn offset_for_position(&self, position: VirtualPosition) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let stride = self.item_stride();
        let start = self.leading_inset + stride * position.global_index(self.item_count) as f64;
        let offset = if !self.infinite_loop
            && !self.center_edge_items
            && position.index == self.item_count - 1
        {
            start - (self.viewport_width - stride) - self.spacing + self.trailing_inset
        } else if self.show_in_center {
            start - self.spacing / 2.0 - (self.viewport_width - stride) / 2.0
        } else {
            start - self.spacing
        };
        offset.max(0.0)
    }

    /// Neighbour of `current` one item away in `direction`.
    ///
    /// When looping, the index carries into or borrows from the section and
    /// stops at the buffer edges. Otherwise the index stops at `0` and
    /// `item_count - 1`, unless `wrap_at_edges` is set, in which case it wraps
    /// to the opposite end. Invalid positions are returned unchanged.
    #[must_use]
    pub fn nearest_position(
        &self,
        current: VirtualPosition,
        direction: ScrollDirection,
        wrap_at_edges: bool,
    ) -> VirtualPosition {
        if !self.is_valid(current) {
            return current;
        }
        let VirtualPosition { index, section } = current;
        let last_index = self.item_count - 1;
        match (direction, self.infinite_loop) {
            (ScrollDirection::Forward, true) => {
                if index < last_index {
                    VirtualPosition::new(index + 1, section)
                } else if section + 1 < self.section_count() {
                    VirtualPosition::new(0, section + 1)
                } else {
                    current
                }
            }
            (ScrollDirection::Backward, true) => {
                if index > 0 {
                    VirtualPosition::new(index - 1, section)
                } else if section > 0 {
                    VirtualPosition::new(last_index, section - 1)
                } else {
                    current
                }
            }
            (ScrollDirection::Forward, false) => {
                if index < last_index {
                    VirtualPosition::new(index + 1, 0)
                } else if wrap_at_edges {
                    VirtualPosition::ORIGIN
                } else {
                    current
                }
            }
            (ScrollDirection::Backward, false) => {
                if index > 0 {
                    VirtualPosition::new(index - 1, 0)
                } else if wrap_at_edges {
                    VirtualPosition::new(last_index, 0)
                } else {
                    current
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RECENTER_SECTION, RECYCLE_MARGIN};

    fn config(infinite_loop: bool) -> LayoutConfig {
        LayoutConfig {
            infinite_loop,
            ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
        }
    }

    fn space(infinite_loop: bool, count: usize) -> IndexSpace {
        IndexSpace::new(&config(infinite_loop), Size::new(375.0, 220.0), count)
    }

    #[test]
    fn round_trip_over_the_recycling_window() {
        let s = space(true, 5);
        for section in RECYCLE_MARGIN..=(MAX_SECTIONS - RECYCLE_MARGIN) {
            for index in 0..5 {
                let p = VirtualPosition::new(index, section);
                assert_eq!(s.position_for_offset(s.offset_for_position(p)), p);
            }
        }
    }

    #[test]
    fn round_trip_without_looping() {
        let s = space(false, 3);
        for index in 1..3 {
            let p = VirtualPosition::new(index, 0);
            assert_eq!(s.position_for_offset(s.offset_for_position(p)), p);
        }
        // The first item would need a negative offset to be centered.
        assert_eq!(s.offset_for_position(VirtualPosition::ORIGIN), 0.0);
    }

    #[test]
    fn centered_offset_matches_stride() {
        let s = space(true, 5);
        let a = s.offset_for_position(VirtualPosition::new(0, RECENTER_SECTION));
        let b = s.offset_for_position(VirtualPosition::new(1, RECENTER_SECTION));
        assert_eq!(b - a, 310.0);
        // 66 sections of 5 items, minus half the spacing, minus (375 - 310) / 2.
        assert_eq!(a, 310.0 * 330.0 - 5.0 - 32.5);
    }

    #[test]
    fn leading_alignment_round_trips() {
        let config_loop = LayoutConfig {
            show_in_center: false,
            ..config(true)
        };
        let s = IndexSpace::new(&config_loop, Size::new(375.0, 220.0), 5);
        let p = VirtualPosition::new(1, RECENTER_SECTION);
        assert_eq!(s.offset_for_position(p), 310.0 * 331.0 - 10.0);
        for section in RECYCLE_MARGIN..=(MAX_SECTIONS - RECYCLE_MARGIN) {
            for index in 0..5 {
                let p = VirtualPosition::new(index, section);
                assert_eq!(s.position_for_offset(s.offset_for_position(p)), p);
            }
        }

        let config = LayoutConfig {
            show_in_center: false,
            ..config(false)
        };
        let s = IndexSpace::new(&config, Size::new(375.0, 220.0), 3);
        for index in 0..3 {
            let p = VirtualPosition::new(index, 0);
            assert_eq!(s.position_for_offset(s.offset_for_position(p)), p);
        }
        assert_eq!(
            s.offset_for_position(VirtualPosition::new(2, 0)),
            s.max_offset(),
            "the last item still aligns with the trailing edge"
        );
    }

    #[test]
    fn last_item_is_right_aligned_without_looping() {
        let s = space(false, 3);
        let last = s.offset_for_position(VirtualPosition::new(2, 0));
        assert_eq!(last, s.max_offset());
        assert_eq!(s.content_width(), 3.0 * 310.0 - 10.0);
    }

    #[test]
    fn edge_centering_insets_the_strip() {
        let cfg = LayoutConfig {
            center_edge_items: true,
            ..config(false)
        };
        let s = IndexSpace::new(&cfg, Size::new(400.0, 220.0), 3);
        assert_eq!(s.leading_inset(), 50.0);
        assert_eq!(s.trailing_inset(), 50.0);
        let first = s.offset_for_position(VirtualPosition::ORIGIN);
        let last = s.offset_for_position(VirtualPosition::new(2, 0));
        assert_eq!(first, 0.0);
        assert_eq!(last, s.max_offset());
    }

    #[test]
    fn offsets_clamp_to_the_strip() {
        let s = space(true, 5);
        assert_eq!(s.position_for_offset(-1_000.0), VirtualPosition::ORIGIN);
        assert_eq!(
            s.position_for_offset(1.0e12),
            VirtualPosition::new(4, MAX_SECTIONS - 1)
        );
        let s = space(false, 3);
        assert_eq!(s.position_for_offset(1.0e9), VirtualPosition::new(2, 0));
    }

    #[test]
    fn degenerate_inputs_map_to_origin() {
        let s = space(true, 0);
        assert_eq!(s.position_for_offset(500.0), VirtualPosition::ORIGIN);
        assert_eq!(s.offset_for_position(VirtualPosition::new(1, 1)), 0.0);
        assert_eq!(s.content_width(), 0.0);

        let s = IndexSpace::new(&LayoutConfig::default(), Size::new(375.0, 220.0), 4);
        assert_eq!(s.position_for_offset(500.0), VirtualPosition::ORIGIN);
        assert_eq!(s.offset_for_position(VirtualPosition::new(2, 0)), 0.0);
    }

    #[test]
    fn nearest_carries_across_sections() {
        let s = space(true, 5);
        let fwd = s.nearest_position(VirtualPosition::new(4, 10), ScrollDirection::Forward, false);
        assert_eq!(fwd, VirtualPosition::new(0, 11));
        let back = s.nearest_position(VirtualPosition::new(0, 10), ScrollDirection::Backward, false);
        assert_eq!(back, VirtualPosition::new(4, 9));
        let edge = VirtualPosition::new(4, MAX_SECTIONS - 1);
        assert_eq!(s.nearest_position(edge, ScrollDirection::Forward, true), edge);
        assert_eq!(
            s.nearest_position(VirtualPosition::ORIGIN, ScrollDirection::Backward, true),
            VirtualPosition::ORIGIN
        );
    }

    #[test]
    fn nearest_clamps_or_wraps_without_looping() {
        let s = space(false, 3);
        let last = VirtualPosition::new(2, 0);
        assert_eq!(s.nearest_position(last, ScrollDirection::Forward, false), last);
        assert_eq!(
            s.nearest_position(last, ScrollDirection::Forward, true),
            VirtualPosition::ORIGIN
        );
        assert_eq!(
            s.nearest_position(VirtualPosition::ORIGIN, ScrollDirection::Backward, true),
            last
        );
        assert_eq!(
            s.nearest_position(VirtualPosition::ORIGIN, ScrollDirection::Backward, false),
            VirtualPosition::ORIGIN
        );
    }

    #[test]
    fn invalid_positions_are_returned_unchanged() {
        let s = space(false, 3);
        let bogus = VirtualPosition::new(7, 0);
        assert!(!s.is_valid(bogus));
        assert_eq!(s.nearest_position(bogus, ScrollDirection::Forward, true), bogus);
    }
}
