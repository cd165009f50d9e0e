// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot frames and per-slot transforms.

use alloc::vec::Vec;
use core::f64::consts::PI;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Insets, Point, Rect, Size};

use crate::transform::COVERFLOW_PERSPECTIVE;
use crate::{IndexSpace, LayoutConfig, Transform3d, TransformKind, VirtualPosition};

/// Width multiplier for the linear spacing adjustment.
const LINEAR_SPACING_FACTOR: f64 = 1.15;

/// Angle multiplier for the coverflow spacing adjustment.
const COVERFLOW_SPACING_FACTOR: f64 = 1.2;

/// Slots closer than this to the viewport center count as centered.
const CENTER_TOLERANCE: f64 = 0.5;

bitflags::bitflags! {
    /// Parts of a cached layout that must be recomputed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// Geometry changed: config, viewport or item count.
        const LAYOUT     = 0b0000_0001;
        /// The offset moved; transformed pipelines need new attributes.
        const TRANSFORMS = 0b0000_0010;
    }
}

/// Insets of the item strip for each kind of section.
///
/// `x0`/`x1` are the leading and trailing insets, `y0`/`y1` the top and
/// bottom ones. Neighbouring sections are separated by exactly one spacing,
/// so the strip is continuous across section boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionInsets {
    /// The only section when not looping.
    pub single: Insets,
    /// First section of a looping strip.
    pub first: Insets,
    /// Interior sections of a looping strip.
    pub middle: Insets,
    /// Last section of a looping strip.
    pub last: Insets,
}

impl SectionInsets {
    /// Derives the insets from `config` for a viewport of the given size.
    #[must_use]
    pub fn new(config: &LayoutConfig, viewport: Size) -> Self {
        let base = config.section_inset;
        let (top, bottom) = if config.center_vertically {
            let v = ((viewport.height - config.item_size.height) / 2.0).max(0.0);
            (v, v)
        } else {
            (base.y0, base.y1)
        };
        let (single_leading, single_trailing) =
            if !config.infinite_loop && config.center_edge_items {
                let h = ((viewport.width - config.item_size.width) / 2.0).max(0.0);
                (h, h)
            } else {
                (base.x0, base.x1)
            };
        let spacing = config.item_spacing;
        Self {
            single: Insets::new(single_leading, top, single_trailing, bottom),
            first: Insets::new(base.x0, top, spacing, bottom),
            middle: Insets::new(0.0, top, spacing, bottom),
            last: Insets::new(0.0, top, base.x1, bottom),
        }
    }

    /// Insets for `section` out of `section_count`.
    #[must_use]
    pub fn for_section(&self, section: usize, section_count: usize) -> Insets {
        if section_count <= 1 {
            self.single
        } else if section == 0 {
            self.first
        } else if section + 1 == section_count {
            self.last
        } else {
            self.middle
        }
    }
}

/// Geometry and appearance of one realized slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotAttributes {
    /// Which occurrence this slot shows.
    pub position: VirtualPosition,
    /// Untransformed frame in content coordinates.
    pub frame: Rect,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f64,
    /// Transform applied about the frame's center.
    pub transform: Transform3d,
}

impl SlotAttributes {
    /// Flat attributes for `frame`.
    #[must_use]
    pub const fn flat(position: VirtualPosition, frame: Rect) -> Self {
        Self {
            position,
            frame,
            alpha: 1.0,
            transform: Transform3d::IDENTITY,
        }
    }
}

/// What a [`TransformObserver`] may look at when computing attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformContext {
    /// Current horizontal scroll offset.
    pub offset: f64,
    /// Size of the viewport.
    pub viewport: Size,
    /// Configured item size.
    pub item_size: Size,
}

impl TransformContext {
    /// Signed horizontal distance from the viewport center to the center of `frame`.
    #[must_use]
    pub fn distance_from_center(&self, frame: Rect) -> f64 {
        frame.center().x - (self.offset + self.viewport.width / 2.0)
    }
}

/// Host-supplied replacement for the built-in transform pipelines.
///
/// Once installed on a carousel, the observer is consulted for every visible
/// slot on every offset change, whatever the configured [`TransformKind`].
/// Both methods default to leaving the flat attributes untouched.
pub trait TransformObserver {
    /// Adjusts the attributes of a slot that is about to appear.
    fn initialize_attributes(&self, attributes: &mut SlotAttributes) {
        let _ = attributes;
    }

    /// Adjusts the attributes of a visible slot.
    fn apply_attributes(&self, attributes: &mut SlotAttributes, context: &TransformContext) {
        let _ = (attributes, context);
    }
}

/// Computes slot frames and attributes for a fixed configuration, viewport and item count.
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use revolver_carousel::{LayoutConfig, LayoutEngine, TransformKind};
///
/// let config = LayoutConfig {
///     transform: TransformKind::Linear,
///     ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
/// };
/// let engine = LayoutEngine::new(config, Size::new(375.0, 200.0), 4);
/// assert_eq!(engine.slot_frame(1), Rect::new(310.0, 0.0, 610.0, 200.0));
///
/// let slots = engine.layout(0.0, 0.0, None);
/// assert_eq!(slots.len(), 2);
/// assert!(slots[1].alpha <= 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    viewport: Size,
    space: IndexSpace,
    insets: SectionInsets,
}

impl LayoutEngine {
    /// Creates an engine for `item_count` items.
    #[must_use]
    pub fn new(config: LayoutConfig, viewport: Size, item_count: usize) -> Self {
        let space = IndexSpace::new(&config, viewport, item_count);
        let insets = SectionInsets::new(&config, viewport);
        Self {
            config,
            viewport,
            space,
            insets,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The viewport size in use.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// The offset/position mapping.
    #[must_use]
    pub const fn space(&self) -> &IndexSpace {
        &self.space
    }

    /// The section insets.
    #[must_use]
    pub const fn insets(&self) -> &SectionInsets {
        &self.insets
    }

    /// Size of the scrollable content.
    #[must_use]
    pub fn content_size(&self) -> Size {
        Size::new(self.space.content_width(), self.viewport.height)
    }

    /// Flat frame of the occurrence at global index `global`.
    #[must_use]
    pub fn slot_frame(&self, global: usize) -> Rect {
        let x = self.space.leading_inset() + self.space.item_stride() * global as f64;
        Rect::from_origin_size(Point::new(x, self.insets.single.y0), self.config.item_size)
    }

    /// Global indices whose flat frames horizontally intersect `rect`.
    #[must_use]
    pub fn candidate_range(&self, rect: Rect) -> Range<usize> {
        let count = self.space.slot_count();
        let stride = self.space.item_stride();
        let span = rect.width();
        if count == 0 || stride.is_nan() || stride <= 0.0 || span.is_nan() || span <= 0.0 {
            return 0..0;
        }
        let leading = self.space.leading_inset();
        let width = self.config.item_size.width;
        let to_index = |v: f64| -> usize {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Index is clamped to the slot count immediately after the cast"
                )]
                let i = v as usize;
                i.min(count)
            }
        };
        let start = to_index(((rect.x0 - leading - width) / stride).floor() + 1.0);
        let end = to_index(((rect.x1 - leading) / stride).ceil());
        start..end.max(start)
    }

    /// The visible rectangle at `offset`, in content coordinates.
    #[must_use]
    pub fn visible_rect(&self, offset: f64) -> Rect {
        Rect::from_origin_size(Point::new(offset, 0.0), self.viewport)
    }

    /// Global indices to realize at `offset`, widened by `overscan` on both sides.
    #[must_use]
    pub fn realized_range(&self, offset: f64, overscan: f64) -> Range<usize> {
        let visible = self.visible_rect(offset);
        self.candidate_range(visible.inflate(overscan.max(0.0), 0.0))
    }

    /// Whether attributes depend on the offset.
    #[must_use]
    pub fn is_transformed(&self, observer: Option<&dyn TransformObserver>) -> bool {
        observer.is_some() || self.config.transform != TransformKind::Normal
    }

    /// Attributes for every slot to realize at `offset`.
    ///
    /// Slots outside the visible rectangle (overscan) stay flat; visible ones
    /// go through `observer` when one is given, otherwise through the
    /// configured pipeline.
    #[must_use]
    pub fn layout(
        &self,
        offset: f64,
        overscan: f64,
        observer: Option<&dyn TransformObserver>,
    ) -> Vec<SlotAttributes> {
        let visible = self.candidate_range(self.visible_rect(offset));
        let context = TransformContext {
            offset,
            viewport: self.viewport,
            item_size: self.config.item_size,
        };
        self.realized_range(offset, overscan)
            .map(|global| {
                let mut attributes = self.flat_attributes(global);
                if visible.contains(&global) {
                    match observer {
                        Some(observer) => observer.apply_attributes(&mut attributes, &context),
                        None => self.apply_builtin(&mut attributes, &context),
                    }
                }
                attributes
            })
            .collect()
    }

    /// Attributes for the occurrence at `global` before any transform.
    #[must_use]
    pub fn flat_attributes(&self, global: usize) -> SlotAttributes {
        let position = VirtualPosition::from_global_index(global, self.space.item_count());
        SlotAttributes::flat(position, self.slot_frame(global))
    }

    /// Attributes for a slot that is about to appear.
    #[must_use]
    pub fn initial_attributes(
        &self,
        global: usize,
        observer: Option<&dyn TransformObserver>,
    ) -> SlotAttributes {
        let mut attributes = self.flat_attributes(global);
        if let Some(observer) = observer {
            observer.initialize_attributes(&mut attributes);
            return attributes;
        }
        let config = &self.config;
        match config.transform {
            TransformKind::Normal => {}
            TransformKind::Linear => {
                let s = config.minimum_scale;
                attributes.transform = Transform3d::from_scale(s, s, 1.0);
                attributes.alpha = config.minimum_alpha;
            }
            TransformKind::Coverflow => {
                attributes.transform = Transform3d::from_perspective(COVERFLOW_PERSPECTIVE)
                    * Transform3d::from_rotation_y(PI * config.maximum_angle);
                attributes.alpha = config.minimum_alpha;
            }
        }
        attributes
    }

    /// The occurrence whose flat frame contains `point` (viewport coordinates) at `offset`.
    #[must_use]
    pub fn position_at_point(&self, offset: f64, point: Point) -> Option<VirtualPosition> {
        let content = Point::new(point.x + offset, point.y);
        let probe = Rect::new(content.x - 0.5, content.y, content.x + 0.5, content.y + 1.0);
        self.candidate_range(probe)
            .map(|global| self.flat_attributes(global))
            .find(|attributes| attributes.frame.contains(content))
            .map(|attributes| attributes.position)
    }

    fn apply_builtin(&self, attributes: &mut SlotAttributes, context: &TransformContext) {
        let config = &self.config;
        let delta = context.distance_from_center(attributes.frame);
        let centered = delta.abs() < CENTER_TOLERANCE;
        let ratio = if context.viewport.width > 0.0 {
            delta.abs() / context.viewport.width
        } else {
            0.0
        };
        let alpha = if centered {
            1.0
        } else {
            (1.0 - ratio).max(config.minimum_alpha).min(1.0)
        };
        let width = config.item_size.width;
        match config.transform {
            TransformKind::Normal => {}
            TransformKind::Linear => {
                attributes.alpha = alpha;
                if centered {
                    attributes.transform = Transform3d::IDENTITY;
                    return;
                }
                let scale = (1.0 - ratio * config.rate_of_change).max(config.minimum_scale);
                let mut transform = Transform3d::from_scale(scale, scale, 1.0);
                if config.adjust_spacing_while_scrolling {
                    let shift = LINEAR_SPACING_FACTOR * width * (1.0 - scale) / 2.0;
                    let tx = if delta > 0.0 { -shift } else { shift };
                    transform = transform * Transform3d::from_translation(tx, 0.0, 0.0);
                }
                attributes.transform = transform;
            }
            TransformKind::Coverflow => {
                attributes.alpha = alpha;
                let perspective = Transform3d::from_perspective(COVERFLOW_PERSPECTIVE);
                if centered {
                    attributes.transform = perspective;
                    return;
                }
                let angle = (ratio * (1.0 - config.rate_of_change)).min(config.maximum_angle);
                // Left of center turns towards +angle and shifts right.
                let sign = if delta < 0.0 { 1.0 } else { -1.0 };
                let mut transform = perspective * Transform3d::from_rotation_y(sign * PI * angle);
                if config.adjust_spacing_while_scrolling {
                    let shift = (1.0 - (COVERFLOW_SPACING_FACTOR * PI * angle).cos()) * width;
                    transform = transform * Transform3d::from_translation(sign * shift, 0.0, 0.0);
                }
                attributes.transform = transform;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    fn engine(kind: TransformKind, infinite_loop: bool, count: usize) -> LayoutEngine {
        let config = LayoutConfig {
            transform: kind,
            infinite_loop,
            ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
        };
        LayoutEngine::new(config, Size::new(375.0, 220.0), count)
    }

    #[test]
    fn section_insets_tile_the_strip() {
        let config = LayoutConfig {
            section_inset: Insets::new(20.0, 4.0, 30.0, 6.0),
            infinite_loop: true,
            center_vertically: false,
            ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
        };
        let insets = SectionInsets::new(&config, Size::new(375.0, 220.0));
        assert_eq!(insets.first, Insets::new(20.0, 4.0, 10.0, 6.0));
        assert_eq!(insets.middle, Insets::new(0.0, 4.0, 10.0, 6.0));
        assert_eq!(insets.last, Insets::new(0.0, 4.0, 30.0, 6.0));
        assert_eq!(insets.for_section(0, 200), insets.first);
        assert_eq!(insets.for_section(100, 200), insets.middle);
        assert_eq!(insets.for_section(199, 200), insets.last);
        assert_eq!(insets.for_section(0, 1), insets.single);
    }

    #[test]
    fn items_are_centered_vertically() {
        let e = engine(TransformKind::Normal, false, 3);
        assert_eq!(e.slot_frame(0), Rect::new(0.0, 10.0, 300.0, 210.0));
    }

    #[test]
    fn candidates_intersect_strictly() {
        let e = engine(TransformKind::Normal, false, 5);
        // [0, 300) and [310, 610) are the first two frames.
        assert_eq!(e.candidate_range(Rect::new(0.0, 0.0, 310.0, 10.0)), 0..1);
        assert_eq!(e.candidate_range(Rect::new(300.0, 0.0, 311.0, 10.0)), 1..2);
        assert_eq!(e.candidate_range(Rect::new(299.0, 0.0, 311.0, 10.0)), 0..2);
        assert_eq!(e.candidate_range(Rect::new(-50.0, 0.0, -1.0, 10.0)), 0..0);
        assert_eq!(e.candidate_range(Rect::new(0.0, 0.0, 1.0e6, 10.0)), 0..5);
    }

    #[test]
    fn overscan_slots_stay_flat() {
        let e = engine(TransformKind::Linear, false, 5);
        let slots = e.layout(0.0, 400.0, None);
        assert_eq!(slots.len(), 3);
        assert!(!slots[1].transform.is_identity(), "partially visible slot is scaled");
        assert!(slots[2].transform.is_identity(), "overscan slot stays flat");
    }

    #[test]
    fn centered_linear_slot_is_untouched() {
        let e = engine(TransformKind::Linear, true, 5);
        let p = VirtualPosition::new(2, 66);
        let offset = e.space().offset_for_position(p);
        let slots = e.layout(offset, 0.0, None);
        let centered = slots
            .iter()
            .find(|s| s.position == p)
            .map(|s| (s.alpha, s.transform));
        assert_eq!(centered, Some((1.0, Transform3d::IDENTITY)));
        for slot in slots.iter().filter(|s| s.position != p) {
            let scale = slot.transform.cols[0][0];
            assert!(scale < 1.0 && scale >= 0.8, "neighbour is scaled down");
        }
    }

    #[test]
    fn linear_neighbours_move_towards_the_center() {
        let e = engine(TransformKind::Linear, true, 5);
        let p = VirtualPosition::new(2, 66);
        let offset = e.space().offset_for_position(p);
        let slots = e.layout(offset, 0.0, None);
        for slot in &slots {
            let (tx, _, _) = slot.transform.translation();
            if slot.position.index == 1 {
                assert!(tx > 0.0, "left neighbour shifts right");
            } else if slot.position.index == 3 {
                assert!(tx < 0.0, "right neighbour shifts left");
            }
        }
    }

    #[test]
    fn coverflow_rotates_away_from_the_center() {
        let e = engine(TransformKind::Coverflow, true, 5);
        let p = VirtualPosition::new(2, 66);
        let offset = e.space().offset_for_position(p);
        let slots = e.layout(offset, 0.0, None);
        for slot in &slots {
            if slot.position == p {
                assert_eq!(slot.transform, Transform3d::from_perspective(COVERFLOW_PERSPECTIVE));
            } else if slot.position.index == 1 {
                assert!(slot.transform.cols[0][2] < 0.0, "left neighbour turns positive");
            } else if slot.position.index == 3 {
                assert!(slot.transform.cols[0][2] > 0.0, "right neighbour turns negative");
            }
        }
    }

    #[test]
    fn coverflow_angle_is_bounded() {
        let e = engine(TransformKind::Coverflow, true, 5);
        let offset = e.space().offset_for_position(VirtualPosition::new(2, 66));
        let max_sin = (PI * 0.2).sin() + 1e-9;
        for slot in e.layout(offset, 0.0, None) {
            assert!(slot.transform.cols[0][2].abs() <= max_sin, "angle stays below the maximum");
        }
    }

    #[test]
    fn initial_attributes_follow_the_pipeline() {
        let linear = engine(TransformKind::Linear, true, 5).initial_attributes(3, None);
        assert_eq!(linear.transform, Transform3d::from_scale(0.8, 0.8, 1.0));
        assert_eq!(linear.alpha, 1.0);

        let normal = engine(TransformKind::Normal, true, 5).initial_attributes(3, None);
        assert!(normal.transform.is_identity());

        let config = LayoutConfig {
            transform: TransformKind::Coverflow,
            minimum_alpha: 0.4,
            maximum_angle: 0.25,
            ..LayoutConfig::new(Size::new(300.0, 200.0), 10.0)
        };
        let coverflow =
            LayoutEngine::new(config, Size::new(375.0, 220.0), 5).initial_attributes(1, None);
        assert_eq!(coverflow.alpha, 0.4);
        assert_eq!(
            coverflow.transform,
            Transform3d::from_perspective(COVERFLOW_PERSPECTIVE)
                * Transform3d::from_rotation_y(PI / 4.0)
        );
        let [xx, ..] = coverflow.transform.to_affine().as_coeffs();
        assert!((xx - core::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(coverflow.frame, engine(TransformKind::Normal, false, 5).slot_frame(1));
    }

    struct Fade {
        calls: Cell<usize>,
    }

    impl TransformObserver for Fade {
        fn apply_attributes(&self, attributes: &mut SlotAttributes, _: &TransformContext) {
            self.calls.set(self.calls.get() + 1);
            attributes.alpha = 0.5;
        }
    }

    #[test]
    fn observer_replaces_the_builtin_pipelines() {
        let e = engine(TransformKind::Normal, false, 5);
        let fade = Fade {
            calls: Cell::new(0),
        };
        assert!(e.is_transformed(Some(&fade)));
        let slots = e.layout(0.0, 0.0, Some(&fade));
        assert_eq!(fade.calls.get(), slots.len());
        assert!(slots.iter().all(|s| s.alpha == 0.5 && s.transform.is_identity()));

        struct Nothing;
        impl TransformObserver for Nothing {}
        let initial = engine(TransformKind::Linear, false, 5).initial_attributes(0, Some(&Nothing));
        assert!(initial.transform.is_identity());
    }

    #[test]
    fn taps_hit_flat_frames() {
        let e = engine(TransformKind::Normal, false, 5);
        assert_eq!(
            e.position_at_point(300.0, Point::new(20.0, 100.0)),
            Some(VirtualPosition::new(1, 0))
        );
        // Inside the spacing.
        assert_eq!(e.position_at_point(0.0, Point::new(305.0, 100.0)), None);
        // Below the item.
        assert_eq!(e.position_at_point(0.0, Point::new(10.0, 215.0)), None);
    }

    #[test]
    fn empty_layout() {
        let e = engine(TransformKind::Coverflow, true, 0);
        assert!(e.layout(0.0, 100.0, None).is_empty());
        assert_eq!(e.content_size(), Size::new(0.0, 220.0));
    }
}
