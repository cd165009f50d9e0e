// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Appearance and alignment settings.

use kurbo::{Insets, Size};

/// A straight-alpha RGBA color with `f32` components in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from components.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit components.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Linear interpolation between `self` and `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Progress is in 0..=1, well within f32 precision needs"
        )]
        let t = t.clamp(0.0, 1.0) as f32;
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

/// Horizontal placement of the indicator row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HorizontalAlignment {
    /// Against the leading edge.
    Leading,
    /// Centered.
    #[default]
    Center,
    /// Against the trailing edge.
    Trailing,
    /// Spacing is stretched so the row spans the available width.
    Fill,
}

/// Vertical placement of the indicator row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VerticalAlignment {
    /// Against the top edge.
    Top,
    /// Centered.
    #[default]
    Center,
    /// Against the bottom edge.
    Bottom,
    /// Shapes are stretched to the available height.
    Fill,
}

/// How a [`PageIndicator`](crate::PageIndicator) lays out and paints its shapes.
///
/// Corner radii are always half the height of a shape.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageIndicatorStyle {
    /// Gap between neighbouring shapes (ignored by [`HorizontalAlignment::Fill`]).
    pub page_spacing: f64,
    /// Size of a non-current shape.
    pub page_size: Size,
    /// Size of the current shape.
    pub current_page_size: Size,
    /// Color of a non-current shape.
    pub page_color: Color,
    /// Color of the current shape.
    pub current_page_color: Color,
    /// Duration of the current-page transition in milliseconds.
    pub animation_duration_ms: u64,
    /// Horizontal placement.
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical placement.
    pub vertical_alignment: VerticalAlignment,
    /// Insets of the row inside the bounds.
    pub content_inset: Insets,
    /// Hide the only shape when there is a single page.
    pub hides_for_single_page: bool,
}

impl Default for PageIndicatorStyle {
    fn default() -> Self {
        Self {
            page_spacing: 10.0,
            page_size: Size::new(6.0, 6.0),
            current_page_size: Size::new(16.0, 6.0),
            page_color: Color::rgb8(128, 128, 128),
            current_page_color: Color::WHITE,
            animation_duration_ms: 300,
            horizontal_alignment: HorizontalAlignment::Center,
            vertical_alignment: VerticalAlignment::Center,
            content_inset: Insets::ZERO,
            hides_for_single_page: false,
        }
    }
}
