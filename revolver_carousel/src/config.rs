// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration supplied by the host.

use kurbo::{Insets, Size};

use crate::ConfigError;

/// Per-slot visual effect applied based on the distance from the viewport center.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransformKind {
    /// Flat layout; slots are never scaled, faded or rotated.
    #[default]
    Normal,
    /// Scale and fade slots linearly with their distance from the center.
    Linear,
    /// Rotate slots about the vertical axis with a perspective projection.
    Coverflow,
}

/// Geometry and transform settings for a carousel.
///
/// A configuration is immutable for the duration of a layout pass and is
/// replaced wholesale when the host reloads the carousel.
///
/// ```rust
/// use kurbo::Size;
/// use revolver_carousel::{LayoutConfig, TransformKind};
///
/// let config = LayoutConfig {
///     transform: TransformKind::Linear,
///     infinite_loop: true,
///     ..LayoutConfig::new(Size::new(240.0, 160.0), 12.0)
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.item_stride(), 252.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Size of every item.
    pub item_size: Size,
    /// Distance between two neighbouring items.
    pub item_spacing: f64,
    /// Base insets around the item strip (`x0` leading, `y0` top, `x1` trailing, `y1` bottom).
    pub section_inset: Insets,
    /// Visual effect applied to slots.
    pub transform: TransformKind,
    /// Lower bound for the linear scale.
    pub minimum_scale: f64,
    /// Lower bound for the opacity of off-center slots.
    pub minimum_alpha: f64,
    /// Upper bound for the coverflow rotation, as a fraction of a half turn.
    pub maximum_angle: f64,
    /// How quickly scale and angle change with the distance from the center.
    pub rate_of_change: f64,
    /// Translate transformed slots so that they keep looking adjacent.
    pub adjust_spacing_while_scrolling: bool,
    /// Repeat the item sequence so it can be scrolled endlessly.
    pub infinite_loop: bool,
    /// Center items vertically in the viewport instead of using the top/bottom insets.
    pub center_vertically: bool,
    /// Without looping, inset the strip so the first and last item can be centered.
    pub center_edge_items: bool,
    /// Snap the current item to the viewport center. When unset, the current
    /// item is aligned one spacing away from the leading edge instead.
    pub show_in_center: bool,
}

impl LayoutConfig {
    /// Creates a configuration with the given item size and spacing and defaults elsewhere.
    #[must_use]
    pub fn new(item_size: Size, item_spacing: f64) -> Self {
        Self {
            item_size,
            item_spacing,
            ..Self::default()
        }
    }

    /// Item width plus spacing: the distance between two item centers.
    #[must_use]
    pub fn item_stride(&self) -> f64 {
        self.item_size.width + self.item_spacing
    }

    /// Checks that the configuration can drive a layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Size { width, height } = self.item_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidItemSize { width, height });
        }
        if !self.item_spacing.is_finite() || self.item_spacing < 0.0 {
            return Err(ConfigError::InvalidSpacing(self.item_spacing));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_size: Size::ZERO,
            item_spacing: 0.0,
            section_inset: Insets::ZERO,
            transform: TransformKind::Normal,
            minimum_scale: 0.8,
            minimum_alpha: 1.0,
            maximum_angle: 0.2,
            rate_of_change: 0.4,
            adjust_spacing_while_scrolling: true,
            infinite_loop: false,
            center_vertically: true,
            center_edge_items: false,
            show_in_center: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_degenerate() {
        let config = LayoutConfig::default();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidItemSize {
                width: 0.0,
                height: 0.0
            })
        );
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let config = LayoutConfig::new(Size::new(100.0, 50.0), -1.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpacing(-1.0)));
    }

    #[test]
    fn non_finite_size_is_rejected() {
        let config = LayoutConfig::new(Size::new(f64::NAN, 50.0), 0.0);
        assert!(config.validate().is_err());
    }
}
