// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared setup for the Revolver demos.
//!
//! Run:
//! - `cargo run -p revolver_demos --example autoplay_carousel [path/to/config.toml]`

use std::path::Path;

use anyhow::{Context, ensure};
use kurbo::{Point, Rect, Size};
use revolver_carousel::{CarouselSource, LayoutConfig};
use revolver_page_indicator::PageIndicatorStyle;
use serde::Deserialize;

/// Configuration bundled with the demos.
pub const DEFAULT_CONFIG: &str = include_str!("../carousel.toml");

/// A scripted swipe replayed by the demo.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Swipe {
    /// Session time at which the finger goes down.
    pub at_ms: u64,
    /// Where the finger goes down.
    pub from: Point,
    /// Where the finger lifts.
    pub to: Point,
    /// How long the finger is down.
    pub duration_ms: u64,
}

/// Everything a demo session needs.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of banners.
    pub item_count: usize,
    /// Autoplay interval; `0` disables autoplay.
    pub autoplay_interval_ms: u64,
    /// Simulated frame length.
    pub frame_ms: u64,
    /// Length of the simulated session.
    pub duration_ms: u64,
    /// Carousel viewport.
    pub viewport: Size,
    /// Where the page indicator sits.
    pub indicator_bounds: Rect,
    /// Carousel layout.
    pub layout: LayoutConfig,
    /// Page indicator style.
    pub indicator: PageIndicatorStyle,
    /// Scripted input.
    pub swipes: Vec<Swipe>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            item_count: 3,
            autoplay_interval_ms: 3_000,
            frame_ms: 16,
            duration_ms: 10_000,
            viewport: Size::new(375.0, 220.0),
            indicator_bounds: Rect::new(0.0, 200.0, 375.0, 220.0),
            layout: LayoutConfig::new(Size::new(300.0, 200.0), 10.0),
            indicator: PageIndicatorStyle::default(),
            swipes: Vec::new(),
        }
    }
}

impl DemoConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("invalid demo configuration")?;
        ensure!(config.frame_ms > 0, "frame_ms must be positive");
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}

impl CarouselSource for DemoConfig {
    fn item_count(&self) -> usize {
        self.item_count
    }

    fn layout_config(&self) -> LayoutConfig {
        self.layout.clone()
    }
}
