// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

/// Reasons a [`LayoutConfig`](crate::LayoutConfig) cannot drive a transform layout.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The item size has a zero, negative or non-finite dimension.
    #[error("item size must be positive and finite, got {width}x{height}")]
    InvalidItemSize {
        /// Configured item width.
        width: f64,
        /// Configured item height.
        height: f64,
    },
    /// The spacing between items is negative or non-finite.
    #[error("item spacing must be non-negative and finite, got {0}")]
    InvalidSpacing(f64),
}

/// Errors reported by [`SlotPool`](crate::SlotPool).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// No factory was registered for the reuse identifier.
    #[error("no slot factory registered for identifier `{0}`")]
    UnregisteredIdentifier(String),
}
