// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual positions inside the repeated-section buffer.

/// Number of times the item sequence is repeated when looping.
pub const MAX_SECTIONS: usize = 200;

/// Distance (in sections) from either buffer edge that triggers recycling.
pub const RECYCLE_MARGIN: usize = 18;

/// Section the carousel is re-expressed at on reset and recycling.
pub const RECENTER_SECTION: usize = MAX_SECTIONS / 3;

/// An occurrence of a logical item within the repeated-section buffer.
///
/// `index` is the logical item in `0..item_count`; `section` is the
/// repetition of the whole sequence the occurrence belongs to. Without
/// looping there is a single section and `section` is always `0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPosition {
    /// Logical item index.
    pub index: usize,
    /// Repetition of the item sequence.
    pub section: usize,
}

impl VirtualPosition {
    /// The first item of the first section.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new position.
    #[must_use]
    pub const fn new(index: usize, section: usize) -> Self {
        Self { index, section }
    }

    /// Index of this occurrence in the flattened buffer.
    #[must_use]
    pub const fn global_index(self, item_count: usize) -> usize {
        self.section * item_count + self.index
    }

    /// Inverse of [`global_index`](Self::global_index).
    ///
    /// Returns [`VirtualPosition::ORIGIN`] when `item_count` is zero.
    #[must_use]
    pub const fn from_global_index(global: usize, item_count: usize) -> Self {
        if item_count == 0 {
            return Self::ORIGIN;
        }
        Self::new(global % item_count, global / item_count)
    }
}

/// Direction of a single-item step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards higher indices (content moves to the leading edge).
    Forward,
    /// Towards lower indices.
    Backward,
}
