// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable host views keyed by reuse identifier.
//!
//! A carousel realizes only the handful of slots that intersect the viewport.
//! Hosts keep their per-slot views in a [`RealizedSlots`] and let it diff the
//! visible positions after each layout: views that scrolled out are returned
//! to a [`SlotPool`], new positions are built from it.
//!
//! ```
//! use revolver_carousel::{PooledSlot, RealizedSlots, SlotError, SlotPool, VirtualPosition};
//!
//! let mut pool: SlotPool<String> = SlotPool::new();
//! pool.register("banner", String::new);
//!
//! let mut realized = RealizedSlots::new();
//! let build = |pool: &mut SlotPool<String>, p: VirtualPosition| -> Result<PooledSlot<String>, SlotError> {
//!     let mut slot = pool.dequeue("banner")?;
//!     slot.view = format!("item {}", p.index);
//!     Ok(slot)
//! };
//!
//! let first = [VirtualPosition::new(0, 0), VirtualPosition::new(1, 0)];
//! let appeared = realized.reconcile(&first, &mut pool, build).unwrap();
//! assert_eq!(appeared.len(), 2);
//!
//! // Scrolling by one item recycles the view of item 0 for item 2.
//! let second = [VirtualPosition::new(1, 0), VirtualPosition::new(2, 0)];
//! let appeared = realized.reconcile(&second, &mut pool, build).unwrap();
//! assert_eq!(appeared.as_slice(), &[VirtualPosition::new(2, 0)]);
//! assert_eq!(pool.free_count("banner"), 0);
//! assert_eq!(realized.get(VirtualPosition::new(2, 0)).map(String::as_str), Some("item 2"));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{SlotError, VirtualPosition};

type Factory<V> = Box<dyn Fn() -> V>;

/// A view together with the identifier of the pool it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PooledSlot<V> {
    /// Reuse identifier.
    pub identifier: String,
    /// The host view.
    pub view: V,
}

/// Identifier-keyed factories and free lists of host views.
pub struct SlotPool<V> {
    factories: HashMap<String, Factory<V>>,
    free: HashMap<String, Vec<V>>,
}

impl<V> fmt::Debug for SlotPool<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPool")
            .field("identifiers", &self.factories.len())
            .field("free", &self.free.values().map(Vec::len).sum::<usize>())
            .finish_non_exhaustive()
    }
}

impl<V> Default for SlotPool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SlotPool<V> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            free: HashMap::new(),
        }
    }

    /// Registers (or replaces) the factory for `identifier`.
    pub fn register(&mut self, identifier: impl Into<String>, factory: impl Fn() -> V + 'static) {
        self.factories.insert(identifier.into(), Box::new(factory));
    }

    /// Whether a factory is registered for `identifier`.
    #[must_use]
    pub fn is_registered(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Takes a free view for `identifier`, or builds a new one.
    pub fn dequeue(&mut self, identifier: &str) -> Result<PooledSlot<V>, SlotError> {
        let Some(factory) = self.factories.get(identifier) else {
            return Err(SlotError::UnregisteredIdentifier(identifier.into()));
        };
        let view = match self.free.get_mut(identifier).and_then(Vec::pop) {
            Some(view) => view,
            None => factory(),
        };
        Ok(PooledSlot {
            identifier: identifier.into(),
            view,
        })
    }

    /// Returns a view to the free list of its identifier.
    ///
    /// Views whose identifier is no longer registered are dropped.
    pub fn enqueue(&mut self, slot: PooledSlot<V>) {
        if !self.factories.contains_key(&slot.identifier) {
            return;
        }
        self.free.entry(slot.identifier).or_default().push(slot.view);
    }

    /// Number of free views for `identifier`.
    #[must_use]
    pub fn free_count(&self, identifier: &str) -> usize {
        self.free.get(identifier).map_or(0, Vec::len)
    }

    /// Drops every free view.
    pub fn clear_free(&mut self) {
        self.free.clear();
    }
}

/// The host views currently realized, keyed by virtual position.
#[derive(Clone, Debug)]
pub struct RealizedSlots<V> {
    slots: Vec<(VirtualPosition, PooledSlot<V>)>,
}

impl<V> Default for RealizedSlots<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RealizedSlots<V> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of realized slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The view realized for `position`.
    #[must_use]
    pub fn get(&self, position: VirtualPosition) -> Option<&V> {
        self.slots
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, slot)| &slot.view)
    }

    /// Mutable access to the view realized for `position`.
    pub fn get_mut(&mut self, position: VirtualPosition) -> Option<&mut V> {
        self.slots
            .iter_mut()
            .find(|(p, _)| *p == position)
            .map(|(_, slot)| &mut slot.view)
    }

    /// Realized positions and views, in the order of the last reconcile.
    pub fn iter(&self) -> impl Iterator<Item = (VirtualPosition, &V)> + '_ {
        self.slots.iter().map(|(p, slot)| (*p, &slot.view))
    }

    /// Makes the realized set match `visible`.
    ///
    /// Views for positions that are no longer visible go back to `pool`
    /// first, so `build` can reuse them for the positions that appeared.
    /// Returns the positions that were built, in `visible` order. If `build`
    /// fails, the slots realized so far are kept and the error is returned.
    pub fn reconcile<F>(
        &mut self,
        visible: &[VirtualPosition],
        pool: &mut SlotPool<V>,
        mut build: F,
    ) -> Result<SmallVec<[VirtualPosition; 8]>, SlotError>
    where
        F: FnMut(&mut SlotPool<V>, VirtualPosition) -> Result<PooledSlot<V>, SlotError>,
    {
        let (mut kept, gone): (Vec<_>, Vec<_>) = core::mem::take(&mut self.slots)
            .into_iter()
            .partition(|(p, _)| visible.contains(p));
        for (_, slot) in gone {
            pool.enqueue(slot);
        }
        let mut appeared = SmallVec::new();
        for &position in visible {
            if let Some(i) = kept.iter().position(|(p, _)| *p == position) {
                self.slots.push(kept.swap_remove(i));
                continue;
            }
            if self.slots.iter().any(|(p, _)| *p == position) {
                continue;
            }
            match build(pool, position) {
                Ok(slot) => {
                    self.slots.push((position, slot));
                    appeared.push(position);
                }
                Err(err) => {
                    self.slots.append(&mut kept);
                    return Err(err);
                }
            }
        }
        Ok(appeared)
    }

    /// Returns every realized view to `pool`.
    pub fn clear(&mut self, pool: &mut SlotPool<V>) {
        for (_, slot) in self.slots.drain(..) {
            pool.enqueue(slot);
        }
    }
}
