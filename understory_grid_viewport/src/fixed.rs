// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An axis model where every item has the same size.

use crate::{ExtentModel, PositionItem, Scalar};

/// An [`ExtentModel`] where all items share the same size.
///
/// Useful for axes that never receive per-item overrides, and as the
/// reference model a sparse [`DimensionIndex`](crate::DimensionIndex)
/// without overrides must agree with.
#[derive(Debug, Clone, Copy)]
pub struct FixedExtentModel<S: Scalar> {
    len: usize,
    extent: S,
}

impl<S: Scalar> FixedExtentModel<S> {
    /// Creates a new model with `len` items of uniform `extent`.
    #[must_use]
    pub fn new(len: usize, extent: S) -> Self {
        debug_assert!(
            extent.is_finite(),
            "FixedExtentModel extents must be finite; got {extent:?}"
        );
        Self {
            len,
            extent: extent.clamp_non_negative(),
        }
    }

    /// Sets the number of items on the axis.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Sets the uniform size of all items.
    pub fn set_extent(&mut self, extent: S) {
        debug_assert!(
            extent.is_finite(),
            "FixedExtentModel extents must be finite; got {extent:?}"
        );
        self.extent = extent.clamp_non_negative();
    }

    /// Returns the uniform size of all items.
    #[must_use]
    pub const fn extent(&self) -> S {
        self.extent
    }

    fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }
}

impl<S: Scalar> ExtentModel for FixedExtentModel<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.len
    }

    fn origin_extent(&self) -> S {
        self.extent
    }

    fn total_extent(&self) -> S {
        self.extent * S::from_usize(self.len)
    }

    fn extent_of(&self, _index: usize) -> S {
        self.extent
    }

    fn item_at_index(&self, index: usize) -> PositionItem<S> {
        let index = index.min(self.last_index());
        PositionItem {
            index,
            start: S::from_usize(index) * self.extent,
            end: S::from_usize(index + 1) * self.extent,
        }
    }

    fn item_at_offset(&self, offset: S) -> PositionItem<S> {
        if self.len == 0 || self.extent <= S::zero() {
            return PositionItem::with_size(0, S::zero(), self.extent);
        }
        let offset = offset.clamp_non_negative();
        let index = (offset / self.extent).floor_to_usize();
        let item = self.item_at_index(index);
        if offset < item.start && index > 0 {
            self.item_at_index(index - 1)
        } else if offset >= item.end {
            self.item_at_index(index + 1)
        } else {
            item
        }
    }
}
