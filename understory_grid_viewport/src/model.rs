// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item spans and the extent model trait shared by axis models.

use crate::Scalar;

/// Pixel span of one item along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionItem<S: Scalar> {
    /// Index of the item on the axis.
    pub index: usize,
    /// Start of the item (inclusive).
    pub start: S,
    /// End of the item (exclusive).
    pub end: S,
}

impl<S: Scalar> PositionItem<S> {
    /// Creates a span for `index` starting at `start` with the given `size`.
    #[must_use]
    pub fn with_size(index: usize, start: S, size: S) -> Self {
        Self {
            index,
            start,
            end: start + size,
        }
    }

    /// Size of the span.
    #[must_use]
    pub fn size(&self) -> S {
        self.end - self.start
    }

    /// Returns `true` if `pos` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, pos: S) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// A [`PositionItem`] that also carries its size, as stored in a viewport window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualPositionItem<S: Scalar> {
    /// Index of the item on the axis.
    pub index: usize,
    /// Start of the item (inclusive).
    pub start: S,
    /// End of the item (exclusive).
    pub end: S,
    /// Always `end - start`; kept so resize passes avoid recomputing it.
    pub size: S,
}

impl<S: Scalar> VirtualPositionItem<S> {
    /// Creates an item for `index` starting at `start` with the given `size`.
    #[must_use]
    pub fn new(index: usize, start: S, size: S) -> Self {
        Self {
            index,
            start,
            end: start + size,
            size,
        }
    }

    /// Drops the redundant size.
    #[must_use]
    pub fn position(&self) -> PositionItem<S> {
        PositionItem {
            index: self.index,
            start: self.start,
            end: self.end,
        }
    }
}

impl<S: Scalar> From<PositionItem<S>> for VirtualPositionItem<S> {
    fn from(item: PositionItem<S>) -> Self {
        Self {
            index: item.index,
            start: item.start,
            end: item.end,
            size: item.end - item.start,
        }
    }
}

/// A 1D model over the items of one axis, indexed `0..len`.
///
/// All sizes and positions are in the same coordinate space as the scroll
/// coordinate and viewport size (typically logical pixels).
///
/// Models are immutable snapshots as far as queries are concerned; every
/// query takes `&self`.
pub trait ExtentModel {
    /// Scalar type used for sizes and positions.
    type Scalar: Scalar;

    /// Number of items on the axis.
    fn len(&self) -> usize;

    /// Returns `true` if the axis has no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uniform default size of an item without an explicit size.
    ///
    /// Viewport windows size their prefetch margin from this.
    fn origin_extent(&self) -> Self::Scalar;

    /// Total size of the axis over all `len()` items.
    fn total_extent(&self) -> Self::Scalar;

    /// Size of a single item.
    fn extent_of(&self, index: usize) -> Self::Scalar;

    /// Span of the item at `index`.
    ///
    /// Indices past the end clamp to the last item when the axis is not empty.
    /// Spans of neighbouring items must share their edge exactly: viewport
    /// windows copy spans from here rather than summing sizes.
    fn item_at_index(&self, index: usize) -> PositionItem<Self::Scalar>;

    /// Span of the item covering `offset`.
    ///
    /// Negative offsets resolve to the first item; offsets at or past
    /// [`total_extent`](Self::total_extent) resolve to the last item.
    fn item_at_offset(&self, offset: Self::Scalar) -> PositionItem<Self::Scalar>;
}

#[cfg(test)]
mod tests {
    use super::{PositionItem, VirtualPositionItem};

    #[test]
    fn spans_are_half_open() {
        let item = PositionItem::with_size(3, 60.0_f32, 20.0);
        assert_eq!(item.end, 80.0);
        assert!(item.contains(60.0));
        assert!(item.contains(79.5));
        assert!(!item.contains(80.0));
        assert_eq!(item.size(), 20.0);
    }

    #[test]
    fn virtual_items_round_trip_through_positions() {
        let item = VirtualPositionItem::from(PositionItem::with_size(1, 10.0_f64, 5.0));
        assert_eq!(item.size, 5.0);
        assert_eq!(item.position(), PositionItem::with_size(1, 10.0, 5.0));
    }
}
