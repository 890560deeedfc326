// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse size index for one grid axis.
//!
//! Most items on an axis share a uniform origin size. Items with a custom
//! size become *anchors*: their span is resolved once per mutation and kept in
//! index order, so any other item's span follows from the nearest preceding
//! anchor plus a whole number of origin-size strides.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{ExtentModel, PositionItem, Scalar};

/// Sparse map of item index to custom size.
pub type SizeMap<S> = HashMap<usize, S>;

/// Per-axis index of item sizes with sparse overrides.
///
/// Values are immutable snapshots: every mutation returns a new
/// [`DimensionIndex`] derived from `self`, so a lookup never observes a
/// half-applied change.
///
/// A fresh index has a `count` of zero: an empty axis with a real size of
/// zero. Set the item count with [`with_count`](Self::with_count) before
/// handing the index to a [`ViewportWindow`](crate::ViewportWindow). Index
/// queries on an empty axis still follow the stride arithmetic, so overrides
/// can be staged before the count is known.
#[derive(Debug, Clone)]
pub struct DimensionIndex<S: Scalar> {
    origin_item_size: S,
    count: usize,
    sizes: SizeMap<S>,
    /// Ascending indices of all anchors.
    indexes: Vec<usize>,
    /// Start of every anchor, aligned with `indexes`.
    position_indexes: Vec<S>,
    /// Resolved anchors, aligned with `indexes`.
    position_index_to_item: Vec<PositionItem<S>>,
    index_to_item: HashMap<usize, PositionItem<S>>,
    real_size: S,
}

impl<S: Scalar> DimensionIndex<S> {
    /// Creates an empty axis whose items default to `origin_item_size`.
    #[must_use]
    pub fn new(origin_item_size: S) -> Self {
        debug_assert!(
            origin_item_size.is_finite() && !origin_item_size.is_sign_negative(),
            "origin item size must be finite and non-negative; got {origin_item_size:?}"
        );
        Self {
            origin_item_size,
            count: 0,
            sizes: SizeMap::new(),
            indexes: Vec::new(),
            position_indexes: Vec::new(),
            position_index_to_item: Vec::new(),
            index_to_item: HashMap::new(),
            real_size: S::zero(),
        }
    }

    /// Returns a copy of this index covering `count` items.
    ///
    /// The real size is derived from the anchors below `count`; overrides at
    /// or past `count` are kept but do not contribute.
    #[must_use]
    pub fn with_count(&self, count: usize) -> Self {
        let mut next = self.clone();
        next.count = count;
        next.real_size = next.sparse_real_size();
        next
    }

    /// Returns a copy of this index with a different uniform item size.
    ///
    /// Overrides are kept; anchors and the real size are re-derived.
    #[must_use]
    pub fn with_origin_size(&self, origin_item_size: S) -> Self {
        let mut next = self.clone();
        next.origin_item_size = origin_item_size;
        next.rebuild_anchors();
        next.real_size = next.sparse_real_size();
        next
    }

    /// Uniform default size of items without an override.
    #[must_use]
    pub const fn origin_item_size(&self) -> S {
        self.origin_item_size
    }

    /// Number of items on the axis.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Total size of the axis.
    #[must_use]
    pub const fn real_size(&self) -> S {
        self.real_size
    }

    /// Custom sizes, keyed by item index.
    #[must_use]
    pub fn sizes(&self) -> &SizeMap<S> {
        &self.sizes
    }

    /// Ascending indices of all items with a custom size.
    #[must_use]
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Start positions of all anchors, aligned with [`indexes`](Self::indexes).
    #[must_use]
    pub fn position_indexes(&self) -> &[S] {
        &self.position_indexes
    }

    /// Resolved spans of all anchors, in index order.
    #[must_use]
    pub fn anchors(&self) -> &[PositionItem<S>] {
        &self.position_index_to_item
    }

    /// Resolved span of the anchor at `index`, if the item has a custom size.
    #[must_use]
    pub fn anchor(&self, index: usize) -> Option<PositionItem<S>> {
        self.index_to_item.get(&index).copied()
    }

    /// Returns `true` if the item at `index` has a custom size.
    #[must_use]
    pub fn is_overridden(&self, index: usize) -> bool {
        self.sizes.contains_key(&index)
    }

    /// Size of the item at `index`.
    #[must_use]
    pub fn size_of(&self, index: usize) -> S {
        self.sizes
            .get(&index)
            .copied()
            .unwrap_or(self.origin_item_size)
    }

    /// Merges `new_sizes` into the custom sizes and returns the updated index.
    ///
    /// Newly overridden indices are merged into the sorted anchor list without
    /// re-sorting existing anchors, then all anchor spans are re-resolved in one
    /// left-to-right pass. The real size moves by the accumulated delta of the
    /// changed items. Indices past the item count are accepted as anchors.
    #[must_use]
    pub fn apply_size_overrides<I>(&self, new_sizes: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
    {
        let mut next = self.clone();
        let mut delta = S::zero();
        let mut added = Vec::new();

        for (index, size) in new_sizes {
            debug_assert!(
                size.is_finite() && !size.is_sign_negative(),
                "item sizes must be finite and non-negative; got {size:?} at {index}"
            );
            let previous = next.sizes.insert(index, size);
            if previous.is_none() {
                added.push(index);
            }
            if next.counts_toward_real_size(index) {
                delta = delta + size - previous.unwrap_or(self.origin_item_size);
            }
        }

        added.sort_unstable();
        next.indexes = merge_sorted(&self.indexes, &added);
        next.rebuild_anchors();
        next.real_size = self.real_size + delta;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            anchors = next.indexes.len(),
            added = added.len(),
            real_size = ?next.real_size,
            "applied size overrides"
        );

        next
    }

    /// Replaces all custom sizes with `sizes` and returns the updated index.
    ///
    /// This is how the output of [`remove_and_shift`](Self::remove_and_shift)
    /// and [`insert_and_shift`](Self::insert_and_shift) is fed back.
    #[must_use]
    pub fn replace_sizes(&self, sizes: SizeMap<S>) -> Self {
        let cleared = Self::new(self.origin_item_size).with_count(self.count);
        cleared.apply_size_overrides(sizes)
    }

    /// Compacts the custom sizes after the items in `removed` are taken out.
    ///
    /// Every surviving override moves down by the number of removed indices
    /// below it; overrides of removed items disappear.
    #[must_use]
    pub fn remove_and_shift<I>(&self, removed: I) -> SizeMap<S>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut removed: Vec<usize> = removed.into_iter().collect();
        removed.sort_unstable();
        removed.dedup();

        let mut shifted = SizeMap::with_capacity(self.sizes.len());
        let mut pending = removed.iter().copied().peekable();
        let mut shift = 0;
        for &index in &self.indexes {
            while pending.next_if(|&r| r < index).is_some() {
                shift += 1;
            }
            if pending.peek() == Some(&index) {
                continue;
            }
            shifted.insert(index - shift, self.size_of(index));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            removed = removed.len(),
            kept = shifted.len(),
            "shifted sizes after removal"
        );

        shifted
    }

    /// Makes room for a new item at `at` with the given `size`.
    ///
    /// Every override at or after `at` moves up one slot.
    #[must_use]
    pub fn insert_and_shift(&self, at: usize, size: S) -> SizeMap<S> {
        let mut shifted = SizeMap::with_capacity(self.sizes.len() + 1);
        for (&index, &custom) in &self.sizes {
            let index = if index >= at { index + 1 } else { index };
            shifted.insert(index, custom);
        }
        shifted.insert(at, size);
        shifted
    }

    /// Span of the item covering the pixel position `pos`.
    ///
    /// Negative positions resolve to the first item and positions at or past
    /// the real size resolve to the last item.
    #[must_use]
    pub fn item_at_position(&self, pos: S) -> PositionItem<S> {
        if self.count > 0 && pos >= self.real_size {
            return self.item_at_index(self.count - 1);
        }
        let pos = pos.clamp_non_negative();

        // Number of anchors starting at or before `pos`.
        let k = self.position_indexes.partition_point(|&start| start <= pos);
        let next = self.position_index_to_item.get(k);
        let item = match k.checked_sub(1) {
            None => self.stride_item(None, pos, next),
            Some(prev) => {
                let anchor = &self.position_index_to_item[prev];
                if pos < anchor.end {
                    *anchor
                } else {
                    self.stride_item(Some(anchor), pos, next)
                }
            }
        };

        if self.count > 0 && item.index >= self.count {
            self.item_at_index(self.count - 1)
        } else {
            item
        }
    }

    /// Span of the item at `index`.
    ///
    /// Indices past the item count clamp to the last item.
    #[must_use]
    pub fn item_at_index(&self, index: usize) -> PositionItem<S> {
        let index = if self.count > 0 {
            index.min(self.count - 1)
        } else {
            index
        };
        match self.indexes.binary_search(&index) {
            Ok(k) => self.position_index_to_item[k],
            Err(0) => self.stride_span(0, S::zero(), index),
            Err(k) => {
                let anchor = &self.position_index_to_item[k - 1];
                self.stride_span(anchor.index + 1, anchor.end, index)
            }
        }
    }

    /// Resolves the default-size item covering `pos` in the gap after `prev`.
    ///
    /// The result never runs past the next anchor.
    fn stride_item(
        &self,
        prev: Option<&PositionItem<S>>,
        pos: S,
        next: Option<&PositionItem<S>>,
    ) -> PositionItem<S> {
        let origin = self.origin_item_size;
        let (base_index, base_pos) = match prev {
            Some(anchor) => (anchor.index + 1, anchor.end),
            None => (0, S::zero()),
        };
        let steps = if origin > S::zero() {
            ((pos - base_pos) / origin).floor_to_usize()
        } else {
            0
        };
        let mut index = base_index.saturating_add(steps);
        // The quotient can land one item off when the edges are not exact.
        let item = self.stride_span(base_index, base_pos, index);
        if origin > S::zero() {
            if pos < item.start && index > base_index {
                index -= 1;
            } else if pos >= item.end {
                index += 1;
            }
        }
        match next {
            Some(next) if index >= next.index => *next,
            _ => self.stride_span(base_index, base_pos, index),
        }
    }

    /// Span of the default-size item `index` in the run that starts at
    /// `base_pos` with item `base_index`.
    ///
    /// Both edges come from the same expression, so the end of one item is
    /// bit-identical to the start of the next and to the start of the anchor
    /// closing the run.
    fn stride_span(&self, base_index: usize, base_pos: S, index: usize) -> PositionItem<S> {
        let origin = self.origin_item_size;
        let steps = index - base_index;
        PositionItem {
            index,
            start: base_pos + S::from_usize(steps) * origin,
            end: base_pos + S::from_usize(steps + 1) * origin,
        }
    }

    fn counts_toward_real_size(&self, index: usize) -> bool {
        index < self.count
    }

    /// Real size from the count and the anchors below it, without a full sum.
    fn sparse_real_size(&self) -> S {
        let origin = self.origin_item_size;
        self.position_index_to_item
            .iter()
            .take_while(|anchor| anchor.index < self.count)
            .fold(S::from_usize(self.count) * origin, |total, anchor| {
                total + anchor.size() - origin
            })
    }

    /// Re-resolves every anchor span from `indexes` and `sizes` in one pass.
    fn rebuild_anchors(&mut self) {
        let origin = self.origin_item_size;
        self.position_indexes.clear();
        self.position_index_to_item.clear();
        self.index_to_item.clear();

        let mut prev: Option<PositionItem<S>> = None;
        for &index in &self.indexes {
            let start = match prev {
                Some(prev) => self.stride_span(prev.index + 1, prev.end, index).start,
                None => self.stride_span(0, S::zero(), index).start,
            };
            let size = self.sizes.get(&index).copied().unwrap_or(origin);
            let item = PositionItem::with_size(index, start, size);
            self.position_indexes.push(start);
            self.position_index_to_item.push(item);
            self.index_to_item.insert(index, item);
            prev = Some(item);
        }
    }
}

impl<S: Scalar> ExtentModel for DimensionIndex<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.count
    }

    fn origin_extent(&self) -> S {
        self.origin_item_size
    }

    fn total_extent(&self) -> S {
        self.real_size
    }

    fn extent_of(&self, index: usize) -> S {
        self.size_of(index)
    }

    fn item_at_index(&self, index: usize) -> PositionItem<S> {
        Self::item_at_index(self, index)
    }

    fn item_at_offset(&self, offset: S) -> PositionItem<S> {
        self.item_at_position(offset)
    }
}

/// Merges two ascending, disjoint index lists in `O(a + b)`.
fn merge_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            merged.push(a[i]);
            i += 1;
        } else {
            merged.push(b[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}
