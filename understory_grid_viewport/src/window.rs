// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The materialized slice of one axis, kept as a ring buffer.
//!
//! A [`ViewportWindow`] holds the items a renderer needs for the current
//! scroll coordinate: the visible span plus a prefetch margin of
//! `frame_offset` origin-size items on each side. Its buffer is a ring: the
//! logical order starts at [`ViewportWindow::start`] and wraps around to
//! [`ViewportWindow::end`]. Every slot of the buffer is in use.
//!
//! Recomputing after a scroll picks the cheapest path that keeps the window
//! covering the span:
//!
//! - the window still starts at the right item: only the tail grows;
//! - the first item moved by at most the buffer length: slots that fall out
//!   of the window are overwritten in place with the newly needed items, and
//!   the ring pointers rotate;
//! - otherwise (or when forced): the buffer is rebuilt.
//!
//! Afterwards, items at either end that no longer touch the span are dropped,
//! so the window always holds exactly the items a rebuild would produce.
//! Every item's span is copied from the model, never summed from its
//! neighbours.
//!
//! Items that stay in the window across a recombination keep their physical
//! slot, so hosts that key UI handles by slot (see
//! [`ViewportWindow::physical_slot`]) can reuse them. Slot stability is an
//! optimization contract only; coverage and contiguity do not depend on it.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::{ExtentModel, PositionItem, Scalar, VirtualPositionItem};

/// Path taken by a [`ViewportWindow::recompute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    /// Nothing was computed: the viewport has no size or the axis no items.
    Idle,
    /// The window already covered the required span.
    Unchanged,
    /// The tail grew. Leading items that fell out of the span may also have
    /// been dropped.
    Extended {
        /// Items appended after the last item.
        added: usize,
    },
    /// Items that no longer touch the required span were dropped.
    Trimmed {
        /// Items dropped from either end.
        removed: usize,
    },
    /// Existing slots were reused for the shifted window.
    Recombined {
        /// Slots overwritten with newly needed items.
        moved: usize,
        /// Items appended after the last item to restore coverage.
        added: usize,
        /// Items dropped from either end afterwards.
        removed: usize,
    },
    /// The buffer was discarded and rebuilt.
    Rebuilt {
        /// Number of items in the rebuilt window.
        len: usize,
    },
}

impl Recompute {
    /// Short name of the path, as used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Unchanged => "unchanged",
            Self::Extended { .. } => "extend",
            Self::Trimmed { .. } => "trim",
            Self::Recombined { .. } => "recombine",
            Self::Rebuilt { .. } => "rebuild",
        }
    }
}

/// Pixel span the window has to cover, margins included.
#[derive(Debug, Clone, Copy)]
struct Span<S> {
    start: S,
    end: S,
}

/// The materialized items of one axis.
///
/// See the [module documentation](self) for the update strategy.
#[derive(Debug, Clone)]
pub struct ViewportWindow<S: Scalar> {
    items: Vec<VirtualPositionItem<S>>,
    start: usize,
    end: usize,
    virtual_size: S,
    real_count: usize,
    last_coordinate: S,
    frame_offset: usize,
}

impl<S: Scalar> ViewportWindow<S> {
    /// Creates an empty window for a viewport of `virtual_size` over
    /// `real_count` items, with a prefetch margin of one item on each side.
    #[must_use]
    pub fn new(virtual_size: S, real_count: usize) -> Self {
        Self {
            items: Vec::new(),
            start: 0,
            end: 0,
            virtual_size: virtual_size.clamp_non_negative(),
            real_count,
            last_coordinate: S::zero(),
            frame_offset: 1,
        }
    }

    /// Sets the prefetch margin, in origin-size items per side.
    #[must_use]
    pub fn with_frame_offset(mut self, frame_offset: usize) -> Self {
        self.frame_offset = frame_offset;
        self
    }

    /// Sets the prefetch margin, in origin-size items per side.
    ///
    /// The current items stay; the next recompute applies the new margin.
    pub fn set_frame_offset(&mut self, frame_offset: usize) {
        self.frame_offset = frame_offset;
    }

    /// Prefetch margin, in origin-size items per side.
    #[must_use]
    pub const fn frame_offset(&self) -> usize {
        self.frame_offset
    }

    /// Sets the viewport size and item count, emptying the window.
    pub fn set_viewport(&mut self, virtual_size: S, real_count: usize) {
        self.virtual_size = virtual_size.clamp_non_negative();
        self.real_count = real_count;
        self.clear();
    }

    /// Sets the viewport size, emptying the window.
    pub fn set_virtual_size(&mut self, virtual_size: S) {
        self.set_viewport(virtual_size, self.real_count);
    }

    /// Sets the item count, emptying the window.
    pub fn set_real_count(&mut self, real_count: usize) {
        self.set_viewport(self.virtual_size, real_count);
    }

    /// Empties the window. The next recompute rebuilds it.
    pub fn clear(&mut self) {
        self.items.clear();
        self.start = 0;
        self.end = 0;
    }

    /// Size of the visible viewport, without margins.
    #[must_use]
    pub const fn virtual_size(&self) -> S {
        self.virtual_size
    }

    /// Number of items on the axis.
    #[must_use]
    pub const fn real_count(&self) -> usize {
        self.real_count
    }

    /// Scroll coordinate applied by the last recompute, after clamping.
    #[must_use]
    pub const fn last_coordinate(&self) -> S {
        self.last_coordinate
    }

    /// Physical slot of the first item in logical order.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Physical slot of the last item in logical order.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of items in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the window holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The ring buffer in physical slot order.
    #[must_use]
    pub fn slots(&self) -> &[VirtualPositionItem<S>] {
        &self.items
    }

    /// Physical slot of the `k`-th item in logical order.
    #[must_use]
    pub fn physical_slot(&self, k: usize) -> Option<usize> {
        (k < self.items.len()).then(|| (self.start + k) % self.items.len())
    }

    /// The `k`-th item in logical order.
    #[must_use]
    pub fn get(&self, k: usize) -> Option<&VirtualPositionItem<S>> {
        self.physical_slot(k).map(|slot| &self.items[slot])
    }

    /// First item in logical order.
    #[must_use]
    pub fn first(&self) -> Option<&VirtualPositionItem<S>> {
        self.items.get(self.start)
    }

    /// Last item in logical order.
    #[must_use]
    pub fn last(&self) -> Option<&VirtualPositionItem<S>> {
        self.items.get(self.end)
    }

    /// Items in logical order.
    ///
    /// This is the sequence renderers consume: index-contiguous and
    /// pixel-contiguous.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &VirtualPositionItem<S>> + '_ {
        let (tail, head) = self.items.split_at(self.start);
        head.iter().chain(tail)
    }

    /// Items in logical order, collected.
    #[must_use]
    pub fn to_vec(&self) -> Vec<VirtualPositionItem<S>> {
        self.iter().copied().collect()
    }

    /// Items overlapping `[from, to)`, in logical order.
    pub fn items_in(
        &self,
        from: S,
        to: S,
    ) -> impl DoubleEndedIterator<Item = &VirtualPositionItem<S>> + '_ {
        self.iter()
            .filter(move |item| item.end > from && item.start < to)
    }

    /// Items overlapping the viewport at the last applied coordinate.
    ///
    /// The margin items on either side are excluded.
    pub fn visible_items(&self) -> impl DoubleEndedIterator<Item = &VirtualPositionItem<S>> + '_ {
        let from = self.last_coordinate;
        self.items_in(from, from + self.virtual_size)
    }

    /// Returns a recomputed copy of this window, leaving `self` untouched.
    ///
    /// See [`recompute`](Self::recompute).
    #[must_use]
    pub fn recomputed<M>(&self, scroll_position: S, model: &M, force: bool) -> Self
    where
        M: ExtentModel<Scalar = S>,
    {
        let mut next = self.clone();
        next.recompute(scroll_position, model, force);
        next
    }

    /// Brings the window up to date for `scroll_position`.
    ///
    /// The coordinate is clamped into
    /// `[0, max(0, total - virtual_size - margin)]` and remembered as
    /// [`last_coordinate`](Self::last_coordinate). The window then covers
    /// `[coordinate - margin, coordinate + virtual_size + margin]`, cut to the
    /// axis. With `force`, the buffer is always rebuilt; use this after the
    /// model changed under the current items.
    ///
    /// `model` must describe the same `real_count` items as the window (for a
    /// [`DimensionIndex`](crate::DimensionIndex), set with `with_count`); debug
    /// builds assert this.
    pub fn recompute<M>(&mut self, scroll_position: S, model: &M, force: bool) -> Recompute
    where
        M: ExtentModel<Scalar = S>,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "viewport_recompute",
            scroll = ?scroll_position,
            force,
            slots = self.items.len(),
            real_count = self.real_count
        )
        .entered();

        let outcome = self.recompute_inner(scroll_position, model, force);
        self.debug_check_ring();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            branch = outcome.name(),
            first = ?self.first().map(|item| item.index),
            last = ?self.last().map(|item| item.index),
            slots = self.items.len(),
            "viewport recomputed"
        );

        outcome
    }

    fn recompute_inner<M>(&mut self, scroll_position: S, model: &M, force: bool) -> Recompute
    where
        M: ExtentModel<Scalar = S>,
    {
        debug_assert_eq!(
            model.len(),
            self.real_count,
            "window and model disagree on the item count"
        );
        if self.virtual_size <= S::zero() {
            return Recompute::Idle;
        }
        if self.real_count == 0 {
            self.clear();
            self.last_coordinate = S::zero();
            return Recompute::Idle;
        }
        debug_assert!(
            scroll_position.is_finite(),
            "scroll position must be finite; got {scroll_position:?}"
        );

        let span = self.target_span(scroll_position, model);
        if force || self.items.is_empty() {
            return self.rebuild(span, model);
        }
        if self.is_active_range(span.start) {
            let added = self.extend_tail(span.end, model);
            let removed = self.trim(span);
            return match (added, removed) {
                (0, 0) => Recompute::Unchanged,
                (0, removed) => Recompute::Trimmed { removed },
                (added, _) => Recompute::Extended { added },
            };
        }

        let target = self.clamped_item_at(span.start, model);
        let first = self.items[self.start];
        let offset = target.index.abs_diff(first.index);
        if offset == 0 || offset > self.items.len() {
            return self.rebuild(span, model);
        }
        let moved = if target.index > first.index {
            self.recombine_forward(offset, model)
        } else {
            self.recombine_backward(offset, model)
        };
        let added = self.extend_tail(span.end, model);
        let removed = self.trim(span);
        Recompute::Recombined {
            moved,
            added,
            removed,
        }
    }

    /// Clamps the coordinate, stores it, and widens it by the margin.
    fn target_span<M>(&mut self, scroll_position: S, model: &M) -> Span<S>
    where
        M: ExtentModel<Scalar = S>,
    {
        let margin = model.origin_extent() * S::from_usize(self.frame_offset);
        let real_size = model.total_extent();
        let max_coordinate = (real_size - self.virtual_size - margin).clamp_non_negative();
        let coordinate = scroll_position.clamp_between(S::zero(), max_coordinate);
        self.last_coordinate = coordinate;
        Span {
            start: (coordinate - margin).clamp_non_negative(),
            end: (coordinate + self.virtual_size + margin).min(real_size),
        }
    }

    /// Whether the current items already cover `pos` from the leading side.
    ///
    /// True when `pos` lies inside the first item, or lies past it while the
    /// window already reaches the last item of the axis.
    fn is_active_range(&self, pos: S) -> bool {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return false;
        };
        first.start <= pos && pos < first.end
            || pos > first.start && last.index + 1 >= self.real_count
    }

    /// Span of the item covering `pos`, read back by index so that it is
    /// identical to what the walks produce.
    fn clamped_item_at<M>(&self, pos: S, model: &M) -> PositionItem<S>
    where
        M: ExtentModel<Scalar = S>,
    {
        let index = model.item_at_offset(pos).index;
        model.item_at_index(index.min(self.real_count - 1))
    }

    fn rebuild<M>(&mut self, span: Span<S>, model: &M) -> Recompute
    where
        M: ExtentModel<Scalar = S>,
    {
        let first = self.clamped_item_at(span.start, model);
        self.items.clear();
        self.items.push(first.into());
        self.start = 0;
        self.end = 0;
        self.extend_tail(span.end, model);
        Recompute::Rebuilt {
            len: self.items.len(),
        }
    }

    /// Appends items after the last one until `target_end` or the axis end is
    /// reached. Returns the number of items appended.
    fn extend_tail<M>(&mut self, target_end: S, model: &M) -> usize
    where
        M: ExtentModel<Scalar = S>,
    {
        let Some(mut last) = self.last().copied() else {
            return 0;
        };
        let mut missing: SmallVec<[VirtualPositionItem<S>; 8]> = SmallVec::new();
        while last.end < target_end && last.index + 1 < self.real_count {
            last = model.item_at_index(last.index + 1).into();
            missing.push(last);
        }

        let added = missing.len();
        if added == 0 {
            return 0;
        }
        if self.start == 0 {
            self.items.extend(missing);
            self.end = self.items.len() - 1;
        } else {
            // The logical head sits right after `end`; it moves up by `added`.
            let at = self.end + 1;
            self.items.splice(at..at, missing);
            self.start += added;
            self.end += added;
        }
        added
    }

    /// Drops items at either end that do not touch `span`, keeping at least
    /// one. Returns the number of items dropped.
    ///
    /// Leading items ending at or before `span.start` and trailing items
    /// starting at or after `span.end` go; what remains is exactly the run a
    /// rebuild for `span` would produce.
    fn trim(&mut self, span: Span<S>) -> usize {
        let len = self.items.len();
        let leading = self
            .iter()
            .take(len - 1)
            .take_while(|item| item.end <= span.start)
            .count();
        let trailing = self
            .iter()
            .rev()
            .take(len - 1 - leading)
            .take_while(|item| item.start >= span.end)
            .count();
        if leading > 0 {
            self.drop_head(leading);
        }
        if trailing > 0 {
            self.drop_tail(trailing);
        }
        leading + trailing
    }

    /// Removes the first `count` items in logical order.
    ///
    /// Items of the wrapped part keep their slots; the rest move down.
    fn drop_head(&mut self, count: usize) {
        let run = self.items.len() - self.start;
        let from_run = count.min(run);
        self.items.drain(self.start..self.start + from_run);
        if self.start == self.items.len() {
            self.start = 0;
        }
        self.items.drain(..count - from_run);
        self.end = (self.start + self.items.len() - 1) % self.items.len();
    }

    /// Removes the last `count` items in logical order.
    ///
    /// Items of the head run keep their order; the wrapped part shrinks first.
    fn drop_tail(&mut self, count: usize) {
        let wrapped = if self.start == 0 { 0 } else { self.end + 1 };
        let from_wrapped = count.min(wrapped);
        self.items.drain(self.end + 1 - from_wrapped..=self.end);
        self.start -= from_wrapped;
        let len = self.items.len() - (count - from_wrapped);
        self.items.truncate(len);
        self.end = (self.start + len - 1) % len;
    }

    /// Moves the window forward by up to `offset` items, overwriting the
    /// oldest slot each step. Stops early at the last item of the axis.
    fn recombine_forward<M>(&mut self, offset: usize, model: &M) -> usize
    where
        M: ExtentModel<Scalar = S>,
    {
        let len = self.items.len();
        let mut next = self.items[self.end].index + 1;
        let mut moved = 0;
        while moved < offset && next < self.real_count {
            let slot = self.start;
            self.items[slot] = model.item_at_index(next).into();
            self.end = slot;
            self.start = (slot + 1) % len;
            next += 1;
            moved += 1;
        }
        moved
    }

    /// Moves the window backward by up to `offset` items, overwriting the
    /// newest slot each step. Stops early at item `0`.
    fn recombine_backward<M>(&mut self, offset: usize, model: &M) -> usize
    where
        M: ExtentModel<Scalar = S>,
    {
        let len = self.items.len();
        let mut first = self.items[self.start].index;
        let mut moved = 0;
        while moved < offset {
            let Some(index) = first.checked_sub(1) else {
                break;
            };
            let slot = self.end;
            self.items[slot] = model.item_at_index(index).into();
            self.start = slot;
            self.end = (slot + len - 1) % len;
            first = index;
            moved += 1;
        }
        moved
    }

    /// Gives every windowed item the size `new_size`.
    ///
    /// One pass over the ring in logical order, starting at `start`. Each
    /// item is placed on the uniform grid of `new_size` (item `i` spans
    /// `[i * new_size, (i + 1) * new_size)`), which is where a uniform model
    /// of `new_size` puts it. Ring pointers and
    /// [`last_coordinate`](Self::last_coordinate) are left alone, and no model
    /// is consulted; the next recompute re-derives the span from
    /// `last_coordinate`.
    pub fn apply_uniform_size(&mut self, new_size: S) {
        debug_assert!(
            new_size.is_finite() && !new_size.is_sign_negative(),
            "item sizes must be finite and non-negative; got {new_size:?}"
        );
        self.relayout(|index| PositionItem {
            index,
            start: S::from_usize(index) * new_size,
            end: S::from_usize(index + 1) * new_size,
        });
    }

    /// Re-reads the span of every windowed item from `model`.
    ///
    /// Use this after size overrides change for items that are already in the
    /// window; ring pointers are left alone. A recompute afterwards restores
    /// coverage if items shrank.
    pub fn apply_sizes<M>(&mut self, model: &M)
    where
        M: ExtentModel<Scalar = S>,
    {
        self.relayout(|index| model.item_at_index(index));
    }

    fn relayout(&mut self, span_of: impl Fn(usize) -> PositionItem<S>) {
        let len = self.items.len();
        for k in 0..len {
            let slot = (self.start + k) % len;
            self.items[slot] = span_of(self.items[slot].index).into();
        }
    }

    fn debug_check_ring(&self) {
        debug_assert!(
            self.items.is_empty() || self.end == (self.start + self.items.len() - 1) % self.items.len(),
            "ring pointers out of sync: start={}, end={}, len={}",
            self.start,
            self.end,
            self.items.len()
        );
        debug_assert!(
            self.iter()
                .zip(self.iter().skip(1))
                .all(|(a, b)| b.index == a.index + 1),
            "window items must be index-contiguous"
        );
    }
}
