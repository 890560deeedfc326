// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A controller that owns one axis' size index, window, and scroll state.

use alloc::vec::Vec;

use crate::{DimensionIndex, Recompute, Scalar, ViewportWindow, VirtualPositionItem};

/// Alignment mode when scrolling a specific index into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the start (top/leading edge) of the item with the viewport.
    Start,
    /// Center the item within the viewport.
    Center,
    /// Align the end (bottom/trailing edge) of the item with the viewport.
    End,
    /// Move just enough to make the item fully visible, preferring the
    /// smallest change from the current scroll offset.
    Nearest,
}

/// Host-side state for one grid axis (rows or columns).
///
/// This type:
/// - holds the current [`DimensionIndex`] snapshot and replaces it on every
///   size or count change,
/// - owns the [`ViewportWindow`] and recomputes it whenever the scroll
///   offset, viewport extent, item count, or sizes change,
/// - keeps the scroll offset within the content,
/// - exposes index-aligned scrolling and visibility queries.
///
/// Callers are expected to coalesce high-frequency scroll input before
/// calling [`set_scroll_offset`](Self::set_scroll_offset); every call runs a
/// recompute.
#[derive(Debug, Clone)]
pub struct GridAxis<S: Scalar> {
    dimension: DimensionIndex<S>,
    window: ViewportWindow<S>,
    scroll_offset: S,
}

impl<S: Scalar> GridAxis<S> {
    /// Creates an axis of `count` items of `origin_size`, seen through a
    /// viewport of `viewport_extent`.
    #[must_use]
    pub fn new(count: usize, origin_size: S, viewport_extent: S) -> Self {
        let mut axis = Self {
            dimension: DimensionIndex::new(origin_size).with_count(count),
            window: ViewportWindow::new(viewport_extent, count),
            scroll_offset: S::zero(),
        };
        axis.refresh(false);
        axis
    }

    /// Creates an axis from an existing size index.
    #[must_use]
    pub fn with_dimension(dimension: DimensionIndex<S>, viewport_extent: S) -> Self {
        let count = dimension.count();
        let mut axis = Self {
            dimension,
            window: ViewportWindow::new(viewport_extent, count),
            scroll_offset: S::zero(),
        };
        axis.refresh(false);
        axis
    }

    /// The current size index.
    #[must_use]
    pub fn dimension(&self) -> &DimensionIndex<S> {
        &self.dimension
    }

    /// The current window.
    #[must_use]
    pub fn window(&self) -> &ViewportWindow<S> {
        &self.window
    }

    /// Number of items on the axis.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.dimension.count()
    }

    /// Total size of the axis.
    #[must_use]
    pub const fn content_extent(&self) -> S {
        self.dimension.real_size()
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> S {
        self.scroll_offset
    }

    /// Returns the current viewport extent.
    #[must_use]
    pub const fn viewport_extent(&self) -> S {
        self.window.virtual_size()
    }

    /// Sets the scroll offset, clamped into the content, and recomputes.
    pub fn set_scroll_offset(&mut self, offset: S) -> Recompute {
        self.scroll_offset = self.clamp_to_content(offset);
        self.refresh(false)
    }

    /// Adjusts the scroll offset by `delta`.
    pub fn scroll_by(&mut self, delta: S) -> Recompute {
        self.set_scroll_offset(self.scroll_offset + delta)
    }

    /// Sets the viewport extent. The window is rebuilt.
    pub fn set_viewport_extent(&mut self, extent: S) {
        self.window.set_virtual_size(extent);
        self.scroll_offset = self.clamp_to_content(self.scroll_offset);
        self.refresh(false);
    }

    /// Sets the prefetch margin, in origin-size items per side.
    pub fn set_frame_offset(&mut self, frame_offset: usize) {
        self.window.set_frame_offset(frame_offset);
        self.refresh(false);
    }

    /// Sets the number of items. The window is rebuilt.
    pub fn set_count(&mut self, count: usize) {
        self.dimension = self.dimension.with_count(count);
        self.window.set_real_count(count);
        self.scroll_offset = self.clamp_to_content(self.scroll_offset);
        self.refresh(false);
    }

    /// Applies custom sizes to some items.
    ///
    /// Items already in the window keep their slots; their spans are re-read
    /// from the new size index before the window is brought up to date.
    pub fn set_sizes<I>(&mut self, sizes: I)
    where
        I: IntoIterator<Item = (usize, S)>,
    {
        self.dimension = self.dimension.apply_size_overrides(sizes);
        self.window.apply_sizes(&self.dimension);
        self.scroll_offset = self.clamp_to_content(self.scroll_offset);
        self.refresh(false);
    }

    /// Changes the uniform size of items without a custom size.
    pub fn set_origin_size(&mut self, origin_size: S) {
        self.dimension = self.dimension.with_origin_size(origin_size);
        if self.dimension.indexes().is_empty() {
            self.window.apply_uniform_size(origin_size);
        } else {
            self.window.apply_sizes(&self.dimension);
        }
        self.scroll_offset = self.clamp_to_content(self.scroll_offset);
        self.refresh(false);
    }

    /// Takes the items in `removed` out of the axis, for example when rows
    /// are filtered out. Custom sizes of the remaining items follow them.
    pub fn remove_items<I>(&mut self, removed: I)
    where
        I: IntoIterator<Item = usize>,
    {
        let count = self.count();
        let mut removed: Vec<usize> = removed.into_iter().filter(|&i| i < count).collect();
        removed.sort_unstable();
        removed.dedup();
        if removed.is_empty() {
            return;
        }

        let sizes = self.dimension.remove_and_shift(removed.iter().copied());
        let count = count - removed.len();
        self.dimension = self.dimension.with_count(count).replace_sizes(sizes);
        self.window.set_real_count(count);
        self.scroll_offset = self.clamp_to_content(self.scroll_offset);
        self.refresh(false);
    }

    /// Splices a new item of `size` in at `at`, for example an expanded
    /// detail row. Items from `at` onward move up by one.
    pub fn insert_item(&mut self, at: usize, size: S) {
        let count = self.count() + 1;
        let at = at.min(count - 1);
        let sizes = self.dimension.insert_and_shift(at, size);
        self.dimension = self.dimension.with_count(count).replace_sizes(sizes);
        self.window.set_real_count(count);
        self.refresh(false);
    }

    /// Items overlapping the viewport at the current scroll offset.
    pub fn visible_items(&self) -> impl DoubleEndedIterator<Item = &VirtualPositionItem<S>> + '_ {
        let from = self.scroll_offset;
        self.window.items_in(from, from + self.window.virtual_size())
    }

    /// Returns the first visible index, if any.
    #[must_use]
    pub fn first_visible_index(&self) -> Option<usize> {
        self.visible_items().next().map(|item| item.index)
    }

    /// Returns the last visible index, if any.
    #[must_use]
    pub fn last_visible_index(&self) -> Option<usize> {
        self.visible_items().next_back().map(|item| item.index)
    }

    /// Returns `true` if the given index is fully visible within the viewport.
    #[must_use]
    pub fn is_index_fully_visible(&self, index: usize) -> bool {
        if index >= self.count() {
            return false;
        }
        let item = self.dimension.item_at_index(index);
        let view_start = self.scroll_offset;
        let view_end = self.scroll_offset + self.viewport_extent();
        item.start >= view_start && item.end <= view_end
    }

    /// Returns `true` if the given index overlaps the viewport at all.
    #[must_use]
    pub fn is_index_partially_visible(&self, index: usize) -> bool {
        if index >= self.count() {
            return false;
        }
        let item = self.dimension.item_at_index(index);
        let view_start = self.scroll_offset;
        let view_end = self.scroll_offset + self.viewport_extent();
        item.end > view_start && item.start < view_end
    }

    /// Scrolls so that item `index` is brought into view using the given alignment.
    ///
    /// - [`ScrollAlign::Start`] aligns the start of the item with the start of the viewport.
    /// - [`ScrollAlign::End`] aligns the end of the item with the end of the viewport.
    /// - [`ScrollAlign::Center`] centers the item within the viewport.
    /// - [`ScrollAlign::Nearest`] moves just enough to make the item fully visible, preferring
    ///   the smallest change from the current scroll offset.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) -> Recompute {
        if self.count() == 0 {
            return self.set_scroll_offset(S::zero());
        }
        let item = self.dimension.item_at_index(index);
        let viewport = self.viewport_extent();

        let new_offset = match align {
            ScrollAlign::Start => item.start,
            ScrollAlign::End => (item.end - viewport).clamp_non_negative(),
            ScrollAlign::Center => {
                let half = S::from_usize(2);
                ((item.start + item.end) / half - viewport / half).clamp_non_negative()
            }
            ScrollAlign::Nearest => {
                let current = self.scroll_offset;
                if item.start >= current && item.end <= current + viewport {
                    current
                } else if item.start < current {
                    item.start
                } else {
                    (item.end - viewport).clamp_non_negative()
                }
            }
        };

        self.set_scroll_offset(new_offset)
    }

    fn clamp_to_content(&self, offset: S) -> S {
        let max_offset = (self.content_extent() - self.viewport_extent()).clamp_non_negative();
        offset.clamp_between(S::zero(), max_offset)
    }

    fn refresh(&mut self, force: bool) -> Recompute {
        self.window
            .recompute(self.scroll_offset, &self.dimension, force)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{GridAxis, ScrollAlign};
    use crate::{PositionItem, Recompute};

    fn visible(axis: &GridAxis<f32>) -> Vec<usize> {
        axis.visible_items().map(|item| item.index).collect()
    }

    #[test]
    fn visible_items_track_scroll_and_viewport() {
        let mut axis = GridAxis::new(100, 10.0_f32, 50.0);

        assert_eq!(visible(&axis), [0, 1, 2, 3, 4]);

        axis.scroll_by(10.0);
        assert_eq!(visible(&axis), [1, 2, 3, 4, 5]);
        assert_eq!(axis.first_visible_index(), Some(1));
        assert_eq!(axis.last_visible_index(), Some(5));
        // One margin item on each side stays materialized.
        assert_eq!(axis.window().first().map(|item| item.index), Some(0));
        assert_eq!(axis.window().last().map(|item| item.index), Some(6));
    }

    #[test]
    fn scroll_to_index_aligns_against_custom_sizes() {
        // Item 2 is 50 tall: 0, 10, 20..70, 70, 80, ... 140.
        let mut axis = GridAxis::new(10, 10.0_f32, 30.0);
        axis.set_sizes([(2, 50.0)]);
        assert_eq!(axis.content_extent(), 140.0);

        axis.scroll_to_index(3, ScrollAlign::Start);
        assert_eq!(axis.scroll_offset(), 70.0);
        assert_eq!(axis.first_visible_index(), Some(3));

        axis.scroll_to_index(3, ScrollAlign::End);
        assert_eq!(axis.scroll_offset(), 50.0);

        axis.scroll_to_index(3, ScrollAlign::Center);
        assert_eq!(axis.scroll_offset(), 60.0);

        // Already fully visible: no movement.
        axis.scroll_to_index(3, ScrollAlign::Nearest);
        assert_eq!(axis.scroll_offset(), 60.0);

        // Taller than the viewport and above it: its start wins.
        axis.scroll_to_index(2, ScrollAlign::Nearest);
        assert_eq!(axis.scroll_offset(), 20.0);

        axis.scroll_to_index(9, ScrollAlign::Nearest);
        assert_eq!(axis.scroll_offset(), 110.0);
        assert_eq!(axis.last_visible_index(), Some(9));
    }

    #[test]
    fn scroll_offset_is_clamped_to_content() {
        // 5 items * 10 = 50 content, viewport = 30 → max offset = 20.
        let mut axis = GridAxis::new(5, 10.0_f32, 30.0);
        axis.set_scroll_offset(100.0);
        assert!((axis.scroll_offset() - 20.0_f32).abs() < f32::EPSILON);
        assert_eq!(axis.window().last().map(|item| item.index), Some(4));

        // When content fits inside the viewport, clamp to 0.
        let mut axis = GridAxis::new(2, 10.0_f32, 30.0);
        axis.set_scroll_offset(10.0);
        assert!((axis.scroll_offset() - 0.0_f32).abs() < f32::EPSILON);
    }

    #[test]
    fn visibility_follows_custom_spans() {
        let mut axis = GridAxis::new(10, 10.0_f32, 30.0);
        axis.set_sizes([(2, 50.0)]);

        assert!(axis.is_index_fully_visible(1));
        assert!(!axis.is_index_fully_visible(2));
        assert!(axis.is_index_partially_visible(2));
        assert!(!axis.is_index_partially_visible(3));

        // The viewport sits inside item 2.
        axis.set_scroll_offset(25.0);
        assert!(!axis.is_index_partially_visible(1));
        assert!(axis.is_index_partially_visible(2));
        assert!(!axis.is_index_fully_visible(2));
        assert_eq!(visible(&axis), [2]);

        axis.scroll_by(45.0);
        assert!(!axis.is_index_partially_visible(2));
        for index in 3..=5 {
            assert!(axis.is_index_fully_visible(index));
        }
        assert!(!axis.is_index_partially_visible(6));
        assert!(!axis.is_index_fully_visible(42));
    }

    #[test]
    fn smooth_scrolling_reuses_slots() {
        let mut axis = GridAxis::new(1000, 20.0_f32, 100.0);
        assert_eq!(axis.set_scroll_offset(205.0), Recompute::Rebuilt { len: 8 });
        assert_eq!(axis.scroll_by(10.0), Recompute::Unchanged);
        assert_eq!(
            axis.scroll_by(6.0),
            Recompute::Recombined {
                moved: 1,
                added: 0,
                removed: 0
            }
        );
    }

    #[test]
    fn custom_sizes_move_following_items() {
        let mut axis = GridAxis::new(1000, 20.0_f32, 100.0);
        axis.set_scroll_offset(205.0);
        axis.set_sizes([(10, 60.0)]);

        assert_eq!(axis.content_extent(), 20_040.0);
        let items: Vec<_> = axis.window().iter().map(|item| item.position()).collect();
        assert!(items.contains(&PositionItem::with_size(10, 200.0, 60.0)));
        assert!(items.contains(&PositionItem::with_size(11, 260.0, 20.0)));
        // Still covers the viewport after the growth.
        assert!(items.last().unwrap().end >= 305.0);
    }

    #[test]
    fn removing_items_shifts_their_sizes() {
        let mut axis = GridAxis::new(10, 20.0_f32, 100.0);
        axis.set_sizes([(3, 40.0), (7, 40.0)]);
        axis.remove_items([3, 42]);

        assert_eq!(axis.count(), 9);
        assert_eq!(axis.dimension().indexes(), &[6]);
        assert_eq!(axis.content_extent(), 9.0 * 20.0 + 20.0);
        assert_eq!(axis.window().real_count(), 9);
    }

    #[test]
    fn inserting_an_item_splices_it_in() {
        let mut axis = GridAxis::new(10, 20.0_f32, 100.0);
        axis.set_sizes([(3, 40.0)]);
        axis.insert_item(2, 80.0);

        assert_eq!(axis.count(), 11);
        assert_eq!(axis.dimension().indexes(), &[2, 4]);
        assert_eq!(
            axis.dimension().item_at_index(4),
            PositionItem::with_size(4, 140.0, 40.0)
        );
        let indices: Vec<_> = axis.window().iter().map(|item| item.index).collect();
        // The wide row fills the rest of the viewport.
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn origin_size_change_relayouts_the_window() {
        let mut axis = GridAxis::new(1000, 20.0_f32, 100.0);
        axis.set_scroll_offset(205.0);
        axis.set_origin_size(10.0);

        assert_eq!(axis.content_extent(), 10_000.0);
        let items = axis.window().to_vec();
        for pair in items.windows(2) {
            assert_eq!(pair[1].start, pair[0].end);
        }
        for item in &items {
            assert_eq!(item.size, 10.0);
            assert_eq!(item.start, item.index as f32 * 10.0);
        }
        let first = items.first().unwrap();
        let last = items.last().unwrap();
        assert!(first.start <= 205.0 && last.end >= 305.0);
    }
}
