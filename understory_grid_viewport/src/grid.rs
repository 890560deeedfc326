// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two [`GridAxis`] values paired into a scrollable grid.
//!
//! Rows scroll vertically and columns horizontally. Each axis keeps its own
//! window and its own size overrides; the materialized cells are the cross
//! product of the two windows.

use crate::{GridAxis, Recompute, Scalar, VirtualPositionItem};

/// One materialized cell of a [`GridViewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleCell<S: Scalar> {
    /// Row of the cell, with its vertical span.
    pub row: VirtualPositionItem<S>,
    /// Column of the cell, with its horizontal span.
    pub column: VirtualPositionItem<S>,
}

impl<S: Scalar> VisibleCell<S> {
    /// `(x, y, width, height)` of the cell in content coordinates.
    #[must_use]
    pub fn rect(&self) -> (S, S, S, S) {
        (
            self.column.start,
            self.row.start,
            self.column.size,
            self.row.size,
        )
    }
}

/// A grid made of a row axis and a column axis.
#[derive(Debug, Clone)]
pub struct GridViewport<S: Scalar> {
    /// Vertical axis.
    pub rows: GridAxis<S>,
    /// Horizontal axis.
    pub columns: GridAxis<S>,
}

impl<S: Scalar> GridViewport<S> {
    /// Creates a grid from its two axes.
    #[must_use]
    pub fn new(rows: GridAxis<S>, columns: GridAxis<S>) -> Self {
        Self { rows, columns }
    }

    /// Scrolls both axes. Returns the rows' outcome then the columns'.
    pub fn set_scroll(&mut self, x: S, y: S) -> (Recompute, Recompute) {
        let rows = self.rows.set_scroll_offset(y);
        let columns = self.columns.set_scroll_offset(x);
        (rows, columns)
    }

    /// Resizes the viewport of both axes.
    pub fn set_viewport_size(&mut self, width: S, height: S) {
        self.rows.set_viewport_extent(height);
        self.columns.set_viewport_extent(width);
    }

    /// `(width, height)` of the whole content.
    #[must_use]
    pub fn content_size(&self) -> (S, S) {
        (self.columns.content_extent(), self.rows.content_extent())
    }

    /// Every materialized cell, margins included, row by row.
    pub fn cells(&self) -> impl Iterator<Item = VisibleCell<S>> + '_ {
        self.rows.window().iter().flat_map(move |&row| {
            self.columns
                .window()
                .iter()
                .map(move |&column| VisibleCell { row, column })
        })
    }

    /// Cells overlapping the viewport, row by row.
    pub fn visible_cells(&self) -> impl Iterator<Item = VisibleCell<S>> + '_ {
        self.rows.visible_items().flat_map(move |&row| {
            self.columns
                .visible_items()
                .map(move |&column| VisibleCell { row, column })
        })
    }
}
