// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_grid_viewport --heading-base-level=0

//! Understory Grid Viewport: per-axis windowing for large data grids.
//!
//! A data grid with millions of rows (or thousands of columns) only ever shows
//! a handful of them. This crate computes, for one axis at a time, which items
//! to materialize for the current scroll position and where they sit, while
//! most items share a uniform size and a few have custom ones.
//!
//! The core concepts are:
//!
//! - [`Scalar`]: a small abstraction over `f32`/`f64` used for sizes, positions,
//!   and scroll coordinates.
//! - [`DimensionIndex`]: a sparse size index. Items default to an origin size;
//!   items with a custom size become anchors, kept sorted so that lookups by
//!   pixel position or by index are a binary search plus stride arithmetic.
//!   Every mutation returns a new snapshot.
//! - [`ViewportWindow`]: the materialized items for the current scroll position,
//!   plus a prefetch margin, kept in a ring buffer. Small scrolls overwrite the
//!   slots that fell out of view instead of rebuilding the buffer, and
//!   [`ViewportWindow::recompute`] reports which path it took as a [`Recompute`].
//! - [`ExtentModel`]: the seam between the window and a size model, implemented
//!   by [`DimensionIndex`] and by the uniform [`FixedExtentModel`].
//! - [`GridAxis`]: a host-side controller owning one axis' index, window, and
//!   scroll offset, with index-based scrolling via [`ScrollAlign`], item
//!   removal and insertion, and visibility queries.
//! - [`GridViewport`]: a row axis and a column axis paired into a grid that
//!   yields [`VisibleCell`]s.
//!
//! This crate deliberately does **not** know about widgets, cell contents, or
//! any particular UI framework. Host frameworks are responsible for:
//!
//! - Owning the data and the view instances.
//! - Feeding scroll offsets, viewport sizes, item counts, and measured sizes in.
//! - Creating or recycling views for the items of the window; the physical
//!   slot of an item ([`ViewportWindow::physical_slot`]) is stable across small
//!   scrolls and can key recycled views.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_grid_viewport::{DimensionIndex, Recompute, ViewportWindow};
//!
//! // 1000 rows, 20 logical pixels tall, with one tall row.
//! let rows = DimensionIndex::new(20.0)
//!     .with_count(1000)
//!     .apply_size_overrides([(5, 50.0)]);
//! assert_eq!(rows.real_size(), 20_030.0);
//!
//! // A 100px viewport scrolled to 205px.
//! let mut window = ViewportWindow::new(100.0, rows.count());
//! assert!(matches!(window.recompute(205.0, &rows, false), Recompute::Rebuilt { .. }));
//!
//! // The window covers the viewport plus one row of margin on each side.
//! let first = window.first().unwrap();
//! let last = window.last().unwrap();
//! assert!(first.start <= 185.0 && last.end >= 325.0);
//!
//! // A small scroll reuses slots instead of rebuilding.
//! let outcome = window.recompute(245.0, &rows, false);
//! assert!(matches!(outcome, Recompute::Recombined { .. }));
//! ```
//!
//! ## Grid example
//!
//! ```rust
//! use understory_grid_viewport::{GridAxis, GridViewport};
//!
//! let mut grid = GridViewport::new(
//!     GridAxis::new(1_000_000, 24.0_f64, 600.0),
//!     GridAxis::new(40, 120.0, 800.0),
//! );
//! grid.columns.set_sizes([(0, 300.0)]);
//! grid.set_scroll(0.0, 48_000.0);
//!
//! for cell in grid.visible_cells() {
//!     let (_x, _y, _width, _height) = cell.rect();
//!     // Host code renders the cell at (row.index, column.index) here.
//! }
//! assert_eq!(grid.rows.first_visible_index(), Some(2000));
//! ```
//!
//! All sizes and positions live in a caller-chosen 1D coordinate space per
//! axis (typically logical pixels) and are expected to be finite and
//! non-negative.
//!
//! ## Features
//!
//! - `std` (enabled by default): forwards to optional dependencies.
//! - `tracing`: emits spans and events from window recomputation and size
//!   index mutations through the [`tracing`](https://docs.rs/tracing) crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod axis;
mod dimension;
mod fixed;
mod grid;
mod model;
mod scalar;
mod window;

pub use axis::{GridAxis, ScrollAlign};
pub use dimension::{DimensionIndex, SizeMap};
pub use fixed::FixedExtentModel;
pub use grid::{GridViewport, VisibleCell};
pub use model::{ExtentModel, PositionItem, VirtualPositionItem};
pub use scalar::Scalar;
pub use window::{Recompute, ViewportWindow};
