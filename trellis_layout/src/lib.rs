// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: geometry for virtualized, row-major cell grids.
//!
//! This crate provides a small, renderer-agnostic core that maps a flat strip of
//! cells indexed `0..cell_count` onto rows of a vertically scrolling grid, and
//! answers the question every recycling grid asks on each scroll event: which
//! indices should have a view right now?
//!
//! The core concepts are:
//!
//! - [`GridMetrics`]: resolved geometry (cell size, cells per row, padding, row
//!   height, in-row offset, header height, overscan) and the pure index ↔ rect
//!   mappings derived from it.
//! - [`compute_visible_range`]: given a cell count, viewport size and scroll
//!   offset, returns the [`VisibleRange`] of cells whose rects overlap the
//!   viewport grown by one row of slack on each side.
//! - [`GridLayout`]: a controller that owns metrics, cell count, viewport and
//!   scroll offset, caches the last [`VisibleRange`], and offers index-aligned
//!   scrolling via [`ScrollPosition`].
//!
//! This crate deliberately does **not** know about views or widgets. Host
//! frameworks are responsible for:
//!
//! - Calling [`GridLayout::visible_range`] when scroll, viewport or count change.
//! - Diffing the returned `[start, end)` range to bind and recycle views.
//! - Positioning each bound view at [`GridLayout::rect_of`].
//!
//! ## Minimal example
//!
//! ```rust
//! use core::num::NonZeroUsize;
//! use kurbo::Size;
//! use trellis_layout::{GridLayout, GridMetrics, ScrollPosition};
//!
//! // 80×80 cells, four to a row.
//! let metrics = GridMetrics::new(Size::new(80.0, 80.0), NonZeroUsize::new(4).unwrap());
//! let mut layout = GridLayout::new(metrics, 100);
//! layout.set_viewport(Size::new(320.0, 240.0));
//!
//! // Three rows on screen plus one row of slack below.
//! let range = layout.visible_range();
//! assert_eq!((range.start, range.end), (0, 16));
//!
//! // Bring cell 50 to the top of the viewport.
//! let offset = layout.scroll_offset_for_index(50, ScrollPosition::Top).unwrap();
//! layout.set_scroll_offset(offset);
//! assert!(layout.visible_range().contains(50));
//! ```
//!
//! All coordinates are logical pixels in content space (the viewport's top edge
//! sits at the scroll offset) and are expected to be finite.
//!
//! This crate is `no_std` and uses `alloc` in tests only.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod layout;
mod metrics;
mod range;
mod util;

pub use layout::{GridLayout, ScrollPosition};
pub use metrics::GridMetrics;
pub use range::{VisibleRange, compute_visible_range};
