// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible range computation.

use core::ops::Range;

use kurbo::Size;

use crate::GridMetrics;
use crate::util::{ceil_to_isize, clamp_to_usize, floor_to_isize};

/// A contiguous, half-open interval of cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibleRange {
    /// First visible index (inclusive).
    pub start: usize,
    /// One past the last visible index (exclusive).
    pub end: usize,
}

impl VisibleRange {
    /// The empty range.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Returns `true` if there are no visible indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of visible indices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if `index` lies inside the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Iterates the visible indices in order.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Rows covered by this range for a grid of `cells_per_row` columns.
    #[must_use]
    pub fn rows(&self, cells_per_row: usize) -> Range<usize> {
        if self.is_empty() || cells_per_row == 0 {
            return 0..0;
        }
        self.start / cells_per_row..(self.end - 1) / cells_per_row + 1
    }
}

/// Compute the visible cell range of a vertically scrolling grid.
///
/// - `cell_count`: number of cells in the grid.
/// - `viewport`: size of the viewport; only the height bounds the range.
/// - `scroll_offset`: top of the viewport in content coordinates.
///
/// A cell is visible when its rect overlaps the viewport grown by
/// [`GridMetrics::overscan_rows`] rows above and below. Because rows are
/// uniform, the result is always the minimal contiguous interval of such cells:
/// whole rows, truncated at `cell_count`.
pub fn compute_visible_range(
    metrics: &GridMetrics,
    cell_count: usize,
    viewport: Size,
    scroll_offset: f64,
) -> VisibleRange {
    let row_height = metrics.row_height();
    if cell_count == 0 || row_height <= 0.0 {
        return VisibleRange::EMPTY;
    }

    let slack = row_height * metrics.overscan_rows() as f64;
    let min = scroll_offset - slack;
    let max = scroll_offset + viewport.height.max(0.0) + slack;
    if max <= min {
        return VisibleRange::EMPTY;
    }

    // Top of the cell in row `r` is `base + r * row_height`.
    let base = metrics.header_height() + metrics.padding().height + metrics.cell_row_offset();
    let cell_height = metrics.cell_size().height;
    let rows = metrics.row_count(cell_count);

    // First row whose bottom edge lies strictly below `min`.
    let first = clamp_to_usize(
        floor_to_isize((min - base - cell_height) / row_height) + 1,
        rows,
    );
    // First row whose top edge is at or below `max`; rows before it start above `max`.
    let end_row = clamp_to_usize(ceil_to_isize((max - base) / row_height), rows);

    if first >= end_row {
        return VisibleRange::EMPTY;
    }

    let per_row = metrics.cells_per_row();
    VisibleRange {
        start: first * per_row,
        end: (end_row * per_row).min(cell_count),
    }
}
