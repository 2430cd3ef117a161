// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that owns grid metrics, cell count and scroll state.

use core::ops::Range;

use kurbo::{Point, Rect, Size};

use crate::{GridMetrics, VisibleRange, compute_visible_range};

/// Where a cell should end up when scrolling it into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    /// Align the top of the cell's row (including padding) with the top of the viewport.
    #[default]
    Top,
    /// Center the cell vertically within the viewport.
    Middle,
    /// Align the bottom of the cell (including padding) with the bottom of the viewport.
    Bottom,
    /// Move just enough to make the cell fully visible, or not at all.
    Nearest,
}

/// Controller for a virtualized, vertically scrolling grid.
///
/// This type:
/// - stores the [`GridMetrics`], cell count, viewport size and scroll offset,
/// - caches the last computed [`VisibleRange`] and only recomputes it after one
///   of those inputs changed,
/// - answers geometry queries (cell rects, row rects, content height, reverse
///   point → index mapping) against the current viewport width.
///
/// It does *not* own any views. Hosts diff successive ranges to decide which
/// views to bind and which to recycle.
#[derive(Debug, Clone)]
pub struct GridLayout {
    metrics: GridMetrics,
    cell_count: usize,
    viewport: Size,
    scroll_offset: f64,

    dirty: bool,
    last_range: VisibleRange,
}

impl GridLayout {
    /// Creates a new layout over `cell_count` cells with an empty viewport.
    #[must_use]
    pub fn new(metrics: GridMetrics, cell_count: usize) -> Self {
        Self {
            metrics,
            cell_count,
            viewport: Size::ZERO,
            scroll_offset: 0.0,
            dirty: true,
            last_range: VisibleRange::EMPTY,
        }
    }

    /// Returns the current metrics.
    #[must_use]
    pub const fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// Replaces the metrics.
    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        if metrics != self.metrics {
            self.metrics = metrics;
            self.dirty = true;
        }
    }

    /// Returns the number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Sets the number of cells.
    pub fn set_cell_count(&mut self, cell_count: usize) {
        if cell_count != self.cell_count {
            self.cell_count = cell_count;
            self.dirty = true;
        }
    }

    /// Returns the viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Sets the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        let viewport = Size::new(viewport.width.max(0.0), viewport.height.max(0.0));
        if viewport != self.viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
    }

    /// Sets the header height, keeping every other metric.
    pub fn set_header_height(&mut self, header_height: f64) {
        self.set_metrics(self.metrics.with_header_height(header_height));
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Sets the scroll offset. Negative offsets are clamped to zero.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        let offset = offset.max(0.0);
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.dirty = true;
        }
    }

    /// Adjusts the scroll offset by `delta`.
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.scroll_offset + delta);
    }

    /// Computes or returns the cached visible range.
    #[must_use]
    pub fn visible_range(&mut self) -> VisibleRange {
        if self.dirty {
            self.last_range = compute_visible_range(
                &self.metrics,
                self.cell_count,
                self.viewport,
                self.scroll_offset,
            );
            self.dirty = false;
        }
        self.last_range
    }

    /// Rows touched by the current visible range.
    #[must_use]
    pub fn visible_rows(&mut self) -> Range<usize> {
        let per_row = self.metrics.cells_per_row();
        self.visible_range().rows(per_row)
    }

    /// Rect of the cell at `index`, or `None` if `index` is out of bounds.
    #[must_use]
    pub fn rect_of(&self, index: usize) -> Option<Rect> {
        (index < self.cell_count).then(|| self.slot_rect(index))
    }

    /// Rect of slot `index` regardless of the current cell count.
    ///
    /// Useful while a structural change is being animated and the slot is about
    /// to exist (or just stopped existing).
    #[must_use]
    pub fn slot_rect(&self, index: usize) -> Rect {
        self.metrics.rect_of(index, self.viewport.width)
    }

    /// Origin of the cell at `index`, or `None` if `index` is out of bounds.
    #[must_use]
    pub fn origin_of(&self, index: usize) -> Option<Point> {
        self.rect_of(index).map(|rect| rect.origin())
    }

    /// Rect covered by `row` across the full viewport width.
    #[must_use]
    pub fn row_rect(&self, row: usize) -> Rect {
        self.metrics.row_rect(row, self.viewport.width)
    }

    /// Total scrollable content size.
    #[must_use]
    pub fn content_size(&self) -> Size {
        Size::new(
            self.viewport.width,
            self.metrics.content_height(self.cell_count),
        )
    }

    /// Largest scroll offset that keeps the viewport inside the content.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        (self.metrics.content_height(self.cell_count) - self.viewport.height).max(0.0)
    }

    /// Clamps the current scroll offset into `0..=max_scroll_offset`.
    pub fn clamp_scroll_to_content(&mut self) {
        let clamped = self.scroll_offset.min(self.max_scroll_offset());
        self.set_scroll_offset(clamped);
    }

    /// Index whose cell contains `point` (content coordinates).
    #[must_use]
    pub fn index_at(&self, point: Point) -> Option<usize> {
        self.metrics
            .index_at(point, self.cell_count, self.viewport.width)
    }

    /// Nearest slot to `point` (content coordinates), clamped to valid indices.
    #[must_use]
    pub fn slot_at(&self, point: Point) -> Option<usize> {
        self.metrics
            .slot_at(point, self.cell_count, self.viewport.width)
    }

    /// Converts a point in viewport coordinates to content coordinates.
    #[must_use]
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(point.x, point.y + self.scroll_offset)
    }

    /// Converts a point in content coordinates to viewport coordinates.
    #[must_use]
    pub fn to_viewport(&self, point: Point) -> Point {
        Point::new(point.x, point.y - self.scroll_offset)
    }

    /// Returns `true` if the cell at `index` overlaps the viewport at all.
    #[must_use]
    pub fn is_index_visible(&self, index: usize) -> bool {
        self.rect_of(index).is_some_and(|rect| {
            rect.y1 > self.scroll_offset && rect.y0 < self.scroll_offset + self.viewport.height
        })
    }

    /// Scroll offset that brings `index` into view at `position`.
    ///
    /// The result is clamped to `0..=max_scroll_offset`. Returns `None` for an
    /// out-of-bounds index.
    #[must_use]
    pub fn scroll_offset_for_index(&self, index: usize, position: ScrollPosition) -> Option<f64> {
        let rect = self.rect_of(index)?;
        let padding = self.metrics.padding().height;
        let viewport = self.viewport.height;
        let top = rect.y0 - padding;
        let bottom = rect.y1 + padding;

        let offset = match position {
            ScrollPosition::Top => top,
            ScrollPosition::Bottom => bottom - viewport,
            ScrollPosition::Middle => (rect.y0 + rect.y1) / 2.0 - viewport / 2.0,
            ScrollPosition::Nearest => {
                let current = self.scroll_offset;
                if top >= current && bottom <= current + viewport {
                    current
                } else if top < current {
                    top
                } else {
                    bottom - viewport
                }
            }
        };
        Some(offset.clamp(0.0, self.max_scroll_offset()))
    }
}
