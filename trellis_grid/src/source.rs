// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits: where cells come from and who hears about them.

use core::num::NonZeroUsize;

use kurbo::Size;
use trellis_layout::GridMetrics;

use crate::cell::{Cell, CellContent, Decoration};
use crate::pool::{ReuseQueue, ViewId};

/// Supplies the cell count and configured cells.
///
/// The data source must already reflect a mutation when the grid is told about
/// it: after `insert_cells`, `cell_count` returns the larger count and
/// `cell_for_index` serves the new items.
pub trait GridDataSource {
    /// Caller-defined content carried by each cell.
    type Content: CellContent;

    /// Number of items.
    fn cell_count(&self) -> usize;

    /// Returns a configured cell for `index`.
    ///
    /// Implementations dequeue a view from `cells`, configure its content for
    /// the item at `index`, and return the view's id.
    fn cell_for_index(
        &mut self,
        cells: &mut ReuseQueue<'_, Cell<Self::Content>>,
        index: usize,
    ) -> ViewId;

    /// Whether the item at `index` may be picked up and reordered.
    fn can_move(&self, _index: usize) -> bool {
        true
    }

    /// Whether the item at `index` may be selected in edit mode.
    fn can_edit(&self, _index: usize) -> bool {
        true
    }
}

/// Provides geometry and receives notifications.
///
/// Only [`cell_size`](Self::cell_size) and [`cells_per_row`](Self::cells_per_row)
/// are required. Optional geometry answers are read once when the grid is built
/// and again on `reload_data`.
pub trait GridDelegate<C> {
    /// Caller-defined content carried by each decoration view.
    type Decoration;

    /// Size of every cell.
    fn cell_size(&self) -> Size;

    /// Number of cells per row. Must be at least one.
    fn cells_per_row(&self) -> usize;

    /// Horizontal padding (left and right) and vertical padding (above each row).
    fn padding(&self) -> Option<Size> {
        None
    }

    /// Row height; defaults to the cell height plus the vertical padding.
    fn row_height(&self) -> Option<f64> {
        None
    }

    /// Extra vertical offset of cells within their row.
    fn cell_row_offset(&self) -> Option<f64> {
        None
    }

    /// Whether each visible row gets a decoration view.
    fn provides_decorations(&self) -> bool {
        false
    }

    /// Returns a configured decoration view for `row`, or `None` to leave the
    /// row undecorated.
    fn decoration_for_row(
        &mut self,
        _decorations: &mut ReuseQueue<'_, Decoration<Self::Decoration>>,
        _row: usize,
    ) -> Option<ViewId> {
        None
    }

    /// The cell is about to be shown for `index`.
    fn will_display(&mut self, _cell: &mut Cell<C>, _index: usize) {}

    /// The cell stopped showing `index` and is about to be recycled.
    fn did_end_display(&mut self, _cell: &Cell<C>, _index: usize) {}

    /// A cell was tapped outside edit mode.
    fn did_tap(&mut self, _index: usize) {}

    /// A cell was long-pressed outside edit mode.
    fn did_long_tap(&mut self, _index: usize) {}

    /// A drag moved the item at `from` to `to`. The data source must reorder
    /// its items accordingly.
    fn did_move(&mut self, _from: usize, _to: usize) {}

    /// A cell was pressed.
    fn did_highlight(&mut self, _index: usize) {}

    /// A press ended or left the cell.
    fn did_unhighlight(&mut self, _index: usize) {}

    /// A `scroll_to_cell` reached its target offset.
    fn did_scroll_to_cell(&mut self, _index: usize) {}
}

/// Delegate geometry resolved into metrics.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Resolved {
    pub(crate) metrics: GridMetrics,
    pub(crate) decorations: bool,
}

/// Reads every optional geometry answer once.
pub(crate) fn resolve_metrics<C, G: GridDelegate<C> + ?Sized>(
    delegate: &G,
    header_height: f64,
) -> Resolved {
    let per_row = delegate.cells_per_row();
    debug_assert!(per_row > 0, "cells_per_row must be at least one");
    let per_row = NonZeroUsize::new(per_row).unwrap_or_else(|| {
        tracing::error!("delegate returned zero cells per row, using one");
        NonZeroUsize::MIN
    });

    let mut metrics = GridMetrics::new(delegate.cell_size(), per_row)
        .with_header_height(header_height);
    if let Some(padding) = delegate.padding() {
        metrics = metrics.with_padding(padding);
    }
    if let Some(row_height) = delegate.row_height() {
        metrics = metrics.with_row_height(row_height);
    }
    if let Some(offset) = delegate.cell_row_offset() {
        metrics = metrics.with_cell_row_offset(offset);
    }
    Resolved {
        metrics,
        decorations: delegate.provides_decorations(),
    }
}
