// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Grid: a recycling, editable grid view engine.
//!
//! [`GridView`] shows a long list of items as rows of equally sized cells in a
//! vertically scrolling viewport. Only the cells that intersect the viewport
//! (plus one row of slack on each side) have a view; views that scroll out are
//! recycled and handed back to the data source for the next index that scrolls
//! in.
//!
//! The grid is driven from outside:
//!
//! - A [`GridDataSource`] supplies the item count and configures cells,
//!   dequeuing them from a [`ReuseQueue`].
//! - A [`GridDelegate`] supplies geometry and hears about display, tap,
//!   highlight and move events.
//! - The host forwards viewport size, scroll offset and pointer input, and
//!   calls [`GridView::advance`] with elapsed time while
//!   [`GridView::needs_ticks`] is `true`. Animations, long presses and
//!   autoscroll all run on that clock. The first call after the grid went
//!   idle only restarts the clock, so idle time is never counted.
//! - After each call the host reads [`GridView::visible_cells`] and draws each
//!   [`Cell`] at its frame with its alpha.
//!
//! Mutations (`insert_cells`, `delete_cells`, `move_cell`, `reload_cells`)
//! keep the views of surviving items, shift selection with them and optionally
//! animate the transition. In edit mode taps toggle selection and a long press
//! picks a cell up for drag-to-reorder.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_grid::{Cell, CellContent, GridDataSource, GridDelegate, GridView, ReuseQueue, ViewId};
//!
//! #[derive(Default)]
//! struct Thumb {
//!     name: &'static str,
//! }
//!
//! impl CellContent for Thumb {}
//!
//! struct Photos(Vec<&'static str>);
//!
//! impl GridDataSource for Photos {
//!     type Content = Thumb;
//!
//!     fn cell_count(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn cell_for_index(&mut self, cells: &mut ReuseQueue<'_, Cell<Thumb>>, index: usize) -> ViewId {
//!         let name = self.0[index];
//!         cells.dequeue_with(|cell| cell.content_mut().name = name)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Album {
//!     tapped: Option<usize>,
//! }
//!
//! impl GridDelegate<Thumb> for Album {
//!     type Decoration = ();
//!
//!     fn cell_size(&self) -> Size {
//!         Size::new(100.0, 100.0)
//!     }
//!
//!     fn cells_per_row(&self) -> usize {
//!         3
//!     }
//!
//!     fn did_tap(&mut self, index: usize) {
//!         self.tapped = Some(index);
//!     }
//! }
//!
//! let photos = Photos(vec!["beach", "forest", "harbour", "market", "summit"]);
//! let mut grid = GridView::new(photos, Album::default());
//! grid.set_viewport_size(Size::new(300.0, 200.0));
//!
//! assert_eq!(grid.cell_at(3).unwrap().content().name, "market");
//! assert_eq!(grid.visible_cells().count(), 5);
//!
//! grid.pointer_down(Point::new(150.0, 50.0));
//! grid.pointer_up(Point::new(150.0, 50.0));
//! assert_eq!(grid.delegate().tapped, Some(1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod animation;
mod cell;
mod config;
mod error;
mod indices;
mod pool;
mod selection;
mod source;
mod view;

#[cfg(test)]
mod test_support;

pub use animation::Easing;
pub use cell::{Cell, CellContent, CellState, Decoration};
pub use config::GridConfig;
pub use error::GridError;
pub use pool::{ReuseQueue, ViewId};
pub use source::{GridDataSource, GridDelegate};
pub use view::GridView;

pub use trellis_gesture::AutoscrollConfig;
pub use trellis_layout::{ScrollPosition, VisibleRange};
