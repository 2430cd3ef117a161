// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording data source and delegate for unit tests.

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::Size;

use crate::cell::{Cell, CellContent, Decoration};
use crate::pool::{ReuseQueue, ViewId};
use crate::{GridDataSource, GridDelegate, GridView};

/// Cell content: the item value and how often the view was reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Label {
    pub(crate) value: Option<u32>,
    pub(crate) reuses: usize,
}

impl CellContent for Label {
    fn prepare_for_reuse(&mut self) {
        self.value = None;
        self.reuses += 1;
    }
}

#[derive(Debug, Default)]
pub(crate) struct TestSource {
    pub(crate) items: Vec<u32>,
    /// Every index `cell_for_index` was asked for, in order.
    pub(crate) fetched: Vec<usize>,
    pub(crate) immovable: Vec<usize>,
    pub(crate) locked: Vec<usize>,
}

impl TestSource {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            items: (0..count)
                .map(|i| u32::try_from(i).unwrap_or(u32::MAX))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn insert(&mut self, index: usize, value: u32) {
        self.items.insert(index, value);
    }

    /// Removes `indices` (pre-removal positions).
    pub(crate) fn remove(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        for index in sorted.into_iter().rev() {
            self.items.remove(index);
        }
    }

    /// Moves the item at `from` to `to`.
    pub(crate) fn shift(&mut self, from: usize, to: usize) {
        let item = self.items.remove(from);
        self.items.insert(to, item);
    }
}

impl GridDataSource for TestSource {
    type Content = Label;

    fn cell_count(&self) -> usize {
        self.items.len()
    }

    fn cell_for_index(&mut self, cells: &mut ReuseQueue<'_, Cell<Label>>, index: usize) -> ViewId {
        self.fetched.push(index);
        let value = self.items.get(index).copied();
        cells.dequeue_with(|cell| cell.content_mut().value = value)
    }

    fn can_move(&self, index: usize) -> bool {
        !self.immovable.contains(&index)
    }

    fn can_edit(&self, index: usize) -> bool {
        !self.locked.contains(&index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    WillDisplay(usize),
    EndDisplay(usize),
    Tap(usize),
    LongTap(usize),
    Move(usize, usize),
    Highlight(usize),
    Unhighlight(usize),
    ScrolledTo(usize),
}

/// 80×80 cells, four to a row; records every notification.
#[derive(Debug, Default)]
pub(crate) struct TestDelegate {
    pub(crate) events: Vec<Event>,
    pub(crate) decorations: bool,
}

impl TestDelegate {
    pub(crate) fn moves(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                Event::Move(from, to) => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}

impl GridDelegate<Label> for TestDelegate {
    type Decoration = usize;

    fn cell_size(&self) -> Size {
        Size::new(80.0, 80.0)
    }

    fn cells_per_row(&self) -> usize {
        4
    }

    fn provides_decorations(&self) -> bool {
        self.decorations
    }

    fn decoration_for_row(
        &mut self,
        decorations: &mut ReuseQueue<'_, Decoration<usize>>,
        row: usize,
    ) -> Option<ViewId> {
        Some(decorations.dequeue_with(|decoration| *decoration.content_mut() = row))
    }

    fn will_display(&mut self, _cell: &mut Cell<Label>, index: usize) {
        self.events.push(Event::WillDisplay(index));
    }

    fn did_end_display(&mut self, _cell: &Cell<Label>, index: usize) {
        self.events.push(Event::EndDisplay(index));
    }

    fn did_tap(&mut self, index: usize) {
        self.events.push(Event::Tap(index));
    }

    fn did_long_tap(&mut self, index: usize) {
        self.events.push(Event::LongTap(index));
    }

    fn did_move(&mut self, from: usize, to: usize) {
        self.events.push(Event::Move(from, to));
    }

    fn did_highlight(&mut self, index: usize) {
        self.events.push(Event::Highlight(index));
    }

    fn did_unhighlight(&mut self, index: usize) {
        self.events.push(Event::Unhighlight(index));
    }

    fn did_scroll_to_cell(&mut self, index: usize) {
        self.events.push(Event::ScrolledTo(index));
    }
}

pub(crate) type TestGrid = GridView<TestSource, TestDelegate>;

/// A grid of `count` cells in a 320×240 viewport (three rows visible).
pub(crate) fn grid(count: usize) -> TestGrid {
    let mut view = GridView::new(TestSource::new(count), TestDelegate::default());
    view.set_viewport_size(Size::new(320.0, 240.0));
    view
}

/// Like [`grid`], with one decoration view per row.
pub(crate) fn decorated_grid(count: usize) -> TestGrid {
    let delegate = TestDelegate {
        decorations: true,
        ..TestDelegate::default()
    };
    let mut view = GridView::new(TestSource::new(count), delegate);
    view.set_viewport_size(Size::new(320.0, 240.0));
    view
}

/// The first host frame after the grid went idle. Its elapsed time is not
/// counted; later frames are.
pub(crate) fn first_frame(view: &mut TestGrid) -> bool {
    view.advance(Duration::from_millis(16))
}

/// Every index has at most one bound view, bound views agree with their
/// index, and recycled views carry no index.
///
/// Once nothing is in flight the bound indices are exactly the visible range
/// and each bound cell shows the data source's item for its index.
pub(crate) fn assert_pool_invariant(view: &TestGrid) {
    let mut seen = Vec::new();
    for cell in view.visible_cells() {
        let id = cell.id();
        assert!(!seen.contains(&id), "view listed twice");
        seen.push(id);
        match cell.index() {
            Some(index) => {
                assert_eq!(view.cell_pool().id_at(index), Some(id), "stale index on view");
                assert!(!view.cell_pool().is_recycled(id), "bound view is recycled");
            }
            None => assert!(view.cell_pool().is_detached(id), "unbound view is not detached"),
        }
    }
    assert_eq!(
        seen.len() + view.cell_pool().recycled_len(),
        view.cell_pool().len(),
        "views leaked outside the pool"
    );

    if view.needs_ticks() || view.is_dragging() {
        return;
    }
    let bound: Vec<usize> = view.cell_pool().visible().map(|(index, _)| index).collect();
    let expected: Vec<usize> = view.visible_range().indices().collect();
    assert_eq!(bound, expected, "bound indices differ from the visible range");
    for index in bound {
        let cell = view.cell_at(index).unwrap();
        assert_eq!(
            cell.content().value,
            view.data_source().items.get(index).copied(),
            "cell {index} shows another item"
        );
    }
}
