// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cells, decoration views and their visual state.

use kurbo::Rect;

use crate::pool::{Reusable, ViewId};

bitflags::bitflags! {
    /// Visual state flags of a cell.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CellState: u8 {
        /// The grid is in edit mode.
        const EDITING     = 0b0000_0001;
        /// The cell's index is in the selection.
        const SELECTED    = 0b0000_0010;
        /// The cell is pressed outside edit mode.
        const HIGHLIGHTED = 0b0000_0100;
        /// The cell is picked up by a drag.
        const DRAGGING    = 0b0000_1000;
    }
}

impl CellState {
    /// Flags that never survive recycling.
    pub const TRANSIENT: Self = Self::SELECTED
        .union(Self::HIGHLIGHTED)
        .union(Self::DRAGGING);
}

/// Caller-supplied content of a cell.
///
/// Both hooks are optional. They let content react to state changes (for
/// example, showing a checkmark when selected) and drop per-item data before
/// the cell is reused for another index.
pub trait CellContent {
    /// Called when the cell moves to the recycled set.
    fn prepare_for_reuse(&mut self) {}

    /// Called whenever the cell's [`CellState`] changes.
    fn state_changed(&mut self, _old: CellState, _new: CellState, _animated: bool) {}
}

impl CellContent for () {}

/// A recyclable view bound to one logical grid index.
#[derive(Clone, Debug)]
pub struct Cell<C> {
    id: ViewId,
    index: Option<usize>,
    state: CellState,
    frame: Rect,
    alpha: f64,
    content: C,
}

impl<C: CellContent> Cell<C> {
    pub(crate) fn new(id: ViewId, content: C) -> Self {
        Self {
            id,
            index: None,
            state: CellState::empty(),
            frame: Rect::ZERO,
            alpha: 1.0,
            content,
        }
    }

    /// Arena handle of this cell.
    #[must_use]
    pub const fn id(&self) -> ViewId {
        self.id
    }

    /// Index the cell is bound to, or `None` while recycled or floating.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Current state flags.
    #[must_use]
    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Returns `true` while the grid is editing.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.state.contains(CellState::EDITING)
    }

    /// Returns `true` if the cell is selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.state.contains(CellState::SELECTED)
    }

    /// Returns `true` if the cell is highlighted.
    #[must_use]
    pub const fn is_highlighted(&self) -> bool {
        self.state.contains(CellState::HIGHLIGHTED)
    }

    /// Returns `true` while the cell is picked up by a drag.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.state.contains(CellState::DRAGGING)
    }

    /// Frame in content coordinates.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Opacity in `0.0..=1.0`.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Caller-supplied content.
    #[must_use]
    pub const fn content(&self) -> &C {
        &self.content
    }

    /// Mutable caller-supplied content.
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub(crate) fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub(crate) fn set_editing(&mut self, editing: bool, animated: bool) {
        self.set_flag(CellState::EDITING, editing, animated);
    }

    pub(crate) fn set_selected(&mut self, selected: bool, animated: bool) {
        self.set_flag(CellState::SELECTED, selected, animated);
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool, animated: bool) {
        self.set_flag(CellState::HIGHLIGHTED, highlighted, animated);
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool, animated: bool) {
        self.set_flag(CellState::DRAGGING, dragging, animated);
    }

    fn set_flag(&mut self, flag: CellState, on: bool, animated: bool) {
        let old = self.state;
        self.state.set(flag, on);
        if old != self.state {
            self.content.state_changed(old, self.state, animated);
        }
    }
}

impl<C: CellContent> Reusable for Cell<C> {
    fn index(&self) -> Option<usize> {
        self.index
    }

    fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    fn prepare_for_reuse(&mut self) {
        let old = self.state;
        self.state.remove(CellState::TRANSIENT);
        if old != self.state {
            self.content.state_changed(old, self.state, false);
        }
        self.index = None;
        self.alpha = 1.0;
        self.content.prepare_for_reuse();
    }
}

/// A recyclable per-row view.
#[derive(Clone, Debug)]
pub struct Decoration<D> {
    id: ViewId,
    row: Option<usize>,
    frame: Rect,
    content: D,
}

impl<D> Decoration<D> {
    pub(crate) fn new(id: ViewId, content: D) -> Self {
        Self {
            id,
            row: None,
            frame: Rect::ZERO,
            content,
        }
    }

    /// Arena handle of this view.
    #[must_use]
    pub const fn id(&self) -> ViewId {
        self.id
    }

    /// Row the view is bound to, or `None` while recycled.
    #[must_use]
    pub const fn row(&self) -> Option<usize> {
        self.row
    }

    /// Frame in content coordinates.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Caller-supplied content.
    #[must_use]
    pub const fn content(&self) -> &D {
        &self.content
    }

    /// Mutable caller-supplied content.
    pub fn content_mut(&mut self) -> &mut D {
        &mut self.content
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }
}

impl<D> Reusable for Decoration<D> {
    fn index(&self) -> Option<usize> {
        self.row
    }

    fn set_index(&mut self, row: Option<usize>) {
        self.row = row;
    }

    fn prepare_for_reuse(&mut self) {
        self.row = None;
    }
}
