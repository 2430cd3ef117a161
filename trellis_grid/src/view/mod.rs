// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid view: layout, pool, animations and gestures tied together.

mod gesture;
mod mutate;

use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;
use trellis_gesture::press::PressState;
use trellis_gesture::{DragSession, Ticker};
use trellis_layout::{GridLayout, ScrollPosition, VisibleRange, compute_visible_range};

use crate::animation::{Animator, ScrollAnimation, Track};
use crate::cell::{Cell, Decoration};
use crate::indices::IndexShift;
use crate::pool::{Pool, ReuseQueue, ViewId};
use crate::selection::Selection;
use crate::source::{GridDataSource, GridDelegate, resolve_metrics};
use crate::{GridConfig, GridError};

/// The cell being dragged and its view.
#[derive(Clone, Debug)]
struct ActiveDrag {
    session: DragSession,
    id: ViewId,
}

/// A recycling, editable grid of cells.
///
/// `GridView` owns its data source `S` and delegate `G`. It keeps one cell view
/// bound to each index in the visible range (plus one row of slack), recycles
/// views that scroll out, animates structural changes and runs the
/// drag-to-reorder gesture.
///
/// The host drives it:
///
/// - geometry: [`set_viewport_size`](Self::set_viewport_size) and
///   [`set_content_offset`](Self::set_content_offset) as the scroll view moves,
/// - input: `pointer_down` / `pointer_moved` / `pointer_up` /
///   `pointer_cancelled` in viewport coordinates,
/// - time: [`advance`](Self::advance) with the elapsed wall time, for as long as
///   it returns `true`,
/// - rendering: [`visible_cells`](Self::visible_cells) and
///   [`visible_decorations`](Self::visible_decorations) after each of the above.
///
/// No views are bound before the first `set_viewport_size`.
pub struct GridView<S, G>
where
    S: GridDataSource,
    G: GridDelegate<S::Content>,
{
    source: S,
    delegate: G,
    config: GridConfig,
    layout: GridLayout,
    decorations_enabled: bool,
    declined_rows: SmallVec<[usize; 4]>,
    cells: Pool<Cell<S::Content>>,
    decorations: Pool<Decoration<G::Decoration>>,
    selection: Selection,
    highlighted: Option<usize>,
    editing: bool,
    animator: Animator,
    press: PressState<usize>,
    drag: Option<ActiveDrag>,
    autoscroll: Ticker,
    scroll_animation: Option<ScrollAnimation>,
    now: Duration,
    /// No work was pending when the clock last stopped.
    clock_idle: bool,
}

impl<S, G> fmt::Debug for GridView<S, G>
where
    S: GridDataSource,
    G: GridDelegate<S::Content>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridView")
            .field("layout", &self.layout)
            .field("cells", &self.cells)
            .field("decorations", &self.decorations)
            .field("selection", &self.selection)
            .field("highlighted", &self.highlighted)
            .field("editing", &self.editing)
            .field("dragging", &self.drag.as_ref().map(|d| d.session.origin_index()))
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl<S, G> GridView<S, G>
where
    S: GridDataSource,
    S::Content: Default,
    G: GridDelegate<S::Content>,
    G::Decoration: Default,
{
    /// Creates a grid with [`GridConfig::default`].
    ///
    /// Cell and decoration views are built with their content's `Default`
    /// until a factory is registered.
    pub fn new(source: S, delegate: G) -> Self {
        Self::with_config(source, delegate, GridConfig::default())
    }

    /// Creates a grid with a custom configuration.
    pub fn with_config(source: S, delegate: G, config: GridConfig) -> Self {
        let resolved = resolve_metrics(&delegate, 0.0);
        let count = source.cell_count();
        Self {
            layout: GridLayout::new(resolved.metrics, count),
            decorations_enabled: resolved.decorations,
            declined_rows: SmallVec::new(),
            cells: Pool::new(|id| Cell::new(id, S::Content::default())),
            decorations: Pool::new(|id| Decoration::new(id, G::Decoration::default())),
            selection: Selection::default(),
            highlighted: None,
            editing: false,
            animator: Animator::new(config.easing),
            press: PressState::with_thresholds(config.tap_slop, config.long_press_delay),
            drag: None,
            autoscroll: Ticker::new(config.tick_interval),
            scroll_animation: None,
            now: Duration::ZERO,
            clock_idle: true,
            source,
            delegate,
            config,
        }
    }
}

impl<S, G> GridView<S, G>
where
    S: GridDataSource,
    G: GridDelegate<S::Content>,
{
    /// Sets how new cell content is built when no recycled cell is available.
    pub fn register_cell_factory(&mut self, mut factory: impl FnMut() -> S::Content + 'static) {
        self.cells.set_factory(move |id| Cell::new(id, factory()));
    }

    /// Sets how new decoration content is built when no recycled decoration
    /// is available.
    pub fn register_decoration_factory(
        &mut self,
        mut factory: impl FnMut() -> G::Decoration + 'static,
    ) {
        self.decorations
            .set_factory(move |id| Decoration::new(id, factory()));
    }

    /// The data source.
    pub fn data_source(&self) -> &S {
        &self.source
    }

    /// The data source, mutably. Structural changes made here must be
    /// reported through the mutation methods.
    pub fn data_source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The delegate.
    pub fn delegate(&self) -> &G {
        &self.delegate
    }

    /// The delegate, mutably.
    pub fn delegate_mut(&mut self) -> &mut G {
        &mut self.delegate
    }

    /// Active configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of cells the grid currently lays out.
    pub fn cell_count(&self) -> usize {
        self.layout.cell_count()
    }

    /// Clock time accumulated through [`advance`](Self::advance).
    pub fn now(&self) -> Duration {
        self.now
    }

    // --- geometry ---

    /// Size of every cell.
    pub fn size_of_cells(&self) -> Size {
        self.layout.metrics().cell_size()
    }

    /// Origin of the cell at `index` in content coordinates.
    pub fn origin_of_cell(&self, index: usize) -> Option<Point> {
        self.layout.origin_of(index)
    }

    /// Frame of the cell at `index` in content coordinates.
    pub fn rect_of_cell(&self, index: usize) -> Option<Rect> {
        self.layout.rect_of(index)
    }

    /// Index of the cell containing `point` (content coordinates).
    pub fn index_at_point(&self, point: Point) -> Option<usize> {
        self.layout.index_at(point)
    }

    /// Total scrollable size.
    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    /// Range of indices that currently have (or should have) a view.
    pub fn visible_range(&self) -> VisibleRange {
        compute_visible_range(
            self.layout.metrics(),
            self.layout.cell_count(),
            self.layout.viewport(),
            self.layout.scroll_offset(),
        )
    }

    // --- scrolling and bounds ---

    /// Current vertical scroll offset.
    pub fn content_offset(&self) -> f64 {
        self.layout.scroll_offset()
    }

    /// Moves the viewport to `offset`, cancelling any animated scroll.
    pub fn set_content_offset(&mut self, offset: f64) {
        self.scroll_animation = None;
        self.apply_offset(offset);
    }

    /// Resizes the viewport.
    pub fn set_viewport_size(&mut self, size: Size) {
        if size.width != self.layout.viewport().width {
            self.finish_animations();
        }
        self.layout.set_viewport(size);
        self.refresh_drag();
        self.reconcile();
    }

    /// Sets the height of the area above the first row.
    pub fn set_header_height(&mut self, height: f64) {
        self.finish_animations();
        self.layout.set_header_height(height);
        self.refresh_drag();
        self.reconcile();
    }

    /// Scrolls so that the cell at `index` sits at `position`.
    ///
    /// The delegate hears `did_scroll_to_cell` once the target offset is
    /// reached: immediately, or at the end of the animation.
    pub fn scroll_to_cell(
        &mut self,
        index: usize,
        position: ScrollPosition,
        animated: bool,
    ) -> Result<(), GridError> {
        let target = self
            .layout
            .scroll_offset_for_index(index, position)
            .ok_or(GridError::InvalidIndex {
                index,
                len: self.layout.cell_count(),
            })?;
        let current = self.layout.scroll_offset();
        if animated && target != current {
            self.scroll_animation = Some(ScrollAnimation {
                from: current,
                to: target,
                start: self.now,
                duration: self.config.animation_duration,
                index,
            });
        } else {
            self.scroll_animation = None;
            self.apply_offset(target);
            self.delegate.did_scroll_to_cell(index);
        }
        Ok(())
    }

    fn apply_offset(&mut self, offset: f64) {
        self.layout.set_scroll_offset(offset);
        self.refresh_drag();
        self.reconcile();
    }

    // --- edit mode and selection ---

    /// Returns `true` while the grid is in edit mode.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Enters or leaves edit mode.
    ///
    /// Leaving edit mode cancels a drag and clears the selection.
    pub fn set_editing(&mut self, editing: bool, animated: bool) {
        if self.editing == editing {
            return;
        }
        tracing::debug!(editing, "edit mode changed");
        if editing {
            self.set_highlighted(None);
        } else {
            self.end_drag(false, animated);
            self.deselect_all_animated(animated);
        }
        self.editing = editing;
        let ids: SmallVec<[ViewId; 32]> = self.on_screen_ids().collect();
        for id in ids {
            if let Some(cell) = self.cells.get_mut(id) {
                cell.set_editing(editing, animated);
            }
        }
    }

    /// Selected indices in selection order.
    pub fn selected_indices(&self) -> &[usize] {
        self.selection.as_slice()
    }

    /// Returns `true` if `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }

    /// Adds `index` to the selection.
    pub fn select_cell(&mut self, index: usize) -> Result<(), GridError> {
        self.check_index(index)?;
        if self.selection.insert(index) {
            self.update_cell(index, |cell| cell.set_selected(true, false));
        }
        Ok(())
    }

    /// Removes `index` from the selection.
    pub fn deselect_cell(&mut self, index: usize) -> Result<(), GridError> {
        self.check_index(index)?;
        if self.selection.remove(index) {
            self.update_cell(index, |cell| cell.set_selected(false, false));
        }
        Ok(())
    }

    /// Clears the selection.
    pub fn deselect_all(&mut self) {
        self.deselect_all_animated(false);
    }

    fn deselect_all_animated(&mut self, animated: bool) {
        for index in self.selection.clear() {
            self.update_cell(index, |cell| cell.set_selected(false, animated));
        }
    }

    pub(crate) fn toggle_selection(&mut self, index: usize) {
        if self.selection.contains(index) {
            self.selection.remove(index);
            self.update_cell(index, |cell| cell.set_selected(false, true));
        } else {
            self.selection.insert(index);
            self.update_cell(index, |cell| cell.set_selected(true, true));
        }
    }

    fn check_index(&self, index: usize) -> Result<(), GridError> {
        let len = self.layout.cell_count();
        if index < len {
            Ok(())
        } else {
            tracing::warn!(index, len, "rejected out-of-range index");
            Err(GridError::InvalidIndex { index, len })
        }
    }

    // --- rendering readout ---

    /// Every cell on screen: bound cells in index order, then detached cells
    /// (fading out or being dragged). The dragged cell comes last.
    pub fn visible_cells(&self) -> impl Iterator<Item = &Cell<S::Content>> + '_ {
        self.on_screen_ids().filter_map(|id| self.cells.get(id))
    }

    /// Decoration views of the visible rows, in row order.
    pub fn visible_decorations(&self) -> impl Iterator<Item = &Decoration<G::Decoration>> + '_ {
        self.decorations
            .visible()
            .filter_map(|(_, id)| self.decorations.get(id))
    }

    /// The cell following the pointer, if a drag is in progress.
    pub fn dragged_cell(&self) -> Option<&Cell<S::Content>> {
        self.drag.as_ref().and_then(|drag| self.cells.get(drag.id))
    }

    /// The cell bound to `index`, if it is on screen.
    pub fn cell_at(&self, index: usize) -> Option<&Cell<S::Content>> {
        self.cells.id_at(index).and_then(|id| self.cells.get(id))
    }

    /// A cell by handle.
    pub fn cell(&self, id: ViewId) -> Option<&Cell<S::Content>> {
        self.cells.get(id)
    }

    /// A cell by handle, mutably, for updating its content.
    pub fn cell_mut(&mut self, id: ViewId) -> Option<&mut Cell<S::Content>> {
        self.cells.get_mut(id)
    }

    /// A decoration view by handle.
    pub fn decoration(&self, id: ViewId) -> Option<&Decoration<G::Decoration>> {
        self.decorations.get(id)
    }

    #[cfg(test)]
    pub(crate) fn cell_pool(&self) -> &Pool<Cell<S::Content>> {
        &self.cells
    }

    fn on_screen_ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        let dragged = self.drag.as_ref().map(|drag| drag.id);
        self.cells
            .visible()
            .map(|(_, id)| id)
            .chain(self.cells.detached().filter(move |&id| Some(id) != dragged))
            .chain(dragged)
    }

    // --- clock ---

    /// Advances the grid clock by `elapsed`.
    ///
    /// Fires a pending long press, steps an animated scroll, runs autoscroll
    /// ticks and samples frame tracks. Returns `true` while any of these still
    /// needs time to pass.
    ///
    /// After a call that returned `false` the clock is stopped: the next call
    /// only restarts it and does not count its `elapsed`, so time the host
    /// spent idle never shortens a long press or an animation started since.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let elapsed = if self.clock_idle {
            Duration::ZERO
        } else {
            elapsed
        };
        self.now += elapsed;
        let now = self.now;

        if let Some(index) = self.press.poll(now) {
            self.long_pressed(index);
        }

        if let Some(scroll) = self.scroll_animation {
            let (offset, done) = scroll.sample(self.config.easing, now);
            self.apply_offset(offset);
            if done {
                self.scroll_animation = None;
                self.delegate.did_scroll_to_cell(scroll.index);
            }
        }

        for _ in 0..self.autoscroll.advance(elapsed) {
            self.autoscroll_tick();
        }

        let cells = &mut self.cells;
        let finished = self.animator.advance(now, |id, frame, alpha| {
            if let Some(cell) = cells.get_mut(id) {
                cell.set_frame(frame);
                cell.set_alpha(alpha);
            }
        });
        if !finished.is_empty() {
            for done in finished {
                if done.retire {
                    self.cells.recycle(done.id);
                }
            }
            self.reconcile();
        }

        let busy = self.needs_ticks();
        self.clock_idle = !busy;
        busy
    }

    /// Returns `true` while [`advance`](Self::advance) has work to do.
    pub fn needs_ticks(&self) -> bool {
        !self.animator.is_empty()
            || self.autoscroll.is_running()
            || self.scroll_animation.is_some()
            || self.press.awaiting_long_press()
    }

    /// Jumps every frame track to its end state.
    fn finish_animations(&mut self) {
        let cells = &mut self.cells;
        let finished = self.animator.finish_all(|id, frame, alpha| {
            if let Some(cell) = cells.get_mut(id) {
                cell.set_frame(frame);
                cell.set_alpha(alpha);
            }
        });
        for done in finished {
            if done.retire {
                self.cells.recycle(done.id);
            }
        }
    }

    // --- binding ---

    /// Data index shown at displayed slot `index`.
    ///
    /// The two differ only while a drag is reordering cells on screen.
    fn data_index(&self, index: usize) -> usize {
        self.drag
            .as_ref()
            .map_or(index, |drag| drag.session.source_index(index))
    }

    /// Applies `f` to the view showing data index `index`.
    fn update_cell(&mut self, index: usize, f: impl FnOnce(&mut Cell<S::Content>)) {
        let id = match &self.drag {
            Some(drag) if drag.session.origin_index() == index => Some(drag.id),
            Some(drag) => {
                let shift = IndexShift::Move {
                    from: drag.session.origin_index(),
                    to: drag.session.dragged_index(),
                };
                shift.map(index).and_then(|display| self.cells.id_at(display))
            }
            None => self.cells.id_at(index),
        };
        if let Some(cell) = id.and_then(|id| self.cells.get_mut(id)) {
            f(cell);
        }
    }

    pub(crate) fn set_highlighted(&mut self, index: Option<usize>) {
        if self.highlighted == index {
            return;
        }
        if let Some(old) = self.highlighted.take() {
            self.update_cell(old, |cell| cell.set_highlighted(false, true));
            self.delegate.did_unhighlight(old);
        }
        if let Some(new) = index {
            self.highlighted = Some(new);
            self.update_cell(new, |cell| cell.set_highlighted(true, true));
            self.delegate.did_highlight(new);
        }
    }

    /// Brings the bound views in line with the visible range.
    ///
    /// Views outside the range are recycled (unless an animation still moves
    /// them), missing indices are fetched from the data source, and views
    /// without a running track are snapped to their slot. Running it again
    /// without any change in between has no effect.
    pub(crate) fn reconcile(&mut self) {
        let range = self.layout.visible_range();
        let gap = self.drag.as_ref().map(|drag| drag.session.dragged_index());

        let stale: SmallVec<[(usize, ViewId); 16]> = self
            .cells
            .visible()
            .filter(|&(index, id)| !range.contains(index) && !self.animator.is_tracking(id))
            .collect();
        for (index, id) in stale {
            self.end_display(index, id);
        }

        for index in range.indices() {
            if Some(index) == gap || self.cells.id_at(index).is_some() {
                continue;
            }
            self.bind_cell(index);
        }
        self.cells.reclaim_pending();

        let bound: SmallVec<[(usize, ViewId); 32]> = self.cells.visible().collect();
        for (index, id) in bound {
            if self.animator.is_tracking(id) {
                continue;
            }
            let frame = self.layout.slot_rect(index);
            if let Some(cell) = self.cells.get_mut(id) {
                cell.set_frame(frame);
                cell.set_alpha(1.0);
            }
        }

        self.reconcile_decorations();
    }

    fn bind_cell(&mut self, index: usize) {
        let data_index = self.data_index(index);
        let id = {
            let mut queue = ReuseQueue::new(&mut self.cells);
            self.source.cell_for_index(&mut queue, data_index)
        };
        if !self.cells.bind(id, index) {
            return;
        }
        let frame = self.layout.slot_rect(index);
        let selected = self.selection.contains(data_index);
        let highlighted = self.highlighted == Some(data_index);
        if let Some(cell) = self.cells.get_mut(id) {
            cell.set_frame(frame);
            cell.set_alpha(1.0);
            cell.set_editing(self.editing, false);
            cell.set_selected(selected, false);
            cell.set_highlighted(highlighted, false);
            self.delegate.will_display(cell, data_index);
        }
    }

    /// Tells the delegate the view at `index` goes away, then recycles it.
    fn end_display(&mut self, index: usize, id: ViewId) {
        let data_index = self.data_index(index);
        if let Some(cell) = self.cells.get(id) {
            self.delegate.did_end_display(cell, data_index);
        }
        self.cells.recycle(id);
    }

    fn reconcile_decorations(&mut self) {
        if !self.decorations_enabled {
            self.decorations.recycle_all();
            return;
        }
        let rows = self.layout.visible_rows();
        self.declined_rows.retain(|row| rows.contains(row));

        let stale: SmallVec<[ViewId; 8]> = self
            .decorations
            .visible()
            .filter(|(row, _)| !rows.contains(row))
            .map(|(_, id)| id)
            .collect();
        for id in stale {
            self.decorations.recycle(id);
        }

        for row in rows {
            if self.decorations.id_at(row).is_some() || self.declined_rows.contains(&row) {
                continue;
            }
            let id = {
                let mut queue = ReuseQueue::new(&mut self.decorations);
                self.delegate.decoration_for_row(&mut queue, row)
            };
            match id {
                Some(id) => {
                    self.decorations.bind(id, row);
                }
                None => self.declined_rows.push(row),
            }
        }
        self.decorations.reclaim_pending();

        let bound: SmallVec<[(usize, ViewId); 8]> = self.decorations.visible().collect();
        for (row, id) in bound {
            let frame = self.layout.row_rect(row);
            if let Some(decoration) = self.decorations.get_mut(id) {
                decoration.set_frame(frame);
            }
        }
    }

    /// Animates every bound view toward its slot, or snaps it there.
    fn settle_bound_views(&mut self, animated: bool) {
        let bound: SmallVec<[(usize, ViewId); 32]> = self.cells.visible().collect();
        for (index, id) in bound {
            let to = self.layout.slot_rect(index);
            let Some(cell) = self.cells.get_mut(id) else {
                continue;
            };
            if animated {
                let settled = match self.animator.target(id) {
                    Some(target) => target == to,
                    None => cell.frame() == to,
                };
                if !settled {
                    self.animator.animate(
                        id,
                        Track::slide(
                            cell.frame(),
                            to,
                            self.now,
                            self.config.animation_duration,
                        ),
                    );
                }
            } else {
                self.animator.remove(id);
                cell.set_frame(to);
                cell.set_alpha(1.0);
            }
        }
    }
}
