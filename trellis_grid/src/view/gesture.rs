// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input: highlight, tap, long press and drag-to-reorder.
//!
//! All pointer positions are in viewport coordinates. Outside edit mode a
//! press highlights its cell and ends as a tap or a long tap. In edit mode a
//! tap toggles the selection and a long press picks the cell up:
//!
//! ```text
//! Idle ──long press / begin_drag──▶ Armed ──moved past threshold──▶ Dragging
//!   ▲                                 │                                │
//!   └──────────── release / cancel ◀──┴────────────────────────────────┘
//! ```
//!
//! While a cell is picked up it is detached from the pool and follows the
//! pointer. Each change of the hover slot shifts the cells in between by one
//! position; the data source is only told on release, through `did_move`.

use kurbo::{Point, Rect};
use trellis_gesture::DragSession;
use trellis_gesture::press::PressOutcome;

use super::{ActiveDrag, GridView};
use crate::animation::Track;
use crate::indices::IndexShift;
use crate::source::{GridDataSource, GridDelegate};

impl<S, G> GridView<S, G>
where
    S: GridDataSource,
    G: GridDelegate<S::Content>,
{
    /// A pointer went down at `position`.
    pub fn pointer_down(&mut self, position: Point) {
        if self.drag.is_some() {
            return;
        }
        let Some(index) = self.layout.index_at(self.layout.to_content(position)) else {
            self.press.cancel();
            return;
        };
        self.press.on_down(index, position, self.now);
        if !self.editing {
            self.set_highlighted(Some(index));
        }
    }

    /// The pointer moved to `position`.
    pub fn pointer_moved(&mut self, position: Point) {
        if let Some(drag) = self.drag.as_mut() {
            if drag.session.update_pointer(position) {
                tracing::debug!(index = drag.session.origin_index(), "drag started");
            }
            self.refresh_drag();
            return;
        }
        // Leaving the slop means the host is scrolling.
        if self.press.on_move(position).is_some() {
            self.set_highlighted(None);
        }
    }

    /// The pointer was released at `position`.
    pub fn pointer_up(&mut self, position: Point) {
        if self.drag.is_some() {
            self.press.cancel();
            self.end_drag(true, true);
            return;
        }
        let target = self.layout.index_at(self.layout.to_content(position));
        let outcome = self.press.on_up(target.as_ref(), position);
        self.set_highlighted(None);
        if let PressOutcome::Tap(index) = outcome {
            self.tapped(index);
        }
    }

    /// The pointer sequence was interrupted; a drag returns to its origin.
    pub fn pointer_cancelled(&mut self) {
        self.press.cancel();
        self.set_highlighted(None);
        self.end_drag(false, true);
    }

    /// Picks up the cell at `index` with the pointer at `pointer`.
    ///
    /// Returns `false` without any effect if a drag is already running, the
    /// cell is not on screen, or the data source does not allow moving it.
    pub fn begin_drag(&mut self, index: usize, pointer: Point) -> bool {
        if self.drag.is_some() || index >= self.layout.cell_count() {
            return false;
        }
        if !self.source.can_move(index) {
            tracing::debug!(index, "data source refused the drag");
            return false;
        }
        let Some(id) = self.cells.id_at(index) else {
            return false;
        };
        self.finish_animations();
        let origin = self.layout.slot_rect(index).origin();
        let session = DragSession::arm(
            index,
            origin,
            pointer,
            &self.layout,
            self.config.drag_threshold,
        );
        self.press.cancel();
        self.set_highlighted(None);
        self.cells.unbind(index);
        if let Some(cell) = self.cells.get_mut(id) {
            cell.set_dragging(true, true);
        }
        self.drag = Some(ActiveDrag { session, id });
        tracing::debug!(index, "cell picked up");
        true
    }

    /// Returns `true` while a cell is picked up.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn tapped(&mut self, index: usize) {
        if !self.editing {
            self.delegate.did_tap(index);
        } else if self.source.can_edit(index) {
            self.toggle_selection(index);
        }
    }

    pub(super) fn long_pressed(&mut self, index: usize) {
        self.set_highlighted(None);
        if !self.editing {
            self.delegate.did_long_tap(index);
            return;
        }
        let pointer = self.press.press().map_or_else(
            || {
                let rect = self.layout.slot_rect(index);
                self.layout.to_viewport(rect.center())
            },
            |press| press.down_position,
        );
        self.begin_drag(index, pointer);
    }

    /// Moves the dragged cell under the pointer, follows the hover slot and
    /// starts or stops autoscroll.
    pub(super) fn refresh_drag(&mut self) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let origin = drag.session.overlay_origin(&self.layout);
        if let Some(cell) = self.cells.get_mut(drag.id) {
            cell.set_frame(Rect::from_origin_size(
                origin,
                self.layout.metrics().cell_size(),
            ));
        }
        let reorder = drag
            .session
            .hover_index(&self.layout)
            .and_then(|hover| drag.session.retarget(hover));
        let velocity = drag
            .session
            .autoscroll_velocity(&self.config.autoscroll, &self.layout);
        if velocity == 0.0 {
            self.autoscroll.stop();
        } else {
            self.autoscroll.start();
        }

        if let Some(reorder) = reorder {
            let shift = IndexShift::Move {
                from: reorder.from,
                to: reorder.to,
            };
            self.cells.remap(|index| shift.map(index));
            self.settle_bound_views(true);
            self.reconcile();
        }
    }

    pub(super) fn autoscroll_tick(&mut self) {
        let Some(drag) = self.drag.as_ref() else {
            self.autoscroll.stop();
            return;
        };
        let velocity = drag
            .session
            .autoscroll_velocity(&self.config.autoscroll, &self.layout);
        let before = self.layout.scroll_offset();
        let after = (before + velocity).clamp(0.0, self.layout.max_scroll_offset());
        if after == before {
            // Pinned at the edge; the next pointer move restarts the ticker.
            self.autoscroll.stop();
            return;
        }
        self.layout.set_scroll_offset(after);
        self.refresh_drag();
        self.reconcile();
    }

    /// Ends the drag, if any.
    ///
    /// Committing keeps the displayed order and reports `did_move` when the
    /// cell changed place. Otherwise the displaced cells return and the cell
    /// goes back to its origin.
    pub(super) fn end_drag(&mut self, commit: bool, animated: bool) {
        let Some(ActiveDrag { session, id }) = self.drag.take() else {
            return;
        };
        self.autoscroll.stop();
        let origin = session.origin_index();
        let current = session.dragged_index();

        let target = if commit {
            current
        } else {
            if current != origin {
                let shift = IndexShift::Move {
                    from: current,
                    to: origin,
                };
                self.cells.remap(|index| shift.map(index));
            }
            origin
        };
        self.settle_bound_views(animated);

        self.cells.bind(id, target);
        let to = self.layout.slot_rect(target);
        if let Some(cell) = self.cells.get_mut(id) {
            cell.set_dragging(false, animated);
            if animated {
                let track = Track::slide(cell.frame(), to, self.now, self.config.animation_duration);
                self.animator.animate(id, track);
            } else {
                self.animator.remove(id);
                cell.set_frame(to);
            }
        }

        if commit && current != origin {
            self.selection.apply(&IndexShift::Move {
                from: origin,
                to: current,
            });
            tracing::debug!(from = origin, to = current, "drag moved cell");
            self.delegate.did_move(origin, current);
        } else {
            tracing::debug!(index = origin, commit, "drag ended in place");
        }
        self.reconcile();
    }
}
