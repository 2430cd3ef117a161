// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-reorder session state.
//!
//! A [`DragSession`] lives from the moment a cell is picked up until release or
//! cancel:
//!
//! ```text
//! Idle ──arm──▶ Armed ──moved past threshold──▶ Dragging ──release/cancel──▶ Idle
//!                 └──────────────release/cancel───────────────────────────────┘
//! ```
//!
//! While dragging, the session tracks the *hover slot*: the grid slot under the
//! pointer. Every time it changes, [`DragSession::retarget`] reports a one-slot
//! [`Reorder`] so the host can shift the cells between the old and new slot by
//! one position. The backing data is not reordered until release; until then
//! [`DragSession::source_index`] translates displayed slots back to data indices.
//!
//! Pointer positions are in viewport coordinates so that autoscroll, which moves
//! the content under a stationary pointer, is reflected automatically.

use kurbo::{Point, Vec2};
use trellis_layout::GridLayout;

use crate::AutoscrollConfig;

/// Default pointer travel that turns an armed drag into an active one.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 4.0;

/// Phase of a drag session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// The cell is picked up but the pointer has not moved far enough yet.
    Armed,
    /// The cell follows the pointer and the hover slot is tracked.
    Dragging,
}

/// A one-slot move of the dragged cell inside the displayed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reorder {
    /// Slot the dragged cell left.
    pub from: usize,
    /// Slot the dragged cell now occupies.
    pub to: usize,
}

/// How a drag session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The dragged cell ends up at a different index.
    Moved {
        /// Index the cell was picked up from.
        from: usize,
        /// Index the cell was dropped at.
        to: usize,
    },
    /// The cell returns to where it started.
    Unchanged {
        /// Index the cell was picked up from.
        index: usize,
    },
}

/// Ephemeral state of one drag-to-reorder gesture.
#[derive(Clone, Debug)]
pub struct DragSession {
    origin_index: usize,
    dragged_index: usize,
    touch_offset: Vec2,
    pointer: Point,
    arm_pointer: Point,
    threshold: f64,
    phase: DragPhase,
}

impl DragSession {
    /// Picks up the cell at `index` whose origin (content coordinates) is
    /// `cell_origin`, with the pointer at `pointer` (viewport coordinates).
    #[must_use]
    pub fn arm(
        index: usize,
        cell_origin: Point,
        pointer: Point,
        layout: &GridLayout,
        threshold: f64,
    ) -> Self {
        tracing::trace!(index, "drag armed");
        Self {
            origin_index: index,
            dragged_index: index,
            touch_offset: layout.to_content(pointer) - cell_origin,
            pointer,
            arm_pointer: pointer,
            threshold: threshold.max(0.0),
            phase: DragPhase::Armed,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns `true` once the pointer moved past the threshold.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging)
    }

    /// Index the cell was picked up from.
    #[must_use]
    pub const fn origin_index(&self) -> usize {
        self.origin_index
    }

    /// Slot the dragged cell currently occupies in the displayed order.
    #[must_use]
    pub const fn dragged_index(&self) -> usize {
        self.dragged_index
    }

    /// Pointer position relative to the cell origin at pick-up.
    #[must_use]
    pub const fn touch_offset(&self) -> Vec2 {
        self.touch_offset
    }

    /// Last pointer position, in viewport coordinates.
    #[must_use]
    pub const fn pointer(&self) -> Point {
        self.pointer
    }

    /// Records a pointer move.
    ///
    /// Returns `true` if this move turned an armed session into a drag.
    pub fn update_pointer(&mut self, pointer: Point) -> bool {
        self.pointer = pointer;
        if self.phase == DragPhase::Armed
            && (pointer - self.arm_pointer).hypot2() > self.threshold * self.threshold
        {
            self.phase = DragPhase::Dragging;
            tracing::trace!(index = self.origin_index, "drag started");
            return true;
        }
        false
    }

    /// Origin for the floating cell, in content coordinates.
    #[must_use]
    pub fn overlay_origin(&self, layout: &GridLayout) -> Point {
        layout.to_content(self.pointer) - self.touch_offset
    }

    /// Slot under the pointer, clamped to the valid index range.
    #[must_use]
    pub fn hover_index(&self, layout: &GridLayout) -> Option<usize> {
        layout.slot_at(layout.to_content(self.pointer))
    }

    /// Moves the dragged cell to `hover`.
    ///
    /// Returns the one-slot [`Reorder`] to apply to the displayed cells, or
    /// `None` if the session is not dragging or the slot did not change.
    pub fn retarget(&mut self, hover: usize) -> Option<Reorder> {
        if !self.is_dragging() || hover == self.dragged_index {
            return None;
        }
        let reorder = Reorder {
            from: self.dragged_index,
            to: hover,
        };
        self.dragged_index = hover;
        tracing::trace!(from = reorder.from, to = reorder.to, "drag hover changed");
        Some(reorder)
    }

    /// Maps a displayed slot to the index of the item it shows in the
    /// not-yet-reordered data.
    #[must_use]
    pub fn source_index(&self, display: usize) -> usize {
        let origin = self.origin_index;
        let current = self.dragged_index;
        if display == current {
            origin
        } else if origin < current && (origin..current).contains(&display) {
            display + 1
        } else if current < origin && (current + 1..=origin).contains(&display) {
            display - 1
        } else {
            display
        }
    }

    /// Autoscroll delta per tick for the current pointer position.
    ///
    /// Armed sessions never autoscroll.
    #[must_use]
    pub fn autoscroll_velocity(&self, config: &AutoscrollConfig, layout: &GridLayout) -> f64 {
        if !self.is_dragging() {
            return 0.0;
        }
        config.velocity(self.pointer.y, layout.viewport().height)
    }

    /// Classifies the session as if released now.
    #[must_use]
    pub fn outcome(&self) -> DragOutcome {
        if self.dragged_index == self.origin_index {
            DragOutcome::Unchanged {
                index: self.origin_index,
            }
        } else {
            DragOutcome::Moved {
                from: self.origin_index,
                to: self.dragged_index,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use kurbo::{Point, Size, Vec2};
    use trellis_layout::{GridLayout, GridMetrics};

    use super::{DragOutcome, DragPhase, DragSession, Reorder};
    use crate::AutoscrollConfig;

    fn layout() -> GridLayout {
        let metrics = GridMetrics::new(Size::new(80.0, 80.0), NonZeroUsize::new(4).unwrap());
        let mut layout = GridLayout::new(metrics, 10);
        layout.set_viewport(Size::new(320.0, 240.0));
        layout
    }

    #[test]
    fn arming_records_touch_offset_in_content_space() {
        let mut layout = layout();
        layout.set_scroll_offset(20.0);
        // Cell 4 sits at (0, 80); the pointer at (10, 70) in the viewport is (10, 90) in content.
        let session = DragSession::arm(4, Point::new(0.0, 80.0), Point::new(10.0, 70.0), &layout, 4.0);
        assert_eq!(session.phase(), DragPhase::Armed);
        assert_eq!(session.touch_offset(), Vec2::new(10.0, 10.0));
        assert_eq!(session.overlay_origin(&layout), Point::new(0.0, 80.0));
    }

    #[test]
    fn threshold_turns_armed_into_dragging() {
        let layout = layout();
        let mut session =
            DragSession::arm(4, Point::new(0.0, 80.0), Point::new(40.0, 120.0), &layout, 4.0);
        assert!(!session.update_pointer(Point::new(42.0, 121.0)));
        // Not dragging yet: no retargeting.
        assert_eq!(session.retarget(1), None);
        assert!(session.update_pointer(Point::new(40.0, 110.0)));
        assert!(!session.update_pointer(Point::new(40.0, 100.0)));
        assert!(session.is_dragging());
    }

    #[test]
    fn hover_changes_produce_single_reorders() {
        let layout = layout();
        let mut session =
            DragSession::arm(4, Point::new(0.0, 80.0), Point::new(40.0, 120.0), &layout, 4.0);
        session.update_pointer(Point::new(120.0, 40.0));
        assert_eq!(session.hover_index(&layout), Some(1));
        assert_eq!(session.retarget(1), Some(Reorder { from: 4, to: 1 }));
        assert_eq!(session.retarget(1), None);
        assert_eq!(session.dragged_index(), 1);
        assert_eq!(session.outcome(), DragOutcome::Moved { from: 4, to: 1 });

        assert_eq!(session.retarget(4), Some(Reorder { from: 1, to: 4 }));
        assert_eq!(session.outcome(), DragOutcome::Unchanged { index: 4 });
    }

    #[test]
    fn source_index_follows_the_pending_move() {
        let layout = layout();
        let mut session =
            DragSession::arm(4, Point::new(0.0, 80.0), Point::new(40.0, 120.0), &layout, 0.0);
        session.update_pointer(Point::new(40.0, 130.0));
        session.retarget(1);
        // Displayed order is now [0, 4, 1, 2, 3, 5, ...].
        let shown: [usize; 7] = core::array::from_fn(|i| session.source_index(i));
        assert_eq!(shown, [0, 4, 1, 2, 3, 5, 6]);

        session.retarget(6);
        // Displayed order is now [0, 1, 2, 3, 5, 6, 4, 7].
        let shown: [usize; 8] = core::array::from_fn(|i| session.source_index(i));
        assert_eq!(shown, [0, 1, 2, 3, 5, 6, 4, 7]);
    }

    #[test]
    fn hover_is_clamped_to_the_last_cell() {
        let layout = layout();
        let mut session =
            DragSession::arm(0, Point::ZERO, Point::new(10.0, 10.0), &layout, 0.0);
        session.update_pointer(Point::new(300.0, 235.0));
        // Slot 11 does not exist in a 10-cell grid.
        assert_eq!(session.hover_index(&layout), Some(9));
    }

    #[test]
    fn autoscroll_only_while_dragging() {
        let layout = layout();
        let config = AutoscrollConfig::default();
        let mut session =
            DragSession::arm(0, Point::ZERO, Point::new(10.0, 235.0), &layout, 4.0);
        assert_eq!(session.autoscroll_velocity(&config, &layout), 0.0);
        session.update_pointer(Point::new(10.0, 225.0));
        // 15 from the bottom edge of a 240 viewport: (60 - 15) / 60 * 15.
        assert!((session.autoscroll_velocity(&config, &layout) - 11.25).abs() < 1e-9);
    }
}
