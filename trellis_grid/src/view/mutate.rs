// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural changes: insert, delete, move and reload.
//!
//! Every batch is validated before anything changes. A valid batch first
//! settles whatever is in flight (a drag is cancelled in place and running
//! tracks jump to their end), then carries selection, highlight, press target
//! and bound views across the [`IndexShift`], and finally reconciles against
//! the new layout. Animated batches register tracks so that survivors slide,
//! inserted cells fade in, deleted cells fade out in place, and cells that
//! enter the visible range slide in from their old slot.

use alloc::vec::Vec;

use hashbrown::HashSet;
use smallvec::SmallVec;

use super::GridView;
use crate::GridError;
use crate::animation::Track;
use crate::indices::{IndexShift, normalize};
use crate::pool::ViewId;
use crate::source::{GridDataSource, GridDelegate, resolve_metrics};

impl<S, G> GridView<S, G>
where
    S: GridDataSource,
    G: GridDelegate<S::Content>,
{
    /// Inserts cells at `indices`, given as positions after the insertion.
    ///
    /// The data source must already contain the new items.
    pub fn insert_cells(&mut self, indices: &[usize], animated: bool) -> Result<(), GridError> {
        let len = self.layout.cell_count() + indices.len();
        let positions = self.validate(indices, len)?;
        if positions.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = positions.len(), animated, "inserting cells");
        self.apply_shift(IndexShift::Insert(&positions), animated);
        Ok(())
    }

    /// Inserts one cell at `index`.
    pub fn insert_cell(&mut self, index: usize, animated: bool) -> Result<(), GridError> {
        self.insert_cells(&[index], animated)
    }

    /// Deletes the cells at `indices`, given as positions before the deletion.
    ///
    /// The data source must already have dropped the items.
    pub fn delete_cells(&mut self, indices: &[usize], animated: bool) -> Result<(), GridError> {
        let positions = self.validate(indices, self.layout.cell_count())?;
        if positions.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = positions.len(), animated, "deleting cells");
        self.apply_shift(IndexShift::Delete(&positions), animated);
        Ok(())
    }

    /// Deletes the cell at `index`.
    pub fn delete_cell(&mut self, index: usize, animated: bool) -> Result<(), GridError> {
        self.delete_cells(&[index], animated)
    }

    /// Moves the cell at `from` to `to`; the cells in between shift by one.
    ///
    /// The data source must already reflect the new order.
    pub fn move_cell(&mut self, from: usize, to: usize, animated: bool) -> Result<(), GridError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        tracing::debug!(from, to, animated, "moving cell");
        self.apply_shift(IndexShift::Move { from, to }, animated);
        Ok(())
    }

    /// Refetches the cells at `indices` from the data source.
    pub fn reload_cells(&mut self, indices: &[usize]) -> Result<(), GridError> {
        let positions = self.validate(indices, self.layout.cell_count())?;
        self.settle();
        for index in positions {
            if let Some(id) = self.cells.id_at(index) {
                self.end_display(index, id);
            }
        }
        self.reconcile();
        Ok(())
    }

    /// Discards every view and rebuilds the grid from the data source.
    ///
    /// Delegate geometry is read again. The selection keeps the indices that
    /// still exist.
    pub fn reload_data(&mut self) {
        self.settle();
        self.set_highlighted(None);
        self.press.cancel();

        let resolved = resolve_metrics(&self.delegate, self.layout.metrics().header_height());
        self.layout.set_metrics(resolved.metrics);
        self.decorations_enabled = resolved.decorations;
        self.declined_rows.clear();

        let count = self.source.cell_count();
        tracing::debug!(count, "reloading data");
        self.layout.set_cell_count(count);
        self.selection.retain_below(count);

        let bound: SmallVec<[(usize, ViewId); 32]> = self.cells.visible().collect();
        for (index, id) in bound {
            self.end_display(index, id);
        }
        self.cells.recycle_all();
        self.decorations.recycle_all();

        self.layout.clamp_scroll_to_content();
        self.reconcile();
    }

    fn validate(&self, indices: &[usize], len: usize) -> Result<Vec<usize>, GridError> {
        normalize(indices, len).inspect_err(|err| {
            tracing::warn!(%err, "rejected batch");
        })
    }

    /// Resolves everything in flight: the drag is cancelled without
    /// animation, every track jumps to its end state, and an animated scroll
    /// completes.
    pub(crate) fn settle(&mut self) {
        self.end_drag(false, false);
        self.finish_animations();
        if let Some(scroll) = self.scroll_animation.take() {
            self.layout.set_scroll_offset(scroll.to);
            self.delegate.did_scroll_to_cell(scroll.index);
        }
    }

    fn apply_shift(&mut self, shift: IndexShift<'_>, animated: bool) {
        self.settle();

        self.selection.apply(&shift);
        if let Some(old) = self.highlighted {
            match shift.map(old) {
                Some(new) => self.highlighted = Some(new),
                None => self.set_highlighted(None),
            }
        }
        self.press.remap_target(|&target| shift.map(target));

        let removed = self.cells.remap(|index| shift.map(index));
        for &(index, id) in &removed {
            if let Some(cell) = self.cells.get(id) {
                self.delegate.did_end_display(cell, index);
            }
        }

        let old_count = self.layout.cell_count();
        let count = shift.apply_count(old_count);
        let reported = self.source.cell_count();
        if reported != count {
            tracing::warn!(
                expected = count,
                reported,
                "data source count disagrees with the mutation"
            );
        }
        self.layout.set_cell_count(count);
        self.layout.clamp_scroll_to_content();

        if !animated {
            for &(_, id) in &removed {
                self.cells.recycle(id);
            }
            self.reconcile();
            return;
        }

        let now = self.now;
        let duration = self.config.animation_duration;
        for &(_, id) in &removed {
            if let Some(cell) = self.cells.get(id) {
                let track = Track::fade(cell.frame(), cell.alpha(), 0.0, now, duration);
                self.animator.animate(id, track.retiring());
            }
        }

        let survivors: HashSet<ViewId> = self.cells.visible().map(|(_, id)| id).collect();
        self.settle_bound_views(true);
        self.reconcile();

        let entering: SmallVec<[(usize, ViewId); 16]> = self
            .cells
            .visible()
            .filter(|(_, id)| !survivors.contains(id))
            .collect();
        for (index, id) in entering {
            let to = self.layout.slot_rect(index);
            let Some(cell) = self.cells.get_mut(id) else {
                continue;
            };
            match shift.unmap(index) {
                None => {
                    cell.set_alpha(0.0);
                    self.animator
                        .animate(id, Track::fade(to, 0.0, 1.0, now, duration));
                }
                Some(old) => {
                    let from = self.layout.slot_rect(old);
                    if from != to {
                        cell.set_frame(from);
                        self.animator
                            .animate(id, Track::slide(from, to, now, duration));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use crate::GridError;
    use crate::test_support::{Event, assert_pool_invariant, first_frame, grid};

    #[test]
    fn insert_shifts_selection_and_keeps_survivor_views() {
        let mut view = grid(40);
        for index in [1, 5, 8] {
            view.select_cell(index).unwrap();
        }
        let survivor = view.cell_at(5).unwrap().id();
        view.data_source_mut().insert(3, 100);
        view.data_source_mut().insert(4, 101);

        view.insert_cells(&[4, 3], false).unwrap();

        assert_eq!(view.selected_indices(), &[1, 7, 10]);
        assert_eq!(view.cell_count(), 42);
        assert_eq!(view.cell_at(7).unwrap().id(), survivor);
        assert!(view.cell_at(7).unwrap().is_selected());
        assert_eq!(view.cell_at(3).unwrap().content().value, Some(100));
        assert_eq!(view.cell_at(4).unwrap().content().value, Some(101));
        assert!(!view.cell_at(5).unwrap().is_selected());
        assert_pool_invariant(&view);
    }

    #[test]
    fn delete_drops_and_shifts_selection() {
        let mut view = grid(40);
        for index in [1, 3, 5, 8] {
            view.select_cell(index).unwrap();
        }
        view.data_source_mut().remove(&[2, 3]);

        view.delete_cells(&[2, 3], false).unwrap();

        assert_eq!(view.selected_indices(), &[1, 3, 6]);
        assert_eq!(view.cell_at(2).unwrap().content().value, Some(4));
        assert!(view.delegate().events.contains(&Event::EndDisplay(2)));
        assert!(view.delegate().events.contains(&Event::EndDisplay(3)));
        assert_pool_invariant(&view);
    }

    #[test]
    fn invalid_batches_change_nothing() {
        let mut view = grid(40);
        view.select_cell(4).unwrap();
        view.delegate_mut().events.clear();

        assert_eq!(
            view.delete_cells(&[2, 40], true),
            Err(GridError::InvalidIndex { index: 40, len: 40 })
        );
        assert_eq!(
            view.delete_cells(&[2, 2], true),
            Err(GridError::DuplicateIndex(2))
        );
        assert_eq!(
            view.insert_cells(&[0, 42], true),
            Err(GridError::InvalidIndex { index: 42, len: 42 })
        );
        assert_eq!(
            view.move_cell(3, 40, true),
            Err(GridError::InvalidIndex { index: 40, len: 40 })
        );

        assert_eq!(view.cell_count(), 40);
        assert_eq!(view.selected_indices(), &[4]);
        assert!(view.delegate().events.is_empty());
        assert!(!view.needs_ticks());
    }

    #[test]
    fn animated_delete_fades_out_then_recycles() {
        let mut view = grid(40);
        let doomed = view.cell_at(0).unwrap().id();
        let next = view.cell_at(1).unwrap().id();
        view.data_source_mut().remove(&[0]);

        view.delete_cells(&[0], true).unwrap();

        // The deleted cell is still on screen, detached, fading out.
        assert!(view.cells.is_detached(doomed));
        assert!(view.visible_cells().any(|c| c.id() == doomed));
        // Its neighbour slides into slot 0.
        assert_eq!(view.cell_at(0).unwrap().id(), next);
        assert!(view.animator.is_tracking(next));
        // Index 15 came into range from slot 16.
        let entering = view.cell_at(15).unwrap();
        assert_eq!(entering.content().value, Some(16));
        assert_eq!(entering.frame(), view.layout.slot_rect(16));

        assert!(first_frame(&mut view));
        assert!(view.advance(Duration::from_millis(100)));
        let alpha = view.cell(doomed).unwrap().alpha();
        assert!(alpha > 0.0 && alpha < 1.0);

        assert!(!view.advance(Duration::from_millis(200)));
        assert!(view.cells.is_recycled(doomed));
        for cell in view.visible_cells() {
            let index = cell.index().unwrap();
            assert_eq!(cell.frame(), view.layout.slot_rect(index));
            assert_eq!(cell.alpha(), 1.0);
        }
        assert_pool_invariant(&view);
    }

    #[test]
    fn animated_insert_fades_new_cells_in() {
        let mut view = grid(40);
        view.data_source_mut().insert(2, 100);

        view.insert_cells(&[2], true).unwrap();

        let inserted = view.cell_at(2).unwrap();
        assert_eq!(inserted.content().value, Some(100));
        assert_eq!(inserted.alpha(), 0.0);
        assert!(first_frame(&mut view));
        assert!(view.advance(Duration::from_millis(125)));
        assert!(!view.advance(Duration::from_millis(125)));
        assert_eq!(view.cell_at(2).unwrap().alpha(), 1.0);
        // Index 15 was pushed out of range and recycled once its slide ended.
        assert_eq!(view.visible_cells().count(), 16);
        assert_pool_invariant(&view);
    }

    #[test]
    fn mutation_fast_forwards_running_animations() {
        let mut view = grid(40);
        let doomed = view.cell_at(0).unwrap().id();
        view.data_source_mut().remove(&[0]);
        view.delete_cells(&[0], true).unwrap();
        first_frame(&mut view);
        view.advance(Duration::from_millis(50));

        view.data_source_mut().remove(&[0]);
        view.delete_cells(&[0], false).unwrap();

        assert!(view.cells.is_recycled(doomed));
        assert!(!view.needs_ticks());
        assert_eq!(view.cell_at(0).unwrap().content().value, Some(2));
        assert_pool_invariant(&view);
    }

    #[test]
    fn overlapping_animated_mutations_settle_on_the_visible_range() {
        let mut view = grid(40);
        view.data_source_mut().insert(1, 100);
        view.insert_cells(&[1], true).unwrap();
        first_frame(&mut view);
        view.advance(Duration::from_millis(100));

        view.data_source_mut().remove(&[38, 39, 40]);
        view.delete_cells(&[38, 39, 40], true).unwrap();
        view.set_content_offset(480.0);
        assert_pool_invariant(&view);

        for _ in 0..100 {
            if !view.advance(Duration::from_millis(16)) {
                break;
            }
        }
        assert!(!view.needs_ticks());
        assert_eq!(view.cell_count(), 38);
        assert_pool_invariant(&view);
    }

    #[test]
    fn move_cell_rekeys_views() {
        let mut view = grid(40);
        let moved = view.cell_at(4).unwrap().id();
        view.select_cell(4).unwrap();
        view.data_source_mut().shift(4, 1);

        view.move_cell(4, 1, false).unwrap();

        assert_eq!(view.cell_at(1).unwrap().id(), moved);
        assert_eq!(view.selected_indices(), &[1]);
        assert_eq!(view.cell_at(2).unwrap().content().value, Some(1));
        assert_pool_invariant(&view);
    }

    #[test]
    fn count_disagreement_keeps_the_shifted_count() {
        let mut view = grid(40);
        // The data source was not updated.
        view.insert_cells(&[0], false).unwrap();
        assert_eq!(view.cell_count(), 41);
    }

    #[test]
    fn reload_cells_refetches_only_those_cells() {
        let mut view = grid(40);
        view.data_source_mut().items[2] = 200;
        view.delegate_mut().events.clear();

        view.reload_cells(&[2]).unwrap();

        assert_eq!(view.cell_at(2).unwrap().content().value, Some(200));
        assert_eq!(
            view.delegate().events,
            [Event::EndDisplay(2), Event::WillDisplay(2)]
        );
        assert_eq!(
            view.reload_cells(&[40]),
            Err(GridError::InvalidIndex { index: 40, len: 40 })
        );
    }

    #[test]
    fn reload_data_rebuilds_from_the_source() {
        let mut view = grid(40);
        view.select_cell(3).unwrap();
        view.select_cell(30).unwrap();
        view.set_content_offset(560.0);
        view.data_source_mut().items.truncate(10);

        view.reload_data();

        assert_eq!(view.cell_count(), 10);
        assert_eq!(view.selected_indices(), &[3]);
        assert_eq!(view.content_offset(), 0.0);
        assert_eq!(view.visible_cells().count(), 10);
        assert!(view.cell_at(3).unwrap().is_selected());
        assert_pool_invariant(&view);
    }
}
