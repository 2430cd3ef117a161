// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered set of selected indices.

use alloc::vec::Vec;

use crate::indices::IndexShift;

/// Selected logical indices in the order they were selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Adds `index`. Returns `false` if it was already selected.
    pub(crate) fn insert(&mut self, index: usize) -> bool {
        if self.contains(index) {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// Removes `index`. Returns `false` if it was not selected.
    pub(crate) fn remove(&mut self, index: usize) -> bool {
        let before = self.indices.len();
        self.indices.retain(|&i| i != index);
        self.indices.len() != before
    }

    /// Empties the selection, returning what was selected.
    pub(crate) fn clear(&mut self) -> Vec<usize> {
        core::mem::take(&mut self.indices)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Carries the selection across a structural change.
    ///
    /// Deleted indices drop out; the rest keep their selection order.
    pub(crate) fn apply(&mut self, shift: &IndexShift<'_>) {
        self.indices = self
            .indices
            .iter()
            .filter_map(|&index| shift.map(index))
            .collect();
    }

    /// Drops indices at or beyond `len`.
    pub(crate) fn retain_below(&mut self, len: usize) {
        self.indices.retain(|&index| index < len);
    }
}
