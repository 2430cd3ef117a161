// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index arithmetic for structural changes.
//!
//! An [`IndexShift`] describes one batch mutation of the logical index space
//! and translates indices across it. Insert positions are interpreted in the
//! post-insert index space and delete positions in the pre-delete space, so a
//! batch `insert [3, 4]` on `[a, b, c, d, e]` produces `[a, b, c, X, Y, d, e]`.

use alloc::vec::Vec;

use crate::GridError;

/// One structural change of the logical index space.
///
/// Insert and delete positions must be sorted ascending and unique; see
/// [`normalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndexShift<'a> {
    /// New items appear at these (post-insert) positions.
    Insert(&'a [usize]),
    /// Items at these (pre-delete) positions disappear.
    Delete(&'a [usize]),
    /// One item moves from `from` to `to`; the items between shift by one.
    Move { from: usize, to: usize },
}

impl IndexShift<'_> {
    /// Translates an index from before the change to after it.
    ///
    /// Returns `None` for a deleted index.
    pub(crate) fn map(&self, old: usize) -> Option<usize> {
        match *self {
            IndexShift::Insert(positions) => {
                let mut new = old;
                for &position in positions {
                    if position <= new {
                        new += 1;
                    } else {
                        break;
                    }
                }
                Some(new)
            }
            IndexShift::Delete(positions) => {
                if positions.binary_search(&old).is_ok() {
                    None
                } else {
                    Some(old - positions.partition_point(|&p| p < old))
                }
            }
            IndexShift::Move { from, to } => Some(move_index(old, from, to)),
        }
    }

    /// Translates an index from after the change back to before it.
    ///
    /// Returns `None` for an inserted index.
    pub(crate) fn unmap(&self, new: usize) -> Option<usize> {
        match *self {
            IndexShift::Insert(positions) => {
                if positions.binary_search(&new).is_ok() {
                    None
                } else {
                    Some(new - positions.partition_point(|&p| p < new))
                }
            }
            IndexShift::Delete(positions) => {
                let mut old = new;
                for &position in positions {
                    if position <= old {
                        old += 1;
                    } else {
                        break;
                    }
                }
                Some(old)
            }
            IndexShift::Move { from, to } => Some(move_index(new, to, from)),
        }
    }

    /// Cell count after the change.
    pub(crate) fn apply_count(&self, count: usize) -> usize {
        match *self {
            IndexShift::Insert(positions) => count + positions.len(),
            IndexShift::Delete(positions) => count.saturating_sub(positions.len()),
            IndexShift::Move { .. } => count,
        }
    }
}

fn move_index(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < to && (from + 1..=to).contains(&index) {
        index - 1
    } else if to < from && (to..from).contains(&index) {
        index + 1
    } else {
        index
    }
}

/// Sorts `indices` and checks each against `len`.
///
/// Fails on the first index `>= len` or the first duplicate. Nothing is
/// returned on failure, so callers can reject the whole batch.
pub(crate) fn normalize(indices: &[usize], len: usize) -> Result<Vec<usize>, GridError> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    if let Some(&index) = sorted.iter().find(|&&index| index >= len) {
        return Err(GridError::InvalidIndex { index, len });
    }
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(GridError::DuplicateIndex(pair[0]));
    }
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{IndexShift, normalize};
    use crate::GridError;

    #[test]
    fn insert_positions_are_post_insert() {
        let shift = IndexShift::Insert(&[3, 4]);
        let mapped: Vec<_> = (0..5).map(|i| shift.map(i).unwrap()).collect();
        assert_eq!(mapped, [0, 1, 2, 5, 6]);
        assert_eq!(shift.unmap(3), None);
        assert_eq!(shift.unmap(4), None);
        assert_eq!(shift.unmap(6), Some(4));
        assert_eq!(shift.apply_count(5), 7);
    }

    #[test]
    fn insert_at_front_shifts_everything() {
        let shift = IndexShift::Insert(&[0]);
        assert_eq!(shift.map(0), Some(1));
        assert_eq!(shift.map(9), Some(10));
    }

    #[test]
    fn delete_positions_are_pre_delete() {
        let shift = IndexShift::Delete(&[2, 3]);
        let mapped: Vec<_> = (0..7).map(|i| shift.map(i)).collect();
        assert_eq!(
            mapped,
            [Some(0), Some(1), None, None, Some(2), Some(3), Some(4)]
        );
        assert_eq!(shift.unmap(2), Some(4));
        assert_eq!(shift.apply_count(7), 5);
    }

    #[test]
    fn map_and_unmap_are_inverse_for_survivors() {
        let shifts = [
            IndexShift::Insert(&[0, 2, 7]),
            IndexShift::Delete(&[1, 4, 5]),
            IndexShift::Move { from: 2, to: 6 },
            IndexShift::Move { from: 6, to: 2 },
        ];
        for shift in shifts {
            for old in 0..10 {
                if let Some(new) = shift.map(old) {
                    assert_eq!(shift.unmap(new), Some(old), "{shift:?} at {old}");
                }
            }
        }
    }

    #[test]
    fn move_shifts_the_span_between() {
        let shift = IndexShift::Move { from: 4, to: 1 };
        let mapped: Vec<_> = (0..6).map(|i| shift.map(i).unwrap()).collect();
        assert_eq!(mapped, [0, 2, 3, 4, 1, 5]);
    }

    #[test]
    fn normalize_rejects_bad_batches() {
        assert_eq!(normalize(&[4, 1], 5), Ok(alloc::vec![1, 4]));
        assert_eq!(
            normalize(&[1, 5], 5),
            Err(GridError::InvalidIndex { index: 5, len: 5 })
        );
        assert_eq!(normalize(&[2, 2], 5), Err(GridError::DuplicateIndex(2)));
    }
}
