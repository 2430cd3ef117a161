// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by grid operations.

/// Reasons a grid operation was rejected.
///
/// A rejected operation leaves the grid exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The index is outside the valid range for the operation.
    #[error("index {index} is out of range for {len} cells")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Number of valid indices at the time of the call.
        len: usize,
    },
    /// The same index appears more than once in a batch.
    #[error("index {0} appears more than once in the batch")]
    DuplicateIndex(usize),
}
