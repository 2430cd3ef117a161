// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// `floor(v)` as a signed integer without relying on `std` float intrinsics.
///
/// Values outside the `isize` range saturate; NaN maps to `0`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Saturating float-to-int casts are the intended behavior here"
)]
pub(crate) fn floor_to_isize(v: f64) -> isize {
    let t = v as isize;
    if (t as f64) > v { t - 1 } else { t }
}

/// `ceil(v)` as a signed integer; see [`floor_to_isize`].
pub(crate) fn ceil_to_isize(v: f64) -> isize {
    -floor_to_isize(-v)
}

/// Clamps a signed row/column value into `0..=max`.
#[allow(
    clippy::cast_sign_loss,
    reason = "Value is clamped to be non-negative before the cast"
)]
pub(crate) fn clamp_to_usize(v: isize, max: usize) -> usize {
    let max = isize::try_from(max).unwrap_or(isize::MAX);
    v.clamp(0, max) as usize
}
