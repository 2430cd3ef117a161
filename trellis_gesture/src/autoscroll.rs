// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge autoscroll while dragging.
//!
//! Each viewport edge owns a *boundary band* `band` points deep. While the
//! pointer is inside a band the content scrolls toward that edge every tick.
//! The speed ramps linearly: zero at the band's inner edge (`band` points from
//! the viewport edge) up to `max_velocity` at the viewport edge itself. Points
//! past the viewport edge scroll at `max_velocity`.

/// Configuration of the boundary bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoscrollConfig {
    /// Depth of each boundary band, in points.
    pub band: f64,
    /// Scroll distance per tick at the viewport edge, in points.
    pub max_velocity: f64,
}

impl Default for AutoscrollConfig {
    fn default() -> Self {
        Self {
            band: 60.0,
            max_velocity: 15.0,
        }
    }
}

impl AutoscrollConfig {
    /// Scroll delta per tick for a pointer `pointer_y` points below the top of a
    /// viewport `viewport_height` tall.
    ///
    /// Negative values scroll toward the top, positive toward the bottom, zero
    /// means the pointer is outside both bands. When the bands overlap (short
    /// viewports) the nearer edge wins.
    #[must_use]
    pub fn velocity(&self, pointer_y: f64, viewport_height: f64) -> f64 {
        if self.band <= 0.0 || self.max_velocity <= 0.0 {
            return 0.0;
        }
        let from_top = pointer_y;
        let from_bottom = viewport_height - pointer_y;
        if from_top < self.band && from_top <= from_bottom {
            -self.ramp(from_top)
        } else if from_bottom < self.band {
            self.ramp(from_bottom)
        } else {
            0.0
        }
    }

    fn ramp(&self, distance_from_edge: f64) -> f64 {
        let depth = self.band - distance_from_edge.clamp(0.0, self.band);
        self.max_velocity * depth / self.band
    }
}
