// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for animation timing and gesture recognition.

use core::time::Duration;

use trellis_gesture::press::{DEFAULT_LONG_PRESS_DELAY, DEFAULT_SLOP};
use trellis_gesture::{AutoscrollConfig, DEFAULT_DRAG_THRESHOLD, DEFAULT_TICK_INTERVAL};

use crate::animation::Easing;

/// Behavioral configuration of a [`GridView`](crate::GridView).
///
/// Geometry is not configured here; it comes from the delegate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Duration of insert/delete/move animations, drag shifts and animated scrolls.
    pub animation_duration: Duration,
    /// Easing applied to every frame track.
    pub easing: Easing,
    /// Hold time before a press becomes a long press.
    pub long_press_delay: Duration,
    /// Movement tolerance for taps and long presses.
    pub tap_slop: f64,
    /// Pointer travel that turns a picked-up cell into an active drag.
    pub drag_threshold: f64,
    /// Boundary bands for autoscroll while dragging.
    pub autoscroll: AutoscrollConfig,
    /// Interval of the autoscroll ticker.
    pub tick_interval: Duration,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_millis(250),
            easing: Easing::EaseInOut,
            long_press_delay: DEFAULT_LONG_PRESS_DELAY,
            tap_slop: DEFAULT_SLOP,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            autoscroll: AutoscrollConfig::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
