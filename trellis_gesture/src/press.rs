// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap and long-press recognition for a single pointer.
//!
//! A press starts on a target (for a grid, the cell index under the pointer)
//! and ends in exactly one of three ways:
//!
//! - **Tap**: released over the same target without having moved farther than
//!   the slop and before the long-press delay elapsed.
//! - **Long press**: held in place for at least the long-press delay. The long
//!   press is reported once from [`PressState::poll`], while the pointer is still
//!   down; the later release is reported as [`PressOutcome::LongPressEnded`].
//! - **Suppressed**: moved beyond the slop (the host is scrolling), released
//!   elsewhere, or cancelled.
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Point;
//! use trellis_gesture::press::{PressOutcome, PressState};
//!
//! let mut press: PressState<usize> = PressState::new();
//! press.on_down(3, Point::new(10.0, 10.0), Duration::ZERO);
//! assert_eq!(press.poll(Duration::from_millis(100)), None);
//! let outcome = press.on_up(Some(&3), Point::new(12.0, 11.0));
//! assert_eq!(outcome, PressOutcome::Tap(3));
//! ```

use core::time::Duration;

use kurbo::Point;

/// Default movement tolerance before a press stops being a tap or long press.
pub const DEFAULT_SLOP: f64 = 10.0;

/// Default hold duration before a press becomes a long press.
pub const DEFAULT_LONG_PRESS_DELAY: Duration = Duration::from_millis(500);

/// State for the active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Target under the pointer when the press began.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Clock time at press time.
    pub down_time: Duration,
    /// True once the pointer moved farther than the slop.
    pub slop_exceeded: bool,
    /// True once the long press fired.
    pub long_pressed: bool,
}

/// Result of releasing the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PressOutcome<K> {
    /// The press is a tap on the contained target.
    Tap(K),
    /// The pointer was released after a long press on the contained target.
    LongPressEnded(K),
    /// No gesture; contains the original target if a press was active.
    Suppressed(Option<K>),
}

/// Press recognition state machine.
#[derive(Clone, Debug)]
pub struct PressState<K> {
    press: Option<Press<K>>,
    /// Distance the pointer may travel while still counting as stationary.
    pub slop: f64,
    /// Hold duration after which a stationary press becomes a long press.
    pub long_press_delay: Duration,
}

impl<K: PartialEq + Clone> PressState<K> {
    /// Creates a press state with [`DEFAULT_SLOP`] and [`DEFAULT_LONG_PRESS_DELAY`].
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_SLOP, DEFAULT_LONG_PRESS_DELAY)
    }

    /// Creates a press state with custom thresholds.
    pub fn with_thresholds(slop: f64, long_press_delay: Duration) -> Self {
        Self {
            press: None,
            slop,
            long_press_delay,
        }
    }

    /// Records a pointer down on `target`, replacing any previous press.
    pub fn on_down(&mut self, target: K, position: Point, now: Duration) {
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: now,
            slop_exceeded: false,
            long_pressed: false,
        });
    }

    /// Records pointer movement.
    ///
    /// Returns `Some(target)` the first time the pointer leaves the slop circle,
    /// `None` otherwise. Movement after a long press fired is not tracked.
    pub fn on_move(&mut self, position: Point) -> Option<K> {
        let press = self.press.as_mut()?;
        if press.slop_exceeded || press.long_pressed {
            return None;
        }
        let moved = (position - press.down_position).hypot2();
        if moved > self.slop * self.slop {
            press.slop_exceeded = true;
            return Some(press.target.clone());
        }
        None
    }

    /// Checks whether the active press just became a long press.
    ///
    /// Returns `Some(target)` exactly once per press, when `now` is at least
    /// `long_press_delay` past the press and the pointer stayed inside the slop.
    pub fn poll(&mut self, now: Duration) -> Option<K> {
        let press = self.press.as_mut()?;
        if press.slop_exceeded || press.long_pressed {
            return None;
        }
        if now.saturating_sub(press.down_time) >= self.long_press_delay {
            press.long_pressed = true;
            return Some(press.target.clone());
        }
        None
    }

    /// Records a pointer up over `current_target` and classifies the press.
    pub fn on_up(&mut self, current_target: Option<&K>, position: Point) -> PressOutcome<K> {
        // Final movement counts too.
        let _ = self.on_move(position);
        let Some(press) = self.press.take() else {
            return PressOutcome::Suppressed(None);
        };
        if press.long_pressed {
            return PressOutcome::LongPressEnded(press.target);
        }
        if !press.slop_exceeded && current_target == Some(&press.target) {
            PressOutcome::Tap(press.target)
        } else {
            PressOutcome::Suppressed(Some(press.target))
        }
    }

    /// Cancels the active press, returning its target.
    pub fn cancel(&mut self) -> Option<K> {
        self.press.take().map(|press| press.target)
    }

    /// Rewrites the target of the active press, for example after the item
    /// under the pointer moved to another index.
    ///
    /// If `map` returns `None` the press is cancelled. Returns `true` if a press
    /// is still active afterwards.
    pub fn remap_target(&mut self, map: impl FnOnce(&K) -> Option<K>) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        match map(&press.target) {
            Some(target) => {
                press.target = target;
                true
            }
            None => {
                self.press = None;
                false
            }
        }
    }

    /// Returns the active press, if any.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// Returns `true` if a press could still turn into a long press.
    ///
    /// Hosts use this to keep the clock running while a finger is down.
    pub fn awaiting_long_press(&self) -> bool {
        self.press
            .as_ref()
            .is_some_and(|press| !press.slop_exceeded && !press.long_pressed)
    }
}

impl<K: PartialEq + Clone> Default for PressState<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::Point;

    use super::{PressOutcome, PressState};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn release_over_same_target_is_a_tap() {
        let mut state: PressState<usize> = PressState::new();
        state.on_down(4, Point::new(10.0, 10.0), ms(0));
        assert_eq!(state.on_move(Point::new(14.0, 13.0)), None);
        assert_eq!(
            state.on_up(Some(&4), Point::new(14.0, 13.0)),
            PressOutcome::Tap(4)
        );
        assert!(state.press().is_none());
    }

    #[test]
    fn remapped_target_survives_or_cancels() {
        let mut state: PressState<usize> = PressState::new();
        assert!(!state.remap_target(|&t| Some(t + 1)));
        state.on_down(4, Point::new(10.0, 10.0), ms(0));
        assert!(state.remap_target(|&t| Some(t + 2)));
        assert_eq!(
            state.on_up(Some(&6), Point::new(10.0, 10.0)),
            PressOutcome::Tap(6)
        );
        state.on_down(1, Point::new(10.0, 10.0), ms(0));
        assert!(!state.remap_target(|_| None));
        assert!(state.press().is_none());
    }

    #[test]
    fn release_over_other_target_is_suppressed() {
        let mut state: PressState<usize> = PressState::new();
        state.on_down(4, Point::new(10.0, 10.0), ms(0));
        assert_eq!(
            state.on_up(Some(&5), Point::new(12.0, 10.0)),
            PressOutcome::Suppressed(Some(4))
        );
        assert_eq!(
            state.on_up(Some(&5), Point::new(12.0, 10.0)),
            PressOutcome::Suppressed(None)
        );
    }

    #[test]
    fn leaving_the_slop_reports_once_and_blocks_tap_and_long_press() {
        let mut state: PressState<usize> = PressState::with_thresholds(5.0, ms(300));
        state.on_down(1, Point::new(0.0, 0.0), ms(0));
        assert_eq!(state.on_move(Point::new(0.0, 6.0)), Some(1));
        assert_eq!(state.on_move(Point::new(0.0, 20.0)), None);
        assert!(!state.awaiting_long_press());
        assert_eq!(state.poll(ms(1000)), None);
        assert_eq!(
            state.on_up(Some(&1), Point::new(0.0, 0.0)),
            PressOutcome::Suppressed(Some(1))
        );
    }

    #[test]
    fn long_press_fires_once_after_the_delay() {
        let mut state: PressState<usize> = PressState::with_thresholds(5.0, ms(300));
        state.on_down(7, Point::new(0.0, 0.0), ms(1000));
        assert!(state.awaiting_long_press());
        assert_eq!(state.poll(ms(1299)), None);
        assert_eq!(state.poll(ms(1300)), Some(7));
        assert_eq!(state.poll(ms(1400)), None);
        // Movement after the long press no longer matters.
        assert_eq!(state.on_move(Point::new(50.0, 50.0)), None);
        assert_eq!(
            state.on_up(Some(&7), Point::new(50.0, 50.0)),
            PressOutcome::LongPressEnded(7)
        );
    }

    #[test]
    fn cancel_clears_the_press() {
        let mut state: PressState<usize> = PressState::default();
        state.on_down(2, Point::ZERO, ms(0));
        assert_eq!(state.cancel(), Some(2));
        assert_eq!(state.cancel(), None);
        assert_eq!(state.poll(ms(10_000)), None);
    }
}
