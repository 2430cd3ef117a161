// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fixed-rate tick source driven by the host clock.
//!
//! The host event loop owns time; it calls [`Ticker::advance`] with the elapsed
//! wall time and receives the number of ticks that fell due. A stopped ticker
//! never fires and discards any partial interval, so restarting it begins a
//! fresh interval.

use core::time::Duration;

/// Roughly 60 Hz.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// Explicitly started and stopped repeating tick source.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
    running: bool,
}

impl Ticker {
    /// Creates a stopped ticker firing every `interval`.
    ///
    /// A zero interval is treated as [`DEFAULT_TICK_INTERVAL`].
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: if interval.is_zero() {
                DEFAULT_TICK_INTERVAL
            } else {
                interval
            },
            pending: Duration::ZERO,
            running: false,
        }
    }

    /// Interval between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts ticking. Has no effect if already running.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.pending = Duration::ZERO;
        }
    }

    /// Stops ticking and drops any partial interval.
    pub fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    /// Returns `true` while the ticker is started.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the ticker by `elapsed` and returns how many ticks fell due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.pending += elapsed;
        let mut ticks = 0_u32;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            ticks = ticks.saturating_add(1);
        }
        ticks
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::Ticker;

    #[test]
    fn stopped_ticker_never_fires() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        assert_eq!(ticker.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn ticks_accumulate_partial_intervals() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.start();
        assert_eq!(ticker.advance(Duration::from_millis(4)), 0);
        assert_eq!(ticker.advance(Duration::from_millis(7)), 1);
        assert_eq!(ticker.advance(Duration::from_millis(29)), 3);
    }

    #[test]
    fn stop_discards_partial_interval() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.start();
        assert_eq!(ticker.advance(Duration::from_millis(9)), 0);
        ticker.stop();
        assert!(!ticker.is_running());
        ticker.start();
        assert_eq!(ticker.advance(Duration::from_millis(9)), 0);
        assert_eq!(ticker.advance(Duration::from_millis(1)), 1);
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let ticker = Ticker::new(Duration::ZERO);
        assert_eq!(ticker.interval(), super::DEFAULT_TICK_INTERVAL);
    }
}
