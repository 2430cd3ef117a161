// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame and alpha tracks driven by the host clock.
//!
//! The grid never owns a render loop. Each structural change registers one
//! [`Track`] per affected view (from frame/alpha, to frame/alpha, start time and
//! duration); [`Animator::advance`] samples every track at the current clock
//! time and reports the views whose track completed. A retiring track belongs
//! to a view that leaves the grid (a deleted cell fading out) and is recycled by
//! the caller once the track finishes.

use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::pool::ViewId;

/// Easing curves for frame tracks and animated scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress `t` to eased progress. `t` is clamped to `0..=1`.
    ///
    /// ```
    /// use trellis_grid::Easing;
    ///
    /// assert_eq!(Easing::Linear.apply(0.25), 0.25);
    /// assert!(Easing::EaseIn.apply(0.5) < 0.5);
    /// assert!(Easing::EaseOut.apply(0.5) > 0.5);
    /// assert_eq!(Easing::EaseInOut.apply(1.0), 1.0);
    /// ```
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// Linear progress of a timeline that started at `start`, at clock time `now`.
pub(crate) fn progress(start: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

/// One view's animation from a start frame/alpha to an end frame/alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Track {
    pub(crate) from: Rect,
    pub(crate) to: Rect,
    pub(crate) from_alpha: f64,
    pub(crate) to_alpha: f64,
    pub(crate) start: Duration,
    pub(crate) duration: Duration,
    /// The view leaves the grid when the track completes.
    pub(crate) retire: bool,
}

impl Track {
    /// Slide from `from` to `to` at full opacity.
    pub(crate) fn slide(from: Rect, to: Rect, start: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            from_alpha: 1.0,
            to_alpha: 1.0,
            start,
            duration,
            retire: false,
        }
    }

    /// Fade in place between two opacities.
    pub(crate) fn fade(
        frame: Rect,
        from_alpha: f64,
        to_alpha: f64,
        start: Duration,
        duration: Duration,
    ) -> Self {
        Self {
            from: frame,
            to: frame,
            from_alpha,
            to_alpha,
            start,
            duration,
            retire: false,
        }
    }

    /// Marks the view for recycling on completion.
    pub(crate) fn retiring(mut self) -> Self {
        self.retire = true;
        self
    }

    fn sample(&self, easing: Easing, now: Duration) -> (Rect, f64, bool) {
        let linear = progress(self.start, self.duration, now);
        let t = easing.apply(linear);
        (
            lerp_rect(self.from, self.to, t),
            lerp(self.from_alpha, self.to_alpha, t),
            linear >= 1.0,
        )
    }
}

/// A completed track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Finished {
    pub(crate) id: ViewId,
    pub(crate) retire: bool,
}

/// The set of running frame tracks, keyed by view.
#[derive(Clone, Debug, Default)]
pub(crate) struct Animator {
    tracks: HashMap<ViewId, Track>,
    easing: Easing,
}

impl Animator {
    pub(crate) fn new(easing: Easing) -> Self {
        Self {
            tracks: HashMap::new(),
            easing,
        }
    }

    /// Starts `track` for `id`, replacing any track already running for it.
    pub(crate) fn animate(&mut self, id: ViewId, track: Track) {
        self.tracks.insert(id, track);
    }

    pub(crate) fn is_tracking(&self, id: ViewId) -> bool {
        self.tracks.contains_key(&id)
    }

    #[cfg(test)]
    pub(crate) fn is_retiring(&self, id: ViewId) -> bool {
        self.tracks.get(&id).is_some_and(|track| track.retire)
    }

    /// End frame of the track running for `id`.
    pub(crate) fn target(&self, id: ViewId) -> Option<Rect> {
        self.tracks.get(&id).map(|track| track.to)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drops the track for `id` without applying its end state.
    pub(crate) fn remove(&mut self, id: ViewId) -> Option<Track> {
        self.tracks.remove(&id)
    }

    /// Samples every track at `now`, handing `apply` the current frame and
    /// alpha of each view. Completed tracks are removed and returned.
    pub(crate) fn advance(
        &mut self,
        now: Duration,
        mut apply: impl FnMut(ViewId, Rect, f64),
    ) -> Vec<Finished> {
        let easing = self.easing;
        let mut finished = Vec::new();
        self.tracks.retain(|&id, track| {
            let (frame, alpha, done) = track.sample(easing, now);
            apply(id, frame, alpha);
            if done {
                finished.push(Finished {
                    id,
                    retire: track.retire,
                });
            }
            !done
        });
        finished
    }

    /// Jumps every track to its end state and clears the animator.
    pub(crate) fn finish_all(&mut self, mut apply: impl FnMut(ViewId, Rect, f64)) -> Vec<Finished> {
        self.tracks
            .drain()
            .map(|(id, track)| {
                apply(id, track.to, track.to_alpha);
                Finished {
                    id,
                    retire: track.retire,
                }
            })
            .collect()
    }
}

/// An animated change of the scroll offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScrollAnimation {
    pub(crate) from: f64,
    pub(crate) to: f64,
    pub(crate) start: Duration,
    pub(crate) duration: Duration,
    /// Cell reported to the delegate on completion.
    pub(crate) index: usize,
}

impl ScrollAnimation {
    /// Offset at `now` and whether the animation is complete.
    pub(crate) fn sample(&self, easing: Easing, now: Duration) -> (f64, bool) {
        let linear = progress(self.start, self.duration, now);
        (
            lerp(self.from, self.to, easing.apply(linear)),
            linear >= 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::Rect;
    use slotmap::SlotMap;

    use super::{Animator, Easing, ScrollAnimation, Track};
    use crate::pool::ViewId;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
    }

    #[test]
    fn tracks_interpolate_and_finish() {
        let mut ids: SlotMap<ViewId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());
        let mut animator = Animator::new(Easing::Linear);
        let from = Rect::new(0.0, 0.0, 10.0, 10.0);
        let to = Rect::new(100.0, 0.0, 110.0, 10.0);
        animator.animate(a, Track::slide(from, to, ms(0), ms(100)));
        animator.animate(
            b,
            Track::fade(from, 1.0, 0.0, ms(0), ms(200)).retiring(),
        );

        let mut seen = alloc::vec::Vec::new();
        let finished = animator.advance(ms(50), |id, frame, alpha| seen.push((id, frame, alpha)));
        assert!(finished.is_empty());
        assert!(seen.contains(&(a, Rect::new(50.0, 0.0, 60.0, 10.0), 1.0)));
        assert!(seen.contains(&(b, from, 0.75)));

        let finished = animator.advance(ms(100), |_, _, _| {});
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, a);
        assert!(!finished[0].retire);
        assert!(animator.is_retiring(b));

        let finished = animator.finish_all(|id, frame, alpha| {
            assert_eq!((id, frame, alpha), (b, from, 0.0));
        });
        assert_eq!(finished.len(), 1);
        assert!(finished[0].retire);
        assert!(animator.is_empty());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut ids: SlotMap<ViewId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let mut animator = Animator::new(Easing::EaseInOut);
        let to = Rect::new(5.0, 5.0, 6.0, 6.0);
        animator.animate(a, Track::slide(Rect::ZERO, to, ms(10), Duration::ZERO));
        let mut last = Rect::ZERO;
        let finished = animator.advance(ms(10), |_, frame, _| last = frame);
        assert_eq!(finished.len(), 1);
        assert_eq!(last, to);
    }

    #[test]
    fn scroll_animation_reaches_target() {
        let scroll = ScrollAnimation {
            from: 0.0,
            to: 400.0,
            start: ms(0),
            duration: ms(100),
            index: 7,
        };
        assert_eq!(scroll.sample(Easing::Linear, ms(25)), (100.0, false));
        assert_eq!(scroll.sample(Easing::EaseInOut, ms(150)), (400.0, true));
    }
}
