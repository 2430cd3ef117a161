// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Gesture: interaction state machines for recycling grids.
//!
//! These types turn raw pointer input and clock time into the gestures a grid
//! view reacts to. They hold no views and perform no layout of their own; the
//! drag session reads geometry from a [`trellis_layout::GridLayout`].
//!
//! - [`press::PressState`]: tap vs. long press vs. scroll, for a single pointer.
//! - [`DragSession`]: the drag-to-reorder state machine (`Armed` → `Dragging`),
//!   hover-slot tracking and the displayed-slot → data-index mapping used while
//!   a reorder is pending.
//! - [`AutoscrollConfig`]: boundary bands and the linear speed ramp.
//! - [`Ticker`]: a start/stop fixed-rate tick source the host clock drives.
//!
//! ## Example
//!
//! ```rust
//! use core::num::NonZeroUsize;
//! use kurbo::{Point, Size};
//! use trellis_gesture::{DragOutcome, DragSession};
//! use trellis_layout::{GridLayout, GridMetrics};
//!
//! let metrics = GridMetrics::new(Size::new(80.0, 80.0), NonZeroUsize::new(4).unwrap());
//! let mut layout = GridLayout::new(metrics, 10);
//! layout.set_viewport(Size::new(320.0, 240.0));
//!
//! // Pick up cell 4 (at 0,80) and drag it over slot 1.
//! let mut drag = DragSession::arm(4, Point::new(0.0, 80.0), Point::new(40.0, 120.0), &layout, 4.0);
//! drag.update_pointer(Point::new(120.0, 40.0));
//! let hover = drag.hover_index(&layout).unwrap();
//! let reorder = drag.retarget(hover).unwrap();
//! assert_eq!((reorder.from, reorder.to), (4, 1));
//! assert_eq!(drag.outcome(), DragOutcome::Moved { from: 4, to: 1 });
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod press;

mod autoscroll;
mod drag;
mod ticker;

pub use autoscroll::AutoscrollConfig;
pub use drag::{DEFAULT_DRAG_THRESHOLD, DragOutcome, DragPhase, DragSession, Reorder};
pub use ticker::{DEFAULT_TICK_INTERVAL, Ticker};
