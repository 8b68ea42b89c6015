// SPDX-License-Identifier: MPL-2.0
//! Single/double tap discrimination.
//!
//! A single tap must yield to a potential double tap: the first tap is
//! withheld until the double-tap window expires, so a double tap is
//! never misreported as two singles. Time is always passed in by the
//! caller, which keeps recognition deterministic under test.

use crate::config::DOUBLE_TAP_SLOP;
use iced::Point;
use std::time::{Duration, Instant};

/// A recognized tap gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tap {
    Single(Point),
    Double(Point),
}

/// Stateful recognizer fed raw tap events.
#[derive(Debug)]
pub struct TapRecognizer {
    pending: Option<(Point, Instant)>,
    interval: Duration,
    slop: f32,
}

impl TapRecognizer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            pending: None,
            interval,
            slop: DOUBLE_TAP_SLOP,
        }
    }

    /// Feeds a raw tap. Returns a recognized gesture, or `None` while a
    /// potential double tap is still pending.
    ///
    /// A second tap within the window and slop distance completes a
    /// double tap at the second location. A second tap outside either
    /// bound releases the withheld first tap as a single and starts a
    /// new pending window.
    pub fn touch(&mut self, at: Point, now: Instant) -> Option<Tap> {
        if let Some((first, first_at)) = self.pending.take() {
            let in_window = now.saturating_duration_since(first_at) <= self.interval;
            if in_window && distance(first, at) <= self.slop {
                return Some(Tap::Double(at));
            }
            self.pending = Some((at, now));
            return Some(Tap::Single(first));
        }
        self.pending = Some((at, now));
        None
    }

    /// Releases a withheld single tap once its double-tap window has
    /// expired. Call this periodically (or from a timer keyed to the
    /// interval).
    pub fn flush(&mut self, now: Instant) -> Option<Tap> {
        let (at, first_at) = self.pending?;
        if now.saturating_duration_since(first_at) > self.interval {
            self.pending = None;
            return Some(Tap::Single(at));
        }
        None
    }

    /// Drops any pending tap (e.g. when the page disappears mid-window).
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
