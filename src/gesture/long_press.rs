use std::time::Duration;

use crate::geometry::{PointerId, PointerPoint};
use crate::photo::PhotoId;

use super::host::{FrameScheduler, TimerTicket};

/// A press that the long-press timer has promoted.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredPress {
    pub pointer: PointerId,
    pub photo: PhotoId,
    pub origin: PointerPoint,
    pub last_point: PointerPoint,
}

#[derive(Debug)]
struct ArmedPress {
    ticket: TimerTicket,
    press: FiredPress,
}

/// At most one armed long-press timer per grid.
#[derive(Debug, Default)]
pub struct LongPressDetector {
    armed: Option<ArmedPress>,
}

impl LongPressDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn is_armed_for(&self, pointer: PointerId) -> bool {
        self.armed
            .as_ref()
            .is_some_and(|armed| armed.press.pointer == pointer)
    }

    pub fn arm<S: FrameScheduler>(
        &mut self,
        scheduler: &mut S,
        delay: Duration,
        pointer: PointerId,
        point: PointerPoint,
        photo: PhotoId,
    ) {
        self.cancel(scheduler);
        let ticket = scheduler.schedule_timeout(delay);
        tracing::trace!(?ticket, %photo, "long press armed");
        self.armed = Some(ArmedPress {
            ticket,
            press: FiredPress {
                pointer,
                photo,
                origin: point,
                last_point: point,
            },
        });
    }

    /// Cancels the pending timer and returns the press it belonged to.
    pub fn cancel<S: FrameScheduler>(&mut self, scheduler: &mut S) -> Option<FiredPress> {
        let armed = self.armed.take()?;
        scheduler.cancel_timeout(armed.ticket);
        tracing::trace!(ticket = ?armed.ticket, "long press cancelled");
        Some(armed.press)
    }

    /// Tracks a move of `pointer`. Cancels the timer once movement exceeds
    /// `tolerance` on either axis. Returns true when the move belonged to the
    /// armed press.
    pub fn track_move<S: FrameScheduler>(
        &mut self,
        scheduler: &mut S,
        pointer: PointerId,
        point: PointerPoint,
        tolerance: f64,
    ) -> bool {
        let Some(armed) = self.armed.as_mut() else {
            return false;
        };
        if armed.press.pointer != pointer {
            return false;
        }
        armed.press.last_point = point;
        if point.exceeds_axis_distance(armed.press.origin, tolerance) {
            self.cancel(scheduler);
        }
        true
    }

    /// Consumes the armed press if `ticket` is the live one; stale tickets yield `None`.
    pub fn fire(&mut self, ticket: TimerTicket) -> Option<FiredPress> {
        if self.armed.as_ref()?.ticket != ticket {
            return None;
        }
        self.armed.take().map(|armed| armed.press)
    }
}
