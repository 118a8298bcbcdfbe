use std::time::Duration;

use thiserror::Error;

use crate::geometry::{PointerPoint, Viewport};
use crate::photo::PhotoId;
use crate::selection::SelectionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(pub u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HapticError {
    #[error("haptic feedback is not available on this device")]
    Unavailable,
    #[error("haptic request failed: {0}")]
    Failed(String),
}

/// The view that renders the grid, as seen by the gesture engine.
///
/// Coordinates passed to `hit_test` and returned by `viewport` share one
/// space, normally the scroll container's.
pub trait GridSurface {
    /// Photo id of the tile rendered under `point`, if any.
    fn hit_test(&self, point: PointerPoint) -> Option<PhotoId>;

    fn viewport(&self) -> Viewport;

    /// Scrolls the container by `delta_y` and returns the distance actually applied.
    fn scroll_by(&mut self, delta_y: f64) -> f64;

    /// Non-committing visual marker. Idempotent; unknown ids are ignored.
    fn set_tile_marker(&mut self, id: &PhotoId, marked: bool);

    fn clear_tile_markers(&mut self);

    fn haptic_pulse(&mut self) -> Result<(), HapticError> {
        Err(HapticError::Unavailable)
    }

    /// Commit point: the view re-renders its selection from `selection`.
    fn selection_committed(&mut self, selection: &SelectionSnapshot);

    /// In-progress counter update during a drag; must not trigger a full re-render.
    fn live_count_changed(&mut self, _count: usize) {}
}

/// Deferred callbacks on the host's single UI thread.
///
/// Fires are delivered back through `GestureEngine::on_long_press_timeout`
/// and `GestureEngine::on_frame` with the ticket returned here.
pub trait FrameScheduler {
    fn schedule_timeout(&mut self, delay: Duration) -> TimerTicket;

    fn cancel_timeout(&mut self, ticket: TimerTicket);

    fn request_frame(&mut self) -> FrameTicket;

    fn cancel_frame(&mut self, ticket: FrameTicket);
}
