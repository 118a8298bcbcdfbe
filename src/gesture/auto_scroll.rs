use crate::config::GestureConfig;
use crate::geometry::Viewport;

use super::host::{FrameScheduler, FrameTicket};

/// Signed scroll speed in px per frame for a pointer at `pointer_y`.
///
/// Zero outside both edge zones. Inside a zone the magnitude grows linearly
/// from `min_scroll_speed` at the zone boundary to `max_scroll_speed` at the
/// viewport edge (and beyond it). Negative scrolls towards the top.
pub fn edge_scroll_speed(pointer_y: f64, viewport: Viewport, config: &GestureConfig) -> f64 {
    if viewport.height <= 0.0 || config.edge_zone_px <= 0.0 {
        return 0.0;
    }
    let from_top = pointer_y - viewport.top;
    let from_bottom = viewport.bottom() - pointer_y;
    let (distance, sign) = if from_top <= from_bottom {
        (from_top, -1.0)
    } else {
        (from_bottom, 1.0)
    };
    if distance > config.edge_zone_px {
        return 0.0;
    }

    let ratio = (distance / config.edge_zone_px).clamp(0.0, 1.0);
    let range = config.max_scroll_speed - config.min_scroll_speed;
    sign * (config.min_scroll_speed + (1.0 - ratio) * range)
}

/// Self-rescheduling scroll loop with a single in-flight frame.
#[derive(Debug, Default)]
pub struct AutoScroller {
    speed: f64,
    frame: Option<FrameTicket>,
}

impl AutoScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    /// Sets the speed; zero stops the loop, anything else ensures one frame is pending.
    pub fn start<S: FrameScheduler>(&mut self, scheduler: &mut S, speed: f64) {
        if speed == 0.0 {
            self.stop(scheduler);
            return;
        }
        if self.speed == 0.0 {
            tracing::debug!(speed, "auto-scroll started");
        }
        self.speed = speed;
        self.reschedule(scheduler);
    }

    pub fn stop<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        self.speed = 0.0;
        if let Some(ticket) = self.frame.take() {
            scheduler.cancel_frame(ticket);
            tracing::debug!("auto-scroll stopped");
        }
    }

    /// Consumes `ticket` if it is the pending frame. A stale ticket returns false.
    pub fn take_frame(&mut self, ticket: FrameTicket) -> bool {
        if self.frame != Some(ticket) {
            return false;
        }
        self.frame = None;
        true
    }

    /// Requests the next frame unless one is already pending or the speed is zero.
    pub fn reschedule<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if self.speed != 0.0 && self.frame.is_none() {
            self.frame = Some(scheduler.request_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::testing::ManualScheduler;

    fn viewport() -> Viewport {
        Viewport::new(0.0, 600.0)
    }

    #[test]
    fn speed_is_zero_outside_edge_zones() {
        let config = GestureConfig::default();
        assert_eq!(edge_scroll_speed(300.0, viewport(), &config), 0.0);
        assert_eq!(edge_scroll_speed(60.5, viewport(), &config), 0.0);
        assert_eq!(edge_scroll_speed(539.5, viewport(), &config), 0.0);
    }

    #[test]
    fn speed_at_zone_boundary_is_minimum() {
        let config = GestureConfig::default();
        assert_eq!(edge_scroll_speed(60.0, viewport(), &config), -6.0);
        assert_eq!(edge_scroll_speed(540.0, viewport(), &config), 6.0);
    }

    #[test]
    fn speed_at_outer_edge_is_maximum() {
        let config = GestureConfig::default();
        assert_eq!(edge_scroll_speed(0.0, viewport(), &config), -48.0);
        assert_eq!(edge_scroll_speed(600.0, viewport(), &config), 48.0);
        assert_eq!(edge_scroll_speed(-40.0, viewport(), &config), -48.0);
        assert_eq!(edge_scroll_speed(700.0, viewport(), &config), 48.0);
    }

    #[test]
    fn speed_grows_towards_the_edge() {
        let config = GestureConfig::default();
        assert_eq!(edge_scroll_speed(570.0, viewport(), &config), 27.0);
        let near = edge_scroll_speed(590.0, viewport(), &config);
        let far = edge_scroll_speed(550.0, viewport(), &config);
        assert!(near > far);
    }

    #[test]
    fn viewport_offset_is_respected() {
        let config = GestureConfig::default();
        let shifted = Viewport::new(100.0, 400.0);
        assert_eq!(edge_scroll_speed(100.0, shifted, &config), -48.0);
        assert_eq!(edge_scroll_speed(40.0, shifted, &config), -48.0);
        assert_eq!(edge_scroll_speed(300.0, shifted, &config), 0.0);
    }

    #[test]
    fn start_keeps_a_single_frame_in_flight() {
        let mut scheduler = ManualScheduler::default();
        let mut scroller = AutoScroller::new();

        scroller.start(&mut scheduler, 10.0);
        scroller.start(&mut scheduler, 20.0);
        assert_eq!(scheduler.frame_requests(), 1);
        assert_eq!(scroller.speed(), 20.0);

        let ticket = scheduler.pending_frame().expect("frame should be requested");
        assert!(scroller.take_frame(ticket));
        assert!(!scroller.take_frame(ticket));
        scroller.reschedule(&mut scheduler);
        assert_eq!(scheduler.frame_requests(), 2);
    }

    #[test]
    fn zero_speed_stops_and_cancels_frame() {
        let mut scheduler = ManualScheduler::default();
        let mut scroller = AutoScroller::new();

        scroller.start(&mut scheduler, -12.0);
        let ticket = scheduler.pending_frame().expect("frame should be requested");
        scroller.start(&mut scheduler, 0.0);

        assert!(!scroller.is_running());
        assert_eq!(scroller.speed(), 0.0);
        assert!(scheduler.cancelled_frames().contains(&ticket));
        scroller.reschedule(&mut scheduler);
        assert_eq!(scheduler.frame_requests(), 1);
    }
}
