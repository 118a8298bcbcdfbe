use std::collections::HashSet;
use std::time::Duration;

use crate::geometry::{PointerPoint, Viewport};
use crate::photo::{PhotoId, PhotoSequence};
use crate::selection::SelectionSnapshot;

use super::host::{FrameScheduler, FrameTicket, GridSurface, HapticError, TimerTicket};

/// Scheduler whose timeouts and frames only fire when a test takes them.
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    next_id: u64,
    timeouts: Vec<(TimerTicket, Duration)>,
    cancelled_timeouts: Vec<TimerTicket>,
    frames: Vec<FrameTicket>,
    cancelled_frames: Vec<FrameTicket>,
    frame_requests: usize,
}

impl ManualScheduler {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn pending_timeout(&self) -> Option<TimerTicket> {
        self.timeouts.last().map(|(ticket, _)| *ticket)
    }

    pub(crate) fn timeout_delay(&self, ticket: TimerTicket) -> Option<Duration> {
        self.timeouts
            .iter()
            .find(|(candidate, _)| *candidate == ticket)
            .map(|(_, delay)| *delay)
    }

    /// Removes the most recent timeout as if it elapsed.
    pub(crate) fn take_timeout(&mut self) -> Option<TimerTicket> {
        self.timeouts.pop().map(|(ticket, _)| ticket)
    }

    pub(crate) fn pending_timeout_count(&self) -> usize {
        self.timeouts.len()
    }

    pub(crate) fn cancelled_timeouts(&self) -> &[TimerTicket] {
        &self.cancelled_timeouts
    }

    pub(crate) fn pending_frame(&self) -> Option<FrameTicket> {
        self.frames.last().copied()
    }

    /// Removes the most recent frame request as if the frame clock ticked.
    pub(crate) fn take_frame(&mut self) -> Option<FrameTicket> {
        self.frames.pop()
    }

    pub(crate) fn pending_frame_count(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    pub(crate) fn cancelled_frames(&self) -> &[FrameTicket] {
        &self.cancelled_frames
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_timeout(&mut self, delay: Duration) -> TimerTicket {
        let ticket = TimerTicket(self.next_id());
        self.timeouts.push((ticket, delay));
        ticket
    }

    fn cancel_timeout(&mut self, ticket: TimerTicket) {
        self.timeouts.retain(|(candidate, _)| *candidate != ticket);
        self.cancelled_timeouts.push(ticket);
    }

    fn request_frame(&mut self) -> FrameTicket {
        let ticket = FrameTicket(self.next_id());
        self.frames.push(ticket);
        self.frame_requests += 1;
        ticket
    }

    fn cancel_frame(&mut self, ticket: FrameTicket) {
        self.frames.retain(|candidate| *candidate != ticket);
        self.cancelled_frames.push(ticket);
    }
}

pub(crate) const TILE_HEIGHT: f64 = 100.0;
pub(crate) const TILE_WIDTH: f64 = 200.0;

/// Single-column grid of fixed-height tiles inside a scrollable viewport.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub(crate) photos: PhotoSequence,
    pub(crate) viewport_height: f64,
    pub(crate) scroll_offset: f64,
    pub(crate) markers: HashSet<PhotoId>,
    pub(crate) commits: Vec<SelectionSnapshot>,
    pub(crate) live_counts: Vec<usize>,
    pub(crate) haptic_available: bool,
    pub(crate) haptic_pulses: usize,
}

impl RecordingSurface {
    pub(crate) fn new(photos: PhotoSequence, viewport_height: f64) -> Self {
        Self {
            photos,
            viewport_height,
            scroll_offset: 0.0,
            markers: HashSet::new(),
            commits: Vec::new(),
            live_counts: Vec::new(),
            haptic_available: true,
            haptic_pulses: 0,
        }
    }

    fn max_scroll(&self) -> f64 {
        (self.photos.len() as f64 * TILE_HEIGHT - self.viewport_height).max(0.0)
    }

    /// Viewport point at the vertical middle of tile `index` with the current scroll offset.
    pub(crate) fn point_on_tile(&self, index: usize) -> PointerPoint {
        PointerPoint::new(
            TILE_WIDTH / 2.0,
            index as f64 * TILE_HEIGHT + TILE_HEIGHT / 2.0 - self.scroll_offset,
        )
    }

    pub(crate) fn last_commit(&self) -> Option<&SelectionSnapshot> {
        self.commits.last()
    }
}

impl GridSurface for RecordingSurface {
    fn hit_test(&self, point: PointerPoint) -> Option<PhotoId> {
        if point.x < 0.0 || point.x >= TILE_WIDTH {
            return None;
        }
        let content_y = point.y + self.scroll_offset;
        if content_y < 0.0 {
            return None;
        }
        let index = (content_y / TILE_HEIGHT).floor() as usize;
        self.photos.ids().get(index).cloned()
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(0.0, self.viewport_height)
    }

    fn scroll_by(&mut self, delta_y: f64) -> f64 {
        let before = self.scroll_offset;
        self.scroll_offset = (before + delta_y).clamp(0.0, self.max_scroll());
        self.scroll_offset - before
    }

    fn set_tile_marker(&mut self, id: &PhotoId, marked: bool) {
        if marked {
            self.markers.insert(id.clone());
        } else {
            self.markers.remove(id);
        }
    }

    fn clear_tile_markers(&mut self) {
        self.markers.clear();
    }

    fn haptic_pulse(&mut self) -> Result<(), HapticError> {
        if !self.haptic_available {
            return Err(HapticError::Unavailable);
        }
        self.haptic_pulses += 1;
        Ok(())
    }

    fn selection_committed(&mut self, selection: &SelectionSnapshot) {
        self.commits.push(selection.clone());
    }

    fn live_count_changed(&mut self, count: usize) {
        self.live_counts.push(count);
    }
}

pub(crate) fn numbered_photos(count: usize) -> PhotoSequence {
    (1..=count).map(|n| PhotoId::new(format!("p{n}"))).collect()
}

pub(crate) fn id_set(names: &[&str]) -> HashSet<PhotoId> {
    names.iter().copied().map(PhotoId::from).collect()
}
