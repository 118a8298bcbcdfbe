//! Long-press, drag and edge auto-scroll selection over a chronological photo grid.
//!
//! The engine owns all per-gesture state. The surface only hears about
//! selection changes at commit points (`selection_committed`) plus the cheap
//! `set_tile_marker` / `live_count_changed` calls while a drag is running.

use crate::config::GestureConfig;
use crate::geometry::{PointerId, PointerPoint};
use crate::photo::{chronological_range, PhotoId, PhotoIdSet, PhotoSequence};
use crate::selection::{SelectionSnapshot, SelectionStore};

use super::auto_scroll::{edge_scroll_speed, AutoScroller};
use super::host::{FrameScheduler, FrameTicket, GridSurface, TimerTicket};
use super::long_press::LongPressDetector;
use super::session::{DragPhase, DragSession, SessionEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The event did not belong to any gesture the engine tracks.
    Ignored,
    /// The event was consumed by an in-progress gesture.
    Tracking,
    /// Plain tap on a tile outside selection mode; the view opens its viewer.
    Activated(PhotoId),
    /// Long press entered selection mode anchored on this tile.
    SelectModeEntered(PhotoId),
    /// Tap in selection mode flipped one tile.
    Toggled { id: PhotoId, selected: bool },
    /// A range drag ended and was committed.
    Committed { count: usize },
    /// The gesture ended without changing the selection.
    Discarded,
}

pub struct GestureEngine<G, S> {
    config: GestureConfig,
    surface: G,
    scheduler: S,
    photos: PhotoSequence,
    store: SelectionStore,
    session: DragSession,
    long_press: LongPressDetector,
    auto_scroll: AutoScroller,
}

impl<G: GridSurface, S: FrameScheduler> GestureEngine<G, S> {
    pub fn new(config: GestureConfig, surface: G, scheduler: S) -> Self {
        Self {
            config,
            surface,
            scheduler,
            photos: PhotoSequence::default(),
            store: SelectionStore::new(),
            session: DragSession::new(),
            long_press: LongPressDetector::new(),
            auto_scroll: AutoScroller::new(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn surface(&self) -> &G {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut G {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn photos(&self) -> &PhotoSequence {
        &self.photos
    }

    /// Replaces the photo sequence after a refresh. An open drag keeps running;
    /// endpoints that disappeared simply stop resolving.
    pub fn replace_photos(&mut self, photos: PhotoSequence) {
        tracing::debug!(count = photos.len(), "photo sequence replaced");
        self.photos = photos;
    }

    pub fn append_photos(&mut self, page: impl IntoIterator<Item = PhotoId>) {
        self.photos = self.photos.appended(page);
        tracing::debug!(count = self.photos.len(), "photo page appended");
    }

    pub fn select_mode_active(&self) -> bool {
        self.store.select_mode_active()
    }

    pub fn committed_ids(&self) -> &PhotoIdSet {
        self.store.committed_ids()
    }

    pub fn live_ids(&self) -> &PhotoIdSet {
        self.store.live_ids()
    }

    pub fn live_count(&self) -> usize {
        self.store.live_count()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.store.snapshot()
    }

    pub fn phase(&self) -> DragPhase {
        self.session.phase()
    }

    pub fn auto_scroll_speed(&self) -> f64 {
        self.auto_scroll.speed()
    }

    pub fn enter_select_mode(&mut self, initial: Option<PhotoId>) {
        self.abort_gesture();
        self.surface.clear_tile_markers();
        self.store.enter_select_mode(initial);
        self.notify_commit();
    }

    /// Leaves selection mode and clears everything. Idempotent.
    pub fn exit_select_mode(&mut self) {
        self.abort_gesture();
        self.surface.clear_tile_markers();
        if self.store.exit_select_mode() {
            self.notify_commit();
        }
    }

    /// Flips one tile's committed membership and returns whether it is now selected.
    pub fn toggle_one(&mut self, id: &PhotoId) -> bool {
        if !self.store.select_mode_active() {
            // A press armed before selection mode started must not activate its tile.
            self.long_press.cancel(&mut self.scheduler);
        }
        let selected = self.store.toggle_one(id);
        if self.store.is_dragging() {
            self.surface.set_tile_marker(id, self.store.live_ids().contains(id));
            self.surface.live_count_changed(self.store.live_count());
        }
        self.notify_commit();
        selected
    }

    /// Cancels every deferred callback. Call before the view is destroyed;
    /// nothing is reported back to the surface.
    pub fn teardown(&mut self) {
        tracing::debug!(phase = ?self.session.phase(), "gesture engine teardown");
        self.abort_gesture();
    }

    pub fn on_pointer_down(&mut self, pointer: PointerId, point: PointerPoint) -> GestureOutcome {
        if self.session.is_open() {
            tracing::trace!(?pointer, "pointer down ignored; drag session already open");
            return GestureOutcome::Ignored;
        }
        self.long_press.cancel(&mut self.scheduler);

        let Some(hit) = self.surface.hit_test(point) else {
            return GestureOutcome::Ignored;
        };

        if !self.store.select_mode_active() {
            self.long_press.arm(
                &mut self.scheduler,
                self.config.long_press_delay(),
                pointer,
                point,
                hit,
            );
            return GestureOutcome::Tracking;
        }

        if let Err(err) = self
            .session
            .open(SessionEvent::Press, pointer, hit, point, point)
        {
            tracing::debug!(%err, "pointer down could not open a drag session");
            return GestureOutcome::Ignored;
        }
        self.store.begin_drag();
        GestureOutcome::Tracking
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, point: PointerPoint) -> GestureOutcome {
        if self.long_press.track_move(
            &mut self.scheduler,
            pointer,
            point,
            self.config.long_press_tolerance_px,
        ) {
            return GestureOutcome::Tracking;
        }
        if !self.session.tracks(pointer) {
            return GestureOutcome::Ignored;
        }
        self.session.set_last_point(point);

        if self.session.phase() == DragPhase::Pending {
            let threshold = self.config.drag_threshold_px;
            if !point.exceeds_axis_distance(self.session.start_point(), threshold) {
                return GestureOutcome::Tracking;
            }
            if self
                .session
                .transition(SessionEvent::ThresholdExceeded)
                .is_err()
            {
                return GestureOutcome::Ignored;
            }
        }

        self.extend_selection_at(point);
        self.update_auto_scroll(point);
        GestureOutcome::Tracking
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId, point: PointerPoint) -> GestureOutcome {
        if self.long_press.is_armed_for(pointer) {
            return match self.long_press.cancel(&mut self.scheduler) {
                Some(press) => GestureOutcome::Activated(press.photo),
                None => GestureOutcome::Ignored,
            };
        }
        if !self.session.tracks(pointer) {
            return GestureOutcome::Ignored;
        }
        self.session.set_last_point(point);
        self.finish_session(SessionEvent::Release)
    }

    pub fn on_pointer_cancel(&mut self, pointer: PointerId) -> GestureOutcome {
        if self.long_press.is_armed_for(pointer) {
            self.long_press.cancel(&mut self.scheduler);
            return GestureOutcome::Discarded;
        }
        if !self.session.tracks(pointer) {
            return GestureOutcome::Ignored;
        }
        self.finish_session(SessionEvent::Cancel)
    }

    /// Delivered by the host when a timer scheduled for a long press elapses.
    pub fn on_long_press_timeout(&mut self, ticket: TimerTicket) -> GestureOutcome {
        let Some(press) = self.long_press.fire(ticket) else {
            tracing::trace!(?ticket, "stale long press timer ignored");
            return GestureOutcome::Ignored;
        };
        if self.session.is_open() || self.store.select_mode_active() {
            return GestureOutcome::Ignored;
        }

        self.store.enter_select_mode(Some(press.photo.clone()));
        if let Err(err) = self.surface.haptic_pulse() {
            tracing::debug!(%err, "haptic pulse skipped");
        }
        if let Err(err) = self.session.open(
            SessionEvent::LongPressFired,
            press.pointer,
            press.photo.clone(),
            press.origin,
            press.last_point,
        ) {
            tracing::warn!(%err, "long press could not open a drag session");
            self.notify_commit();
            return GestureOutcome::Ignored;
        }
        self.store.begin_drag();
        tracing::debug!(photo = %press.photo, "long press entered selection mode");
        self.notify_commit();
        self.surface.live_count_changed(self.store.live_count());
        GestureOutcome::SelectModeEntered(press.photo)
    }

    /// Delivered by the host on the frame requested for auto-scroll.
    pub fn on_frame(&mut self, ticket: FrameTicket) {
        if !self.auto_scroll.take_frame(ticket) {
            tracing::trace!(?ticket, "stale auto-scroll frame ignored");
            return;
        }
        if !self.session.is_active() {
            self.auto_scroll.stop(&mut self.scheduler);
            return;
        }

        let point = self.session.last_point();
        let speed = edge_scroll_speed(point.y, self.surface.viewport(), &self.config);
        if speed == 0.0 {
            self.auto_scroll.stop(&mut self.scheduler);
            return;
        }
        let applied = self.surface.scroll_by(speed);
        tracing::trace!(speed, applied, "auto-scroll tick");

        self.extend_selection_at(point);
        self.auto_scroll.start(&mut self.scheduler, speed);
    }

    /// Moves the current endpoint to the tile under `point`, if any, then
    /// folds `range(anchor, current)` into the live set.
    fn extend_selection_at(&mut self, point: PointerPoint) {
        if let Some(hit) = self.surface.hit_test(point) {
            self.session.set_current(hit);
        }
        let (Some(anchor), Some(current)) = (
            self.session.anchor().cloned(),
            self.session.current().cloned(),
        ) else {
            return;
        };

        let range = chronological_range(&self.photos, &anchor, &current);
        if range.is_empty() {
            return;
        }
        let added = self.store.extend_live(range);
        if added.is_empty() {
            return;
        }
        for id in &added {
            self.surface.set_tile_marker(id, true);
        }
        tracing::trace!(
            %anchor,
            %current,
            added = added.len(),
            live = self.store.live_count(),
            "drag range extended"
        );
        self.surface.live_count_changed(self.store.live_count());
    }

    fn update_auto_scroll(&mut self, point: PointerPoint) {
        let speed = edge_scroll_speed(point.y, self.surface.viewport(), &self.config);
        self.auto_scroll.start(&mut self.scheduler, speed);
    }

    fn finish_session(&mut self, event: SessionEvent) -> GestureOutcome {
        self.auto_scroll.stop(&mut self.scheduler);
        match self.session.phase() {
            DragPhase::None => GestureOutcome::Ignored,
            DragPhase::Pending => {
                let anchor = self.session.anchor().cloned();
                self.close_session(event);
                self.store.discard_drag();
                match (event, anchor) {
                    (SessionEvent::Release, Some(id)) => {
                        let selected = self.store.toggle_one(&id);
                        self.notify_commit();
                        GestureOutcome::Toggled { id, selected }
                    }
                    _ => GestureOutcome::Discarded,
                }
            }
            DragPhase::Active => {
                self.close_session(event);
                self.store.flush();
                self.notify_commit();
                self.surface.clear_tile_markers();
                GestureOutcome::Committed {
                    count: self.store.committed_ids().len(),
                }
            }
        }
    }

    fn abort_gesture(&mut self) {
        self.long_press.cancel(&mut self.scheduler);
        self.auto_scroll.stop(&mut self.scheduler);
        if self.session.is_open() {
            self.close_session(SessionEvent::Abort);
        }
        self.store.discard_drag();
    }

    fn close_session(&mut self, event: SessionEvent) {
        if let Err(err) = self.session.transition(event) {
            tracing::warn!(%err, "drag session did not close cleanly");
        }
    }

    fn notify_commit(&mut self) {
        let snapshot = self.store.snapshot();
        tracing::debug!(
            select_mode = snapshot.select_mode_active,
            count = snapshot.count(),
            "selection committed"
        );
        self.surface.selection_committed(&snapshot);
    }
}
