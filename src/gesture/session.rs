use thiserror::Error;

use crate::geometry::{PointerId, PointerPoint};
use crate::photo::PhotoId;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    None,
    Pending,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Pointer down on a tile while selection mode is already active.
    Press,
    LongPressFired,
    ThresholdExceeded,
    Release,
    Cancel,
    /// Session torn down from outside the gesture (exit, enter, teardown).
    Abort,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid drag transition: from {from:?} using event {event:?}")]
    InvalidTransition { from: DragPhase, event: SessionEvent },
}

/// The single drag session a grid may have open.
#[derive(Debug, Default)]
pub struct DragSession {
    phase: DragPhase,
    anchor: Option<PhotoId>,
    current: Option<PhotoId>,
    pointer: Option<PointerId>,
    start_point: PointerPoint,
    last_point: PointerPoint,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != DragPhase::None
    }

    pub fn is_active(&self) -> bool {
        self.phase == DragPhase::Active
    }

    pub fn tracks(&self, pointer: PointerId) -> bool {
        self.is_open() && self.pointer == Some(pointer)
    }

    pub fn anchor(&self) -> Option<&PhotoId> {
        self.anchor.as_ref()
    }

    pub fn current(&self) -> Option<&PhotoId> {
        self.current.as_ref()
    }

    pub fn start_point(&self) -> PointerPoint {
        self.start_point
    }

    pub fn last_point(&self) -> PointerPoint {
        self.last_point
    }

    pub fn set_last_point(&mut self, point: PointerPoint) {
        self.last_point = point;
    }

    /// Moves the current endpoint. Returns false when it was already `id`.
    pub fn set_current(&mut self, id: PhotoId) -> bool {
        if self.current.as_ref() == Some(&id) {
            return false;
        }
        self.current = Some(id);
        true
    }

    pub fn next_phase(&self, event: SessionEvent) -> Option<DragPhase> {
        use SessionEvent::*;
        match (self.phase, event) {
            (DragPhase::None, Press) => Some(DragPhase::Pending),
            (DragPhase::None, LongPressFired) => Some(DragPhase::Active),
            (DragPhase::Pending, ThresholdExceeded) => Some(DragPhase::Active),
            (DragPhase::Pending | DragPhase::Active, Release | Cancel | Abort) => {
                Some(DragPhase::None)
            }
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> SessionResult<DragPhase> {
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            tracing::warn!(from = ?from, event = ?event, "invalid drag transition requested");
            SessionError::InvalidTransition { from, event }
        })?;
        tracing::debug!(from = ?self.phase, to = ?next, event = ?event, "drag session transition");

        self.phase = next;
        if next == DragPhase::None {
            self.anchor = None;
            self.current = None;
            self.pointer = None;
        }
        Ok(next)
    }

    /// Opens a session anchored on `anchor` via `Press` or `LongPressFired`.
    pub fn open(
        &mut self,
        event: SessionEvent,
        pointer: PointerId,
        anchor: PhotoId,
        start_point: PointerPoint,
        last_point: PointerPoint,
    ) -> SessionResult<DragPhase> {
        if !matches!(event, SessionEvent::Press | SessionEvent::LongPressFired) {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                event,
            });
        }
        let phase = self.transition(event)?;
        self.pointer = Some(pointer);
        self.current = Some(anchor.clone());
        self.anchor = Some(anchor);
        self.start_point = start_point;
        self.last_point = last_point;
        Ok(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(event: SessionEvent) -> DragSession {
        let mut session = DragSession::new();
        session
            .open(
                event,
                PointerId::PRIMARY,
                PhotoId::from("p1"),
                PointerPoint::new(5.0, 5.0),
                PointerPoint::new(6.0, 5.0),
            )
            .expect("idle session should open");
        session
    }

    #[test]
    fn press_opens_pending_and_threshold_promotes() {
        let mut session = opened(SessionEvent::Press);
        assert_eq!(session.phase(), DragPhase::Pending);
        assert_eq!(session.anchor(), Some(&PhotoId::from("p1")));
        assert_eq!(session.current(), session.anchor());
        assert_eq!(session.last_point(), PointerPoint::new(6.0, 5.0));

        let phase = session
            .transition(SessionEvent::ThresholdExceeded)
            .expect("pending -> active should transition");
        assert_eq!(phase, DragPhase::Active);
    }

    #[test]
    fn long_press_opens_directly_active() {
        let session = opened(SessionEvent::LongPressFired);
        assert!(session.is_active());
        assert!(session.tracks(PointerId::PRIMARY));
        assert!(!session.tracks(PointerId(7)));
    }

    #[test]
    fn closing_clears_endpoints() {
        let mut session = opened(SessionEvent::LongPressFired);
        session
            .transition(SessionEvent::Release)
            .expect("active -> none should transition");

        assert!(!session.is_open());
        assert!(session.anchor().is_none());
        assert!(session.current().is_none());
        assert!(!session.tracks(PointerId::PRIMARY));
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_phase() {
        let mut session = opened(SessionEvent::Press);

        let err = session
            .open(
                SessionEvent::Press,
                PointerId(2),
                PhotoId::from("p2"),
                PointerPoint::default(),
                PointerPoint::default(),
            )
            .expect_err("second press while pending should fail");
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                from: DragPhase::Pending,
                event: SessionEvent::Press
            }
        );
        assert_eq!(session.phase(), DragPhase::Pending);
        assert_eq!(session.anchor(), Some(&PhotoId::from("p1")));

        let mut idle = DragSession::new();
        assert!(idle.transition(SessionEvent::ThresholdExceeded).is_err());
        assert!(idle.transition(SessionEvent::Release).is_err());
        assert_eq!(idle.phase(), DragPhase::None);
    }

    #[test]
    fn set_current_reports_changes_only() {
        let mut session = opened(SessionEvent::LongPressFired);
        assert!(!session.set_current(PhotoId::from("p1")));
        assert!(session.set_current(PhotoId::from("p2")));
        assert_eq!(session.current(), Some(&PhotoId::from("p2")));
    }
}
