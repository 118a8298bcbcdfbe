use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gtk4::glib;
use gtk4::prelude::*;

use crate::gesture::{FrameScheduler, FrameTicket, TimerTicket};

use super::GtkGestureEngine;

/// `FrameScheduler` on the GTK main loop: glib timeouts for long presses and
/// widget tick callbacks for auto-scroll frames.
pub struct GtkScheduler {
    widget: gtk4::Widget,
    engine: Weak<RefCell<GtkGestureEngine>>,
    next_ticket: u64,
    timeouts: Rc<RefCell<HashMap<u64, glib::SourceId>>>,
    frames: Rc<RefCell<HashMap<u64, gtk4::TickCallbackId>>>,
}

impl GtkScheduler {
    pub(super) fn new(widget: gtk4::Widget, engine: Weak<RefCell<GtkGestureEngine>>) -> Self {
        Self {
            widget,
            engine,
            next_ticket: 0,
            timeouts: Rc::new(RefCell::new(HashMap::new())),
            frames: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn next_ticket(&mut self) -> u64 {
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.next_ticket
    }
}

impl FrameScheduler for GtkScheduler {
    fn schedule_timeout(&mut self, delay: Duration) -> TimerTicket {
        let ticket = TimerTicket(self.next_ticket());
        let engine = self.engine.clone();
        let timeouts = self.timeouts.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            timeouts.borrow_mut().remove(&ticket.0);
            super::with_engine(&engine, |engine| {
                let outcome = engine.on_long_press_timeout(ticket);
                tracing::trace!(?ticket, ?outcome, "long press timeout delivered");
            });
        });
        self.timeouts.borrow_mut().insert(ticket.0, source);
        ticket
    }

    fn cancel_timeout(&mut self, ticket: TimerTicket) {
        if let Some(source) = self.timeouts.borrow_mut().remove(&ticket.0) {
            source.remove();
        }
    }

    fn request_frame(&mut self) -> FrameTicket {
        let ticket = FrameTicket(self.next_ticket());
        let engine = self.engine.clone();
        let frames = self.frames.clone();
        let callback_id = self.widget.add_tick_callback(move |_, _| {
            frames.borrow_mut().remove(&ticket.0);
            super::with_engine(&engine, |engine| engine.on_frame(ticket));
            glib::ControlFlow::Break
        });
        self.frames.borrow_mut().insert(ticket.0, callback_id);
        ticket
    }

    fn cancel_frame(&mut self, ticket: FrameTicket) {
        if let Some(callback_id) = self.frames.borrow_mut().remove(&ticket.0) {
            callback_id.remove();
        }
    }
}
