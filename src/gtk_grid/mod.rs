//! GTK4 host for the gesture engine: a `ScrolledWindow` whose tiles carry
//! their photo id in the widget name.

mod scheduler;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use gtk4::prelude::*;
use gtk4::ScrolledWindow;

use crate::config::GestureConfig;
use crate::geometry::{PointerId, PointerPoint, Viewport};
use crate::gesture::{GestureEngine, GestureOutcome, GridSurface};
use crate::photo::PhotoId;
use crate::selection::SelectionSnapshot;

pub use scheduler::GtkScheduler;

pub type GtkGestureEngine = GestureEngine<GtkGridSurface, GtkScheduler>;

pub const TILE_NAME_PREFIX: &str = "photo:";
pub const SELECTED_CSS_CLASS: &str = "selected";
pub const DRAG_MARKER_CSS_CLASS: &str = "drag-selected";

type CommitHandler = Box<dyn Fn(&SelectionSnapshot)>;
type LiveCountHandler = Box<dyn Fn(usize)>;

pub fn tile_widget_name(id: &PhotoId) -> String {
    format!("{TILE_NAME_PREFIX}{id}")
}

pub fn photo_id_from_widget_name(name: &str) -> Option<PhotoId> {
    name.strip_prefix(TILE_NAME_PREFIX)
        .filter(|id| !id.is_empty())
        .map(PhotoId::from)
}

pub struct GtkGridSurface {
    scroller: ScrolledWindow,
    tiles: HashMap<PhotoId, gtk4::Widget>,
    marked: HashSet<PhotoId>,
    on_commit: Option<CommitHandler>,
    on_live_count: Option<LiveCountHandler>,
}

impl GtkGridSurface {
    pub fn new(scroller: &ScrolledWindow) -> Self {
        Self {
            scroller: scroller.clone(),
            tiles: HashMap::new(),
            marked: HashSet::new(),
            on_commit: None,
            on_live_count: None,
        }
    }

    /// Tags `tile` with the photo marker used by hit testing.
    pub fn register_tile(&mut self, id: &PhotoId, tile: &impl IsA<gtk4::Widget>) {
        tile.set_widget_name(&tile_widget_name(id));
        self.tiles.insert(id.clone(), tile.clone().upcast());
    }

    pub fn unregister_tile(&mut self, id: &PhotoId) {
        if let Some(tile) = self.tiles.remove(id) {
            tile.remove_css_class(DRAG_MARKER_CSS_CLASS);
            tile.remove_css_class(SELECTED_CSS_CLASS);
        }
        self.marked.remove(id);
    }

    /// Called after every commit with the new selection. Runs while the
    /// engine is borrowed; it must not call back into the engine.
    pub fn connect_selection_committed(&mut self, handler: impl Fn(&SelectionSnapshot) + 'static) {
        self.on_commit = Some(Box::new(handler));
    }

    pub fn connect_live_count_changed(&mut self, handler: impl Fn(usize) + 'static) {
        self.on_live_count = Some(Box::new(handler));
    }
}

impl GridSurface for GtkGridSurface {
    fn hit_test(&self, point: PointerPoint) -> Option<PhotoId> {
        let mut widget = self
            .scroller
            .pick(point.x, point.y, gtk4::PickFlags::DEFAULT)?;
        loop {
            if let Some(id) = photo_id_from_widget_name(widget.widget_name().as_str()) {
                return Some(id);
            }
            if widget == *self.scroller.upcast_ref::<gtk4::Widget>() {
                return None;
            }
            widget = widget.parent()?;
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(0.0, f64::from(self.scroller.height()))
    }

    fn scroll_by(&mut self, delta_y: f64) -> f64 {
        let adjustment = self.scroller.vadjustment();
        let before = adjustment.value();
        let max = (adjustment.upper() - adjustment.page_size()).max(adjustment.lower());
        adjustment.set_value((before + delta_y).clamp(adjustment.lower(), max));
        adjustment.value() - before
    }

    fn set_tile_marker(&mut self, id: &PhotoId, marked: bool) {
        let Some(tile) = self.tiles.get(id) else {
            return;
        };
        if marked {
            tile.add_css_class(DRAG_MARKER_CSS_CLASS);
            self.marked.insert(id.clone());
        } else {
            tile.remove_css_class(DRAG_MARKER_CSS_CLASS);
            self.marked.remove(id);
        }
    }

    fn clear_tile_markers(&mut self) {
        for id in self.marked.drain() {
            if let Some(tile) = self.tiles.get(&id) {
                tile.remove_css_class(DRAG_MARKER_CSS_CLASS);
            }
        }
    }

    fn selection_committed(&mut self, selection: &SelectionSnapshot) {
        for (id, tile) in &self.tiles {
            if selection.committed_ids.contains(id) {
                tile.add_css_class(SELECTED_CSS_CLASS);
            } else {
                tile.remove_css_class(SELECTED_CSS_CLASS);
            }
        }
        if let Some(handler) = self.on_commit.as_ref() {
            handler(selection);
        }
    }

    fn live_count_changed(&mut self, count: usize) {
        if let Some(handler) = self.on_live_count.as_ref() {
            handler(count);
        }
    }
}

pub(crate) fn with_engine<R>(
    engine: &Weak<RefCell<GtkGestureEngine>>,
    f: impl FnOnce(&mut GtkGestureEngine) -> R,
) -> Option<R> {
    let shared = engine.upgrade()?;
    let Ok(mut engine) = shared.try_borrow_mut() else {
        tracing::warn!("gesture engine busy; dropping re-entrant callback");
        return None;
    };
    Some(f(&mut engine))
}

/// Builds an engine for `surface` and wires a primary-button drag gesture on
/// `scroller` to it. `on_activate` receives plain taps outside selection mode.
pub fn attach(
    scroller: &ScrolledWindow,
    config: GestureConfig,
    surface: GtkGridSurface,
    on_activate: impl Fn(&PhotoId) + 'static,
) -> Rc<RefCell<GtkGestureEngine>> {
    let engine = Rc::new_cyclic(|weak: &Weak<RefCell<GtkGestureEngine>>| {
        let scheduler = GtkScheduler::new(scroller.clone().upcast(), weak.clone());
        RefCell::new(GestureEngine::new(config, surface, scheduler))
    });

    let drag = gtk4::GestureDrag::new();
    drag.set_button(gtk4::gdk::BUTTON_PRIMARY);

    let begin_engine = Rc::downgrade(&engine);
    drag.connect_drag_begin(move |gesture, start_x, start_y| {
        let outcome = with_engine(&begin_engine, |engine| {
            engine.on_pointer_down(PointerId::PRIMARY, PointerPoint::new(start_x, start_y))
        });
        match outcome {
            Some(GestureOutcome::Tracking) => {
                gesture.set_state(gtk4::EventSequenceState::Claimed);
            }
            _ => {
                gesture.set_state(gtk4::EventSequenceState::Denied);
            }
        }
    });

    let update_engine = Rc::downgrade(&engine);
    drag.connect_drag_update(move |gesture, offset_x, offset_y| {
        let Some((start_x, start_y)) = gesture.start_point() else {
            return;
        };
        let point = PointerPoint::new(start_x + offset_x, start_y + offset_y);
        with_engine(&update_engine, |engine| {
            engine.on_pointer_move(PointerId::PRIMARY, point)
        });
    });

    let end_engine = Rc::downgrade(&engine);
    drag.connect_drag_end(move |gesture, offset_x, offset_y| {
        let (start_x, start_y) = gesture.start_point().unwrap_or_default();
        let point = PointerPoint::new(start_x + offset_x, start_y + offset_y);
        let outcome = with_engine(&end_engine, |engine| {
            engine.on_pointer_up(PointerId::PRIMARY, point)
        });
        match outcome {
            Some(GestureOutcome::Activated(id)) => on_activate(&id),
            Some(outcome) => tracing::debug!(?outcome, "drag gesture ended"),
            None => {}
        }
    });

    let cancel_engine = Rc::downgrade(&engine);
    drag.connect_cancel(move |_, _| {
        with_engine(&cancel_engine, |engine| {
            engine.on_pointer_cancel(PointerId::PRIMARY)
        });
    });

    scroller.add_controller(drag);

    let teardown_engine = Rc::downgrade(&engine);
    scroller.connect_unrealize(move |_| {
        with_engine(&teardown_engine, GtkGestureEngine::teardown);
    });

    engine
}
