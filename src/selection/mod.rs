//! Committed and in-progress selection sets for one grid.
//!
//! Only `live` changes while a drag is open; `committed` changes at commit
//! points (flush, enter, exit, toggle) and is what the view renders.

use crate::photo::{PhotoId, PhotoIdSet};

/// Render-visible selection state handed to the view at commit points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSnapshot {
    pub select_mode_active: bool,
    pub committed_ids: PhotoIdSet,
}

impl SelectionSnapshot {
    pub fn count(&self) -> usize {
        self.committed_ids.len()
    }
}

#[derive(Debug, Default)]
struct DragSets {
    base: PhotoIdSet,
    accumulated: PhotoIdSet,
}

#[derive(Debug, Default)]
pub struct SelectionStore {
    select_mode_active: bool,
    committed: PhotoIdSet,
    live: PhotoIdSet,
    drag: Option<DragSets>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_mode_active(&self) -> bool {
        self.select_mode_active
    }

    pub fn committed_ids(&self) -> &PhotoIdSet {
        &self.committed
    }

    pub fn live_ids(&self) -> &PhotoIdSet {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            select_mode_active: self.select_mode_active,
            committed_ids: self.committed.clone(),
        }
    }

    /// Activates selection mode with exactly `initial` selected, dropping any open drag.
    pub fn enter_select_mode(&mut self, initial: Option<PhotoId>) {
        self.select_mode_active = true;
        self.committed = initial.into_iter().collect();
        self.live = self.committed.clone();
        self.drag = None;
    }

    /// Clears everything. Returns false when the store was already idle and empty.
    pub fn exit_select_mode(&mut self) -> bool {
        let changed = self.select_mode_active
            || !self.committed.is_empty()
            || !self.live.is_empty()
            || self.drag.is_some();
        self.select_mode_active = false;
        self.committed.clear();
        self.live.clear();
        self.drag = None;
        changed
    }

    /// Flips membership of `id` in the committed set and returns whether it is now selected.
    ///
    /// Activates selection mode. While a drag is open the toggle also lands in
    /// the drag base so the eventual flush keeps it.
    pub fn toggle_one(&mut self, id: &PhotoId) -> bool {
        self.select_mode_active = true;
        let selected = if self.committed.remove(id) {
            false
        } else {
            self.committed.insert(id.clone());
            true
        };

        match self.drag.as_mut() {
            Some(drag) => {
                if selected {
                    drag.base.insert(id.clone());
                    self.live.insert(id.clone());
                } else {
                    drag.base.remove(id);
                    if !drag.accumulated.contains(id) {
                        self.live.remove(id);
                    }
                }
            }
            None => self.live = self.committed.clone(),
        }
        selected
    }

    /// Snapshots the committed set as the drag base.
    pub fn begin_drag(&mut self) {
        self.live = self.committed.clone();
        self.drag = Some(DragSets {
            base: self.committed.clone(),
            accumulated: PhotoIdSet::new(),
        });
    }

    /// Unions `range` into the live set and returns the ids that were not live before.
    ///
    /// Never removes anything; outside a drag this is a no-op.
    pub fn extend_live(&mut self, range: PhotoIdSet) -> Vec<PhotoId> {
        let Some(drag) = self.drag.as_mut() else {
            return Vec::new();
        };
        let mut added = Vec::new();
        for id in range {
            if self.live.insert(id.clone()) {
                added.push(id.clone());
            }
            drag.accumulated.insert(id);
        }
        added
    }

    /// Commits the live set. Returns false when no drag was open.
    pub fn flush(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.committed = self.live.clone();
        true
    }

    /// Ends the drag without committing; live falls back to committed.
    pub fn discard_drag(&mut self) {
        self.drag = None;
        self.live = self.committed.clone();
    }

    /// Ids that were selected when the current drag began.
    pub fn drag_base(&self) -> Option<&PhotoIdSet> {
        self.drag.as_ref().map(|drag| &drag.base)
    }
}
