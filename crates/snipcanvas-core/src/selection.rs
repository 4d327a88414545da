//! Selection and inline-edit state.
//!
//! Boxes remain pure data in the store; this tracks which one is selected
//! and which one, if any, shows its text editor.

use crate::info_box::BoxId;

/// Tracks the single selected box and the box in edit mode.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<BoxId>,
    editing: Option<BoxId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected box id, if any.
    pub fn selected(&self) -> Option<BoxId> {
        self.selected
    }

    /// Box currently in edit mode, if any.
    pub fn editing(&self) -> Option<BoxId> {
        self.editing
    }

    /// Check if a box is selected.
    pub fn is_selected(&self, id: BoxId) -> bool {
        self.selected == Some(id)
    }

    /// Check if a box is being edited.
    pub fn is_editing(&self, id: BoxId) -> bool {
        self.editing == Some(id)
    }

    /// Select a single box, replacing any previous selection.
    pub fn select(&mut self, id: BoxId) {
        self.selected = Some(id);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Toggle edit mode for a box. Only one box edits at a time.
    ///
    /// Returns whether the box is in edit mode afterwards.
    pub fn toggle_editing(&mut self, id: BoxId) -> bool {
        if self.editing == Some(id) {
            self.editing = None;
            false
        } else {
            self.editing = Some(id);
            true
        }
    }

    /// Leave edit mode for a box, if it is the one being edited.
    pub fn exit_editing(&mut self, id: BoxId) {
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    /// Forget a deleted box.
    pub fn remove(&mut self, id: BoxId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.exit_editing(id);
    }
}
