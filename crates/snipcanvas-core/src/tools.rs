//! Tool modes for the canvas.

use serde::{Deserialize, Serialize};

/// Available tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Dragging the background pans the camera; boxes can only be selected.
    #[default]
    Pan,
    /// Boxes can be moved and resized; clicking the background clears selection.
    Select,
}

impl ToolKind {
    /// Whether boxes can be dragged by their header or body in this mode.
    pub fn can_move_boxes(self) -> bool {
        self == ToolKind::Select
    }
}
