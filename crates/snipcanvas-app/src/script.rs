//! Event scripts: a JSON array of host events replayed against a session.
//!
//! ```json
//! [
//!   {"action": "upload", "name": "paper.pdf", "size": 2048},
//!   {"action": "wait"},
//!   {"action": "pin", "index": 0},
//!   {"action": "tool", "tool": "select"},
//!   {"action": "pointer", "event": {
//!     "kind": "down", "position": {"x": 520, "y": 410}, "button": "left", "time_ms": 1500
//!   }},
//!   {"action": "fit"}
//! ]
//! ```

use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use snipcanvas_core::{PointerEvent, ToolKind};
use std::path::PathBuf;

fn default_wait_ms() -> u64 {
    5_000
}

/// One step of a host script.
///
/// Box actions address boxes by z-order index (0 is the bottom); without an
/// index they apply to the selected box. Pointer presses without a `time_ms`
/// are stamped 0, so two untimed presses on the same spot make a double-click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HostEvent {
    /// Re-measure the viewport.
    Resize {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        width: f64,
        height: f64,
    },
    Tool {
        tool: ToolKind,
    },
    Pointer {
        event: PointerEvent,
    },
    /// Drop a payload at a screen point. A JSON string payload is used raw.
    Drop {
        payload: serde_json::Value,
        x: f64,
        y: f64,
    },
    Upload {
        name: String,
        #[serde(default)]
        size: u64,
    },
    ClearDocument,
    Pin {
        index: usize,
    },
    /// Pan the camera by a screen-space delta.
    Pan {
        dx: f64,
        dy: f64,
    },
    ZoomIn,
    ZoomOut,
    Fit,
    Reset,
    Delete {
        #[serde(default)]
        index: Option<usize>,
    },
    Duplicate {
        #[serde(default)]
        index: Option<usize>,
    },
    /// Replace a box's text and leave edit mode.
    Edit {
        #[serde(default)]
        index: Option<usize>,
        text: String,
    },
    Chat {
        text: String,
    },
    /// Block until background requests complete.
    Wait {
        #[serde(default = "default_wait_ms")]
        timeout_ms: u64,
    },
    /// Write an export file at this point of the script.
    Export {
        path: PathBuf,
    },
}

impl HostEvent {
    /// Raw drop payload text.
    pub fn payload_text(payload: &serde_json::Value) -> String {
        match payload {
            serde_json::Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}

/// Parse a script.
pub fn parse(json: &str) -> AppResult<Vec<HostEvent>> {
    Ok(serde_json::from_str(json)?)
}
