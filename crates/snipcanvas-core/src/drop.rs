//! Drag-and-drop payloads and snippet placement.

use crate::camera::CameraController;
use crate::config::CanvasConfig;
use crate::random::RandomSource;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Structured payload carried by a drag operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DropPayload {
    /// Request to place a document snippet on the canvas.
    Snippet { id: String, text: String },
}

impl DropPayload {
    /// Parse a raw drag payload.
    ///
    /// Malformed JSON and unrecognized tags are not errors: the drop simply
    /// has no effect.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(payload) => Some(payload),
            Err(err) => {
                log::debug!("Ignoring drop payload: {}", err);
                None
            }
        }
    }

    /// Text to place on the canvas.
    pub fn text(&self) -> &str {
        match self {
            DropPayload::Snippet { text, .. } => text,
        }
    }
}

/// World position for a box dropped at a screen point.
///
/// The box's top-left corner lands under the cursor.
pub fn drop_position(camera: &CameraController, screen: Point) -> Point {
    camera.screen_to_world(screen)
}

/// World position for a pinned snippet: the nominal location plus a uniform
/// jitter of up to `pin_jitter` on each axis.
pub fn pin_position(config: &CanvasConfig, random: &mut dyn RandomSource) -> Point {
    let mut jitter = || (random.next_f64() * 2.0 - 1.0) * config.pin_jitter;
    let dx = jitter();
    let dy = jitter();
    Point::new(config.pin_location.x + dx, config.pin_location.y + dy)
}
