//! Pointer input vocabulary and click tracking.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event delivered by the host, positions in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        /// Host timestamp in milliseconds, used for double-click detection.
        #[serde(default)]
        time_ms: u64,
    },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
    /// Pointer capture was lost (window blur, element removed, ...).
    Cancel,
    /// Wheel scroll; positive `delta.y` scrolls toward the user.
    Wheel { position: Point, delta: Vec2 },
}

/// Double-click detection constants.
const DOUBLE_CLICK_MS: u64 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks primary-button presses to detect double-clicks.
///
/// Time comes from the events themselves, so replaying the same sequence
/// always gives the same result.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    last_click: Option<(u64, Point)>,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary-button press at `time_ms`. Returns true if it
    /// completes a double-click.
    pub fn press_at(&mut self, position: Point, time_ms: u64) -> bool {
        let is_double = match self.last_click {
            Some((time, pos)) => {
                time_ms
                    .checked_sub(time)
                    .is_some_and(|elapsed| elapsed < DOUBLE_CLICK_MS)
                    && (position - pos).hypot() < DOUBLE_CLICK_DISTANCE
            }
            None => false,
        };

        // A completed double-click does not start another one.
        self.last_click = if is_double { None } else { Some((time_ms, position)) };
        is_double
    }
}
