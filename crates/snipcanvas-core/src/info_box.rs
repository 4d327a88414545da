//! Info box: a text artifact placed on the canvas.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an info box.
pub type BoxId = Uuid;

/// Smallest allowed box width in world units.
pub const MIN_WIDTH: f64 = 140.0;
/// Largest allowed box width in world units.
pub const MAX_WIDTH: f64 = 1200.0;
/// Smallest allowed box height in world units.
pub const MIN_HEIGHT: f64 = 80.0;
/// Largest allowed box height in world units.
pub const MAX_HEIGHT: f64 = 1000.0;

/// Height of the draggable header strip in world units.
pub const HEADER_HEIGHT: f64 = 32.0;
/// Side of the square resize handle in the bottom-right corner, in world units.
pub const RESIZE_HANDLE_SIZE: f64 = 16.0;

/// Clamp a requested size into the allowed box bounds.
pub fn clamp_size(width: f64, height: f64) -> Size {
    Size::new(
        width.clamp(MIN_WIDTH, MAX_WIDTH),
        height.clamp(MIN_HEIGHT, MAX_HEIGHT),
    )
}

/// Part of a box that received a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxRegion {
    /// Title strip along the top edge.
    Header,
    /// Text area below the header.
    Body,
    /// Bottom-right resize grip.
    ResizeHandle,
}

/// A text box in world space, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoBox {
    pub id: BoxId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl InfoBox {
    /// Create a box with a fresh id. The size is clamped into bounds.
    pub fn new(text: impl Into<String>, position: Point, size: Size) -> Self {
        let size = clamp_size(size.width, size.height);
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            x: position.x,
            y: position.y,
            w: size.width,
            h: size.height,
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// World-space bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    /// Copy of this box under a new id, shifted by `offset`.
    pub fn duplicated(&self, offset: Vec2) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: self.text.clone(),
            x: self.x + offset.x,
            y: self.y + offset.y,
            w: self.w,
            h: self.h,
        }
    }

    /// Find which region of the box contains a world point, if any.
    ///
    /// The resize handle wins over the header and body since it sits on top.
    pub fn hit_region(&self, point: Point) -> Option<BoxRegion> {
        let bounds = self.bounds();
        if !bounds.contains(point) {
            return None;
        }
        let handle = Rect::new(
            bounds.x1 - RESIZE_HANDLE_SIZE,
            bounds.y1 - RESIZE_HANDLE_SIZE,
            bounds.x1,
            bounds.y1,
        );
        if handle.contains(point) {
            Some(BoxRegion::ResizeHandle)
        } else if point.y < bounds.y0 + HEADER_HEIGHT {
            Some(BoxRegion::Header)
        } else {
            Some(BoxRegion::Body)
        }
    }
}
