//! Pure screen/world transform math.
//!
//! All functions here are deterministic and side-effect free. Screen points
//! are in the coordinate space of the host surface; `viewport_origin` is the
//! screen position of the viewport's top-left corner, which the camera offset
//! is relative to.

use crate::camera::Camera;
use crate::info_box::InfoBox;
use kurbo::{Point, Rect, Size, Vec2};

/// Convert a screen point to world coordinates.
pub fn screen_to_world(camera: &Camera, viewport_origin: Point, screen: Point) -> Point {
    camera.inverse_transform() * (screen - viewport_origin.to_vec2())
}

/// Convert a world point to screen coordinates.
pub fn world_to_screen(camera: &Camera, viewport_origin: Point, world: Point) -> Point {
    camera.transform() * world + viewport_origin.to_vec2()
}

/// Rescale the camera so the world point under `anchor` stays under it.
///
/// `anchor` is relative to the viewport's top-left corner.
pub fn zoom_about(camera: &Camera, anchor: Point, new_scale: f64) -> Camera {
    let world_at_anchor = Point::new(
        (anchor.x - camera.offset.x) / camera.scale,
        (anchor.y - camera.offset.y) / camera.scale,
    );
    Camera {
        offset: Vec2::new(
            anchor.x - world_at_anchor.x * new_scale,
            anchor.y - world_at_anchor.y * new_scale,
        ),
        scale: new_scale,
        initialized: camera.initialized,
    }
}

/// Union of the bounds of `items`.
///
/// Returns a zero-sized rect at the origin when `items` is empty; callers
/// fitting to content must handle the empty case before dividing by it.
pub fn bounding_box_of<'a>(items: impl IntoIterator<Item = &'a InfoBox>) -> Rect {
    items
        .into_iter()
        .map(InfoBox::bounds)
        .reduce(|acc, bounds| acc.union(bounds))
        .unwrap_or(Rect::ZERO)
}

/// Scale at which `content` fits inside `viewport` with `padding` on every side.
///
/// Content smaller than `min_extent` is treated as `min_extent`, so a single
/// small box does not zoom in without limit.
pub fn fit_scale(
    content: Rect,
    viewport: Size,
    padding: f64,
    min_extent: Size,
    min_scale: f64,
    max_scale: f64,
) -> f64 {
    let content_w = content.width().max(min_extent.width);
    let content_h = content.height().max(min_extent.height);
    let available_w = (viewport.width - padding * 2.0).max(1.0);
    let available_h = (viewport.height - padding * 2.0).max(1.0);
    let scale_x = available_w / content_w;
    let scale_y = available_h / content_h;
    scale_x.min(scale_y).clamp(min_scale, max_scale)
}
