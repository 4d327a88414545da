//! Camera module for pan/zoom transforms.

use crate::config::CanvasConfig;
use crate::geometry::{self, screen_to_world, world_to_screen};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera maps world coordinates to viewport coordinates:
/// `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the world origin.
    pub offset: Vec2,
    /// Uniform zoom factor.
    pub scale: f64,
    /// Set once the first viewport measurement has centered the camera.
    pub initialized: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            initialized: false,
        }
    }
}

impl Camera {
    /// Create a new, uninitialized camera at scale 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to viewport coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }
}

/// Owns the camera and the viewport it projects into.
///
/// Operations that need the viewport size are no-ops until a nonzero
/// size has been measured.
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    /// Measured viewport size in screen pixels.
    viewport: Size,
    /// Screen position of the viewport's top-left corner.
    origin: Point,
    config: CanvasConfig,
}

impl CameraController {
    /// Create a controller with an unmeasured viewport.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            camera: Camera::new(),
            viewport: Size::ZERO,
            origin: Point::ZERO,
            config,
        }
    }

    /// Current camera state.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current scale.
    pub fn scale(&self) -> f64 {
        self.camera.scale
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Screen position of the viewport's top-left corner.
    pub fn viewport_origin(&self) -> Point {
        self.origin
    }

    /// Whether the viewport has a usable size.
    pub fn is_ready(&self) -> bool {
        self.viewport.width > 0.0 && self.viewport.height > 0.0
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    /// Record a viewport measurement.
    ///
    /// The first nonzero measurement centers the nominal world; later ones
    /// leave the camera where it is.
    pub fn set_viewport(&mut self, origin: Point, size: Size) {
        self.origin = origin;
        self.viewport = size;
        if self.is_ready() && !self.camera.initialized {
            self.camera.offset = self.centered_world_offset();
            self.camera.scale = 1.0;
            self.camera.initialized = true;
            log::debug!(
                "Camera initialized for {}x{} viewport, offset {:?}",
                size.width,
                size.height,
                self.camera.offset
            );
        }
    }

    fn centered_world_offset(&self) -> Vec2 {
        Vec2::new(
            self.viewport.width / 2.0 - self.config.nominal_world.width / 2.0,
            self.viewport.height / 2.0 - self.config.nominal_world.height / 2.0,
        )
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        screen_to_world(&self.camera, self.origin, screen_point)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        world_to_screen(&self.camera, self.origin, world_point)
    }

    /// Pan the camera by a delta in screen coordinates. Unbounded.
    pub fn pan(&mut self, delta: Vec2) {
        self.camera.offset += delta;
    }

    /// Place the world origin at an absolute screen offset.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.camera.offset = offset;
    }

    /// Zoom by `factor`, keeping the world point under `anchor` fixed.
    ///
    /// `anchor` is relative to the viewport's top-left corner.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !self.is_ready() {
            return;
        }
        let new_scale =
            (self.camera.scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        if (new_scale - self.camera.scale).abs() < f64::EPSILON {
            return;
        }
        self.camera = geometry::zoom_about(&self.camera, anchor, new_scale);
    }

    /// Zoom in one step about the viewport center.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.viewport_center(), self.config.zoom_step);
    }

    /// Zoom out one step about the viewport center.
    pub fn zoom_out(&mut self) {
        self.zoom_at(self.viewport_center(), 1.0 / self.config.zoom_step);
    }

    /// Reset to scale 1 with the nominal world centered.
    pub fn reset(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.camera.scale = 1.0;
        self.camera.offset = self.centered_world_offset();
    }

    /// Frame the given content bounds, or reset when there is no content.
    pub fn fit_to_content(&mut self, content: Option<Rect>) {
        if !self.is_ready() {
            return;
        }
        let Some(bounds) = content else {
            self.reset();
            return;
        };

        let scale = geometry::fit_scale(
            bounds,
            self.viewport,
            self.config.fit_padding,
            self.config.fit_min_extent,
            self.config.fit_min_scale,
            self.config.fit_max_scale,
        );

        let content_center = bounds.center();
        let viewport_center = self.viewport_center();
        self.camera.scale = scale;
        self.camera.offset = Vec2::new(
            viewport_center.x - content_center.x * scale,
            viewport_center.y - content_center.y * scale,
        );
    }
}
