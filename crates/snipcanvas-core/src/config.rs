//! Tunable canvas constants.

use crate::error::{CanvasError, CanvasResult};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Constants governing camera bounds, fit framing and placement.
///
/// Every field has a default, so a config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lowest scale reachable by toolbar and wheel zoom.
    pub min_scale: f64,
    /// Highest scale reachable by toolbar and wheel zoom.
    pub max_scale: f64,
    /// Multiplier applied per zoom-in step (divided on zoom-out).
    pub zoom_step: f64,
    /// Padding kept around content by fit-to-content, in screen pixels.
    pub fit_padding: f64,
    /// Content smaller than this is treated as this size when fitting.
    pub fit_min_extent: Size,
    /// Lowest scale fit-to-content will choose.
    pub fit_min_scale: f64,
    /// Highest scale fit-to-content will choose.
    pub fit_max_scale: f64,
    /// Extent of the nominal world canvas centered on init and reset.
    pub nominal_world: Size,
    /// Size of boxes created by pin or drop.
    pub default_box_size: Size,
    /// World location used when a snippet is pinned without coordinates.
    pub pin_location: Point,
    /// Maximum jitter applied around `pin_location` on each axis.
    pub pin_jitter: f64,
    /// Offset applied to duplicated boxes.
    pub duplicate_offset: Vec2,
    /// Screen distance a body press must travel before it becomes a move.
    pub drag_threshold: f64,
    /// Simulated latency of document extraction.
    pub document_latency_ms: u64,
    /// Simulated latency of assistant replies.
    pub assistant_latency_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 3.0,
            zoom_step: 1.15,
            fit_padding: 60.0,
            fit_min_extent: Size::new(300.0, 200.0),
            fit_min_scale: 0.2,
            fit_max_scale: 2.5,
            nominal_world: Size::new(8000.0, 8000.0),
            default_box_size: Size::new(260.0, 140.0),
            pin_location: Point::new(4000.0, 4000.0),
            pin_jitter: 40.0,
            duplicate_offset: Vec2::new(24.0, 24.0),
            drag_threshold: 3.0,
            document_latency_ms: 700,
            assistant_latency_ms: 550,
        }
    }
}

impl CanvasConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set both simulated latencies to zero (used by tests and scripted runs).
    pub fn without_latency(mut self) -> Self {
        self.document_latency_ms = 0;
        self.assistant_latency_ms = 0;
        self
    }

    /// Check the relationships between fields.
    pub fn validate(&self) -> CanvasResult<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(CanvasError::Config(format!(
                "scale bounds [{}, {}] are not a positive range",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.fit_min_scale > 0.0 && self.fit_min_scale <= self.fit_max_scale) {
            return Err(CanvasError::Config(format!(
                "fit scale bounds [{}, {}] are not a positive range",
                self.fit_min_scale, self.fit_max_scale
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(CanvasError::Config(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.fit_min_extent.width <= 0.0 || self.fit_min_extent.height <= 0.0 {
            return Err(CanvasError::Config(
                "fit_min_extent must be non-empty".to_string(),
            ));
        }
        if self.pin_jitter < 0.0 || self.fit_padding < 0.0 || self.drag_threshold < 0.0 {
            return Err(CanvasError::Config(
                "pin_jitter, fit_padding and drag_threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
