//! Interaction controller: turns pointer sequences into pan, move and resize
//! gestures.
//!
//! The gesture in progress is an explicit value. A press records the anchor
//! screen point and the origin value of whatever is being dragged; each move
//! recomputes the target from `origin + delta`, so every intermediate frame is
//! already the live state and a release only returns to idle.

use crate::camera::CameraController;
use crate::info_box::{BoxId, BoxRegion};
use crate::input::{InputState, MouseButton, PointerEvent};
use crate::selection::Selection;
use crate::store::ObjectStore;
use crate::tools::ToolKind;
use kurbo::{Point, Size, Vec2};

/// The gesture currently capturing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No button held.
    #[default]
    Idle,
    /// Dragging the background to move the camera.
    Panning {
        anchor: Point,
        origin: Vec2,
        moved: bool,
    },
    /// Body pressed in select mode; becomes `Moving` past the drag threshold.
    Pressing { id: BoxId, anchor: Point, origin: Point },
    /// Dragging a box by its header or body.
    Moving { id: BoxId, anchor: Point, origin: Point },
    /// Dragging a box's resize handle.
    Resizing { id: BoxId, anchor: Point, origin: Size },
}

/// Mutable canvas state the controller operates on.
pub struct CanvasContext<'a> {
    pub store: &'a mut ObjectStore,
    pub camera: &'a mut CameraController,
    pub selection: &'a mut Selection,
    pub tool: ToolKind,
    /// Screen distance a body press must travel before it starts a move.
    pub drag_threshold: f64,
    /// Zoom multiplier per wheel notch.
    pub zoom_step: f64,
}

/// Interprets pointer events against the canvas.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
    input: InputState,
}

impl InteractionController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// The gesture in progress.
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Check if a gesture is capturing the pointer.
    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Dispatch a pointer event.
    pub fn handle(&mut self, ctx: &mut CanvasContext<'_>, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                time_ms,
            } => self.pointer_down(ctx, position, button, time_ms),
            PointerEvent::Move { position } => self.pointer_move(ctx, position),
            PointerEvent::Up { position, button } => self.pointer_up(ctx, position, button),
            PointerEvent::Cancel => self.cancel(),
            PointerEvent::Wheel { position, delta } => self.wheel(ctx, position, delta),
        }
    }

    /// Begin a gesture according to what was pressed and the active tool.
    ///
    /// `time_ms` is the host timestamp of the press.
    pub fn pointer_down(
        &mut self,
        ctx: &mut CanvasContext<'_>,
        position: Point,
        button: MouseButton,
        time_ms: u64,
    ) {
        if button != MouseButton::Left {
            return;
        }
        if self.is_active() {
            // Single pointer: a stray press while captured is ignored.
            log::debug!("Ignoring press during {:?}", self.gesture);
            return;
        }

        let is_double_click = self.input.press_at(position, time_ms);
        let world = ctx.camera.screen_to_world(position);
        let hit = ctx.store.hit_test(world);

        if is_double_click {
            if let Some((id, _)) = hit {
                ctx.selection.select(id);
                let editing = ctx.selection.toggle_editing(id);
                log::debug!("Box {} edit mode: {}", id, editing);
                return;
            }
        }

        let can_move = ctx.tool.can_move_boxes();
        self.gesture = match hit {
            Some((id, BoxRegion::ResizeHandle)) => {
                Self::grab(ctx, id);
                match ctx.store.get(id) {
                    Some(b) => Gesture::Resizing {
                        id,
                        anchor: position,
                        origin: b.size(),
                    },
                    None => Gesture::Idle,
                }
            }
            Some((id, BoxRegion::Header)) if can_move => {
                Self::grab(ctx, id);
                match ctx.store.get(id) {
                    Some(b) => Gesture::Moving {
                        id,
                        anchor: position,
                        origin: b.position(),
                    },
                    None => Gesture::Idle,
                }
            }
            Some((id, BoxRegion::Body)) if can_move => {
                ctx.selection.select(id);
                match ctx.store.get(id) {
                    Some(b) => Gesture::Pressing {
                        id,
                        anchor: position,
                        origin: b.position(),
                    },
                    None => Gesture::Idle,
                }
            }
            Some((id, _)) => {
                ctx.selection.select(id);
                Gesture::Idle
            }
            None => match ctx.tool {
                ToolKind::Pan => Gesture::Panning {
                    anchor: position,
                    origin: ctx.camera.camera().offset,
                    moved: false,
                },
                ToolKind::Select => {
                    ctx.selection.clear();
                    Gesture::Idle
                }
            },
        };

        if self.is_active() {
            log::debug!("Gesture started: {:?}", self.gesture);
        }
    }

    /// Select a box and raise it so it is never occluded while dragged.
    fn grab(ctx: &mut CanvasContext<'_>, id: BoxId) {
        ctx.selection.select(id);
        ctx.store.bring_to_front(id);
    }

    /// Advance the active gesture to a new pointer position.
    pub fn pointer_move(&mut self, ctx: &mut CanvasContext<'_>, position: Point) {
        let scale = ctx.camera.scale();

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { anchor, origin, moved } => {
                let delta = position - *anchor;
                if delta != Vec2::ZERO {
                    *moved = true;
                }
                ctx.camera.set_offset(*origin + delta);
            }
            Gesture::Pressing { id, anchor, origin } => {
                let screen_delta = position - *anchor;
                if screen_delta.hypot() < ctx.drag_threshold {
                    return;
                }
                let (id, anchor, origin) = (*id, *anchor, *origin);
                ctx.store.bring_to_front(id);
                let target = origin + screen_delta / scale;
                ctx.store.move_to(id, target.x, target.y);
                self.gesture = Gesture::Moving { id, anchor, origin };
            }
            Gesture::Moving { id, anchor, origin } => {
                let target = *origin + (position - *anchor) / scale;
                ctx.store.move_to(*id, target.x, target.y);
            }
            Gesture::Resizing { id, anchor, origin } => {
                let delta = (position - *anchor) / scale;
                ctx.store
                    .resize(*id, origin.width + delta.x, origin.height + delta.y);
            }
        }
    }

    /// End the active gesture.
    pub fn pointer_up(
        &mut self,
        ctx: &mut CanvasContext<'_>,
        _position: Point,
        button: MouseButton,
    ) {
        if button != MouseButton::Left {
            return;
        }
        if let Gesture::Panning { moved: false, .. } = self.gesture {
            // A press-release without travel is a background click.
            ctx.selection.clear();
        }
        if self.is_active() {
            log::debug!("Gesture ended: {:?}", self.gesture);
        }
        self.gesture = Gesture::Idle;
    }

    /// Drop the active gesture after pointer capture is lost.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Zoom about the pointer, one step per wheel event.
    pub fn wheel(&mut self, ctx: &mut CanvasContext<'_>, position: Point, delta: Vec2) {
        if delta.y == 0.0 {
            return;
        }
        let anchor = position - ctx.camera.viewport_origin().to_vec2();
        let factor = if delta.y < 0.0 {
            ctx.zoom_step
        } else {
            1.0 / ctx.zoom_step
        };
        ctx.camera.zoom_at(anchor, factor);
    }
}
