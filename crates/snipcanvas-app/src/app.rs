//! Headless host: owns a session and replays host events against it.

use crate::error::AppResult;
use crate::script::HostEvent;
use kurbo::{Point, Size, Vec2};
use snipcanvas_core::{BoxId, CanvasConfig, ExportDocument, FileDescriptor, Services, Session};
use std::time::Duration;

/// Host configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width: f64,
    pub height: f64,
    pub canvas: CanvasConfig,
    /// Seed for pin jitter; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            canvas: CanvasConfig::default(),
            seed: None,
        }
    }
}

/// The host application.
pub struct App {
    session: Session,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let services = match config.seed {
            Some(seed) => Services::seeded(seed),
            None => Services::default(),
        };
        let mut session = Session::with_services(config.canvas, services);
        session.set_viewport(Point::ZERO, Size::new(config.width, config.height));
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replay every event in order.
    pub fn run(&mut self, events: &[HostEvent]) -> AppResult<()> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    fn target(&self, index: Option<usize>) -> Option<BoxId> {
        let id = match index {
            Some(i) => self.session.store().ids().get(i).copied(),
            None => self.session.selection().selected(),
        };
        if id.is_none() {
            log::warn!("No box at {:?}", index);
        }
        id
    }

    /// Apply a single host event.
    pub fn apply(&mut self, event: &HostEvent) -> AppResult<()> {
        log::trace!("{:?}", event);
        match event {
            HostEvent::Resize {
                x,
                y,
                width,
                height,
            } => self
                .session
                .set_viewport(Point::new(*x, *y), Size::new(*width, *height)),
            HostEvent::Tool { tool } => self.session.set_tool(*tool),
            HostEvent::Pointer { event } => self.session.handle_pointer(*event),
            HostEvent::Drop { payload, x, y } => {
                let raw = HostEvent::payload_text(payload);
                if self.session.drop_payload(&raw, Point::new(*x, *y)).is_none() {
                    log::info!("Drop ignored");
                }
            }
            HostEvent::Upload { name, size } => self
                .session
                .upload(FileDescriptor::new(name.clone(), *size)),
            HostEvent::ClearDocument => self.session.clear_document(),
            HostEvent::Pin { index } => {
                if self.session.pin_snippet(*index).is_none() {
                    log::warn!("No snippet {} to pin", index);
                }
            }
            HostEvent::Pan { dx, dy } => self.session.pan(Vec2::new(*dx, *dy)),
            HostEvent::ZoomIn => self.session.zoom_in(),
            HostEvent::ZoomOut => self.session.zoom_out(),
            HostEvent::Fit => self.session.fit_to_content(),
            HostEvent::Reset => self.session.reset_view(),
            HostEvent::Delete { index } => {
                if let Some(id) = self.target(*index) {
                    self.session.delete_box(id);
                }
            }
            HostEvent::Duplicate { index } => {
                if let Some(id) = self.target(*index) {
                    self.session.duplicate_box(id);
                }
            }
            HostEvent::Edit { index, text } => {
                if let Some(id) = self.target(*index) {
                    self.session.commit_edit(id, text.clone());
                }
            }
            HostEvent::Chat { text } => {
                self.session.send_chat(text);
            }
            HostEvent::Wait { timeout_ms } => {
                self.session.wait_idle(Duration::from_millis(*timeout_ms));
            }
            HostEvent::Export { path } => self.session.export().write_to(path)?,
        }
        self.session.poll_completions();
        Ok(())
    }

    /// Let background requests settle and build the final export.
    pub fn finish(&mut self, timeout: Duration) -> ExportDocument {
        self.session.wait_idle(timeout);
        self.session.export()
    }
}
