//! Top-level canvas session.
//!
//! A `Session` singly owns the camera, the object store and the selection,
//! and is the only place they are mutated. Pointer gestures, drops, toolbar
//! actions, document uploads and chat all go through it.

use crate::camera::CameraController;
use crate::config::CanvasConfig;
use crate::drop::{drop_position, pin_position, DropPayload};
use crate::export::ExportDocument;
use crate::info_box::{BoxId, InfoBox};
use crate::input::PointerEvent;
use crate::interaction::{CanvasContext, Gesture, InteractionController};
use crate::random::{RandomSource, SeededRandom};
use crate::selection::Selection;
use crate::services::{
    AssistantService, CannedAssistant, ChatMessage, ChatRole, Document, DocumentRef, DocumentSource,
    FileDescriptor, MockDocumentSource, GREETING,
};
use crate::store::{CanvasSnapshot, ObjectStore};
use crate::tasks::{Completion, Dispatcher};
use crate::tools::ToolKind;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Collaborators a session depends on.
pub struct Services {
    pub documents: Arc<dyn DocumentSource>,
    pub assistant: Arc<dyn AssistantService>,
    pub random: Box<dyn RandomSource>,
}

impl Services {
    /// Bundled stand-ins with a reproducible random source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            random: Box::new(SeededRandom::new(seed)),
            ..Self::default()
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self {
            documents: Arc::new(MockDocumentSource::new()),
            assistant: Arc::new(CannedAssistant::new()),
            random: Box::new(SeededRandom::from_entropy()),
        }
    }
}

/// Document processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    #[default]
    Idle,
    Processing,
    Ready,
}

/// An infinite-canvas editing session.
pub struct Session {
    config: CanvasConfig,
    store: ObjectStore,
    camera: CameraController,
    selection: Selection,
    tool: ToolKind,
    interaction: InteractionController,
    document: Option<Document>,
    processing: ProcessingState,
    /// Advanced by every upload and clear; older extraction results are stale.
    epoch: u64,
    messages: Vec<ChatMessage>,
    services: Services,
    dispatcher: Dispatcher,
}

impl Session {
    /// Create a session using the bundled collaborators.
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_services(config, Services::default())
    }

    /// Create a session with explicit collaborators.
    pub fn with_services(config: CanvasConfig, services: Services) -> Self {
        Self {
            camera: CameraController::new(config.clone()),
            config,
            store: ObjectStore::new(),
            selection: Selection::new(),
            tool: ToolKind::default(),
            interaction: InteractionController::new(),
            document: None,
            processing: ProcessingState::Idle,
            epoch: 0,
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            services,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> Gesture {
        self.interaction.gesture()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn processing(&self) -> ProcessingState {
        self.processing
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    // --- Viewport and tools ---

    /// Record the viewport's screen origin and size.
    pub fn set_viewport(&mut self, origin: Point, size: Size) {
        self.camera.set_viewport(origin, size);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
    }

    /// Feed a pointer event to the interaction controller.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let mut ctx = CanvasContext {
            store: &mut self.store,
            camera: &mut self.camera,
            selection: &mut self.selection,
            tool: self.tool,
            drag_threshold: self.config.drag_threshold,
            zoom_step: self.config.zoom_step,
        };
        self.interaction.handle(&mut ctx, event);
    }

    // --- Placement ---

    /// Handle a drop at a screen point.
    ///
    /// A recognized payload becomes a box whose top-left corner is under the
    /// cursor, and the tool switches to select. Anything else is ignored.
    pub fn drop_payload(&mut self, raw: &str, screen: Point) -> Option<BoxId> {
        let payload = DropPayload::parse(raw)?;
        let world = drop_position(&self.camera, screen);
        let id = self.place_snippet(payload.text(), Some(world));
        self.set_tool(ToolKind::Select);
        Some(id)
    }

    /// Add a box with default size at `position`, or at the jittered pin
    /// location when no position is given.
    pub fn place_snippet(&mut self, text: impl Into<String>, position: Option<Point>) -> BoxId {
        let position =
            position.unwrap_or_else(|| pin_position(&self.config, self.services.random.as_mut()));
        let id = self
            .store
            .add(InfoBox::new(text, position, self.config.default_box_size));
        log::debug!("Placed box {} at ({:.1}, {:.1})", id, position.x, position.y);
        id
    }

    /// Pin the current document's snippet at `index`. Leaves the tool alone.
    pub fn pin_snippet(&mut self, index: usize) -> Option<BoxId> {
        let text = self.document.as_ref()?.snippets.get(index)?.text.clone();
        Some(self.place_snippet(text, None))
    }

    // --- Camera ---

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    /// Zoom by `factor` about a point relative to the viewport's top-left.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        self.camera.zoom_at(anchor, factor);
    }

    /// Frame all boxes, or reset when the canvas is empty.
    pub fn fit_to_content(&mut self) {
        self.camera.fit_to_content(self.store.bounds());
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    // --- Box actions ---

    /// Delete a box and forget its selection. Returns whether it existed.
    pub fn delete_box(&mut self, id: BoxId) -> bool {
        self.selection.remove(id);
        self.store.remove(id).is_some()
    }

    /// Duplicate a box, offset from the original, on top of the z-order.
    pub fn duplicate_box(&mut self, id: BoxId) -> Option<BoxId> {
        self.store.duplicate(id, self.config.duplicate_offset)
    }

    /// Toggle inline editing. Returns whether the box is now being edited.
    pub fn toggle_edit(&mut self, id: BoxId) -> bool {
        if self.store.get(id).is_none() {
            return false;
        }
        self.selection.toggle_editing(id)
    }

    /// Store edited text verbatim and leave edit mode.
    pub fn commit_edit(&mut self, id: BoxId, text: impl Into<String>) {
        self.store.update_text(id, text);
        self.selection.exit_editing(id);
    }

    // --- Documents ---

    /// Start processing an uploaded file. Any earlier upload still in flight
    /// becomes stale.
    pub fn upload(&mut self, file: FileDescriptor) {
        self.epoch += 1;
        self.processing = ProcessingState::Processing;
        log::info!("Processing {} ({} bytes)", file.name, file.size);
        self.dispatcher.extract(
            Arc::clone(&self.services.documents),
            file,
            self.epoch,
            Duration::from_millis(self.config.document_latency_ms),
        );
    }

    /// Drop the current document. Boxes already on the canvas stay.
    pub fn clear_document(&mut self) {
        self.epoch += 1;
        self.document = None;
        self.processing = ProcessingState::Idle;
    }

    // --- Chat ---

    /// Post a user message and request the assistant's reply.
    ///
    /// Input is trimmed; blank messages are ignored.
    pub fn send_chat(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.messages.push(ChatMessage::new(ChatRole::User, text));
        self.dispatcher.reply(
            Arc::clone(&self.services.assistant),
            self.messages.clone(),
            self.store.snapshot(),
            Duration::from_millis(self.config.assistant_latency_ms),
        );
        true
    }

    // --- Completions ---

    /// Whether background requests are still running.
    pub fn is_busy(&self) -> bool {
        self.dispatcher.pending() > 0
    }

    /// Apply completions that have arrived. Returns how many were received.
    pub fn poll_completions(&mut self) -> usize {
        let done = self.dispatcher.poll();
        let count = done.len();
        done.into_iter().for_each(|c| self.apply(c));
        count
    }

    /// Block until background requests finish or `timeout` elapses, applying
    /// completions as they arrive. Returns how many were received.
    pub fn wait_idle(&mut self, timeout: Duration) -> usize {
        let done = self.dispatcher.wait(timeout);
        let count = done.len();
        done.into_iter().for_each(|c| self.apply(c));
        count
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::DocumentReady { epoch, .. } if epoch != self.epoch => {
                log::warn!("Discarding stale extraction (epoch {}, current {})", epoch, self.epoch);
            }
            Completion::DocumentReady {
                file,
                result: Ok(snippets),
                ..
            } => {
                log::info!("Extracted {} snippet(s) from {}", snippets.len(), file.name);
                self.document = Some(Document {
                    id: Uuid::new_v4(),
                    name: file.name,
                    size: file.size,
                    snippets,
                });
                self.processing = ProcessingState::Ready;
            }
            Completion::DocumentReady { result: Err(e), .. } => {
                log::warn!("{}", e);
                self.processing = ProcessingState::Idle;
            }
            Completion::AssistantReply { result: Ok(text), .. } => {
                log::info!("Assistant replied ({} chars)", text.chars().count());
                self.messages.push(ChatMessage::new(ChatRole::Assistant, text));
            }
            Completion::AssistantReply { seq, result: Err(e) } => {
                log::warn!("No reply to chat request {}: {}", seq, e);
            }
        }
    }

    // --- Read-only views ---

    /// Copy of the boxes in z-order.
    pub fn snapshot(&self) -> CanvasSnapshot {
        self.store.snapshot()
    }

    /// Identity of the current document.
    pub fn document_ref(&self) -> Option<DocumentRef> {
        self.document.as_ref().map(Document::reference)
    }

    /// Build the export artifact for the current state.
    pub fn export(&self) -> ExportDocument {
        ExportDocument::build(self.document_ref(), self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CanvasError, CanvasResult};
    use crate::input::MouseButton;
    use crate::random::FixedRandom;
    use crate::services::Snippet;

    const WAIT: Duration = Duration::from_secs(5);

    fn session() -> Session {
        let services = Services {
            random: Box::new(FixedRandom(0.5)),
            ..Services::default()
        };
        let config = CanvasConfig::default().without_latency();
        let mut session = Session::with_services(config, services);
        session.set_viewport(Point::ZERO, Size::new(1000.0, 800.0));
        session
    }

    fn loaded() -> Session {
        let mut session = session();
        session.upload(FileDescriptor::new("paper.pdf", 2048));
        session.wait_idle(WAIT);
        session
    }

    struct FailingSource;

    impl DocumentSource for FailingSource {
        fn extract(&self, file: &FileDescriptor) -> CanvasResult<Vec<Snippet>> {
            Err(CanvasError::Extraction {
                file: file.name.clone(),
                reason: "unreadable".into(),
            })
        }
    }

    #[test]
    fn test_new_session_has_greeting() {
        let session = Session::new(CanvasConfig::default());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, ChatRole::Assistant);
        assert_eq!(session.tool(), ToolKind::Pan);
        assert_eq!(session.processing(), ProcessingState::Idle);
    }

    #[test]
    fn test_drop_places_under_cursor_and_selects_tool() {
        let mut session = session();
        session.set_viewport(Point::new(100.0, 50.0), Size::new(1000.0, 800.0));
        session.camera.set_offset(Vec2::new(-3500.0, -3600.0));

        let payload = r#"{"type":"snippet","id":"s1","text":"dropped"}"#;
        let id = session.drop_payload(payload, Point::new(600.0, 350.0)).unwrap();
        let b = session.store().get(id).unwrap();
        assert!((b.x - 4000.0).abs() < 1e-9);
        assert!((b.y - 3900.0).abs() < 1e-9);
        assert!((b.w - 260.0).abs() < f64::EPSILON);
        assert_eq!(b.text, "dropped");
        assert_eq!(session.tool(), ToolKind::Select);
    }

    #[test]
    fn test_unrecognized_drop_is_ignored() {
        let mut session = session();
        assert!(session.drop_payload(r#"{"type":"file"}"#, Point::ZERO).is_none());
        assert!(session.drop_payload("{", Point::ZERO).is_none());
        assert!(session.store().is_empty());
        assert_eq!(session.tool(), ToolKind::Pan);
    }

    #[test]
    fn test_upload_then_pin() {
        let mut session = loaded();
        assert_eq!(session.processing(), ProcessingState::Ready);
        let doc = session.document().unwrap();
        assert_eq!(doc.name, "paper.pdf");
        assert_eq!(doc.size, 2048);
        let first = doc.snippets[0].text.clone();

        let id = session.pin_snippet(0).unwrap();
        let b = session.store().get(id).unwrap();
        assert_eq!(b.text, first);
        assert_eq!(b.position(), Point::new(4000.0, 4000.0));
        assert_eq!(session.tool(), ToolKind::Pan);

        assert!(session.pin_snippet(999).is_none());
    }

    #[test]
    fn test_pin_without_document() {
        let mut session = session();
        assert!(session.pin_snippet(0).is_none());
    }

    #[test]
    fn test_stale_extraction_is_discarded() {
        let mut session = session();
        session.upload(FileDescriptor::new("old.pdf", 1));
        session.clear_document();
        session.wait_idle(WAIT);
        assert!(session.document().is_none());
        assert_eq!(session.processing(), ProcessingState::Idle);
    }

    #[test]
    fn test_second_upload_wins() {
        let mut session = session();
        session.upload(FileDescriptor::new("first.pdf", 1));
        session.upload(FileDescriptor::new("second.pdf", 1));
        assert_eq!(session.wait_idle(WAIT), 2);
        assert_eq!(session.document().unwrap().name, "second.pdf");
    }

    #[test]
    fn test_failed_extraction_returns_to_idle() {
        let services = Services {
            documents: Arc::new(FailingSource),
            ..Services::seeded(1)
        };
        let config = CanvasConfig::default().without_latency();
        let mut session = Session::with_services(config, services);
        session.upload(FileDescriptor::new("broken.pdf", 1));
        assert_eq!(session.processing(), ProcessingState::Processing);
        session.wait_idle(WAIT);
        assert_eq!(session.processing(), ProcessingState::Idle);
        assert!(session.document().is_none());
    }

    #[test]
    fn test_clear_document_keeps_boxes() {
        let mut session = loaded();
        session.pin_snippet(1);
        session.clear_document();
        assert_eq!(session.store().len(), 1);
        assert!(session.document_ref().is_none());
    }

    #[test]
    fn test_chat_round_trip() {
        let mut session = session();
        assert!(!session.send_chat("   "));
        assert!(session.send_chat("  how does this work? "));
        assert_eq!(session.messages().last().unwrap().text, "how does this work?");
        assert!(session.is_busy());

        session.wait_idle(WAIT);
        let reply = session.messages().last().unwrap();
        assert_eq!(reply.role, ChatRole::Assistant);
        assert!(reply.text.starts_with("Workflow"));
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn test_chat_summary_sees_canvas() {
        let mut session = session();
        session.place_snippet("alpha", None);
        session.send_chat("summarize please");
        session.wait_idle(WAIT);
        assert!(session.messages().last().unwrap().text.ends_with("1. alpha"));
    }

    /// Echoes the last user message; the first questions take longest.
    struct Hesitant;

    impl AssistantService for Hesitant {
        fn reply(&self, transcript: &[ChatMessage], _canvas: &CanvasSnapshot) -> String {
            let asked = transcript.iter().filter(|m| m.role == ChatRole::User).count() as u64;
            std::thread::sleep(Duration::from_millis(100u64.saturating_sub(asked * 20)));
            format!("re: {}", transcript.last().map(|m| m.text.as_str()).unwrap_or(""))
        }
    }

    #[test]
    fn test_chat_replies_follow_message_order() {
        let services = Services {
            assistant: Arc::new(Hesitant),
            ..Services::seeded(3)
        };
        let config = CanvasConfig::default().without_latency();
        let mut session = Session::with_services(config, services);
        for text in ["help", "export", "zoom", "summarize", "tip please"] {
            session.send_chat(text);
        }
        session.wait_idle(WAIT);

        let transcript: Vec<_> = session.messages()[1..]
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(
            transcript,
            vec![
                "help",
                "export",
                "zoom",
                "summarize",
                "tip please",
                "re: help",
                "re: export",
                "re: zoom",
                "re: summarize",
                "re: tip please",
            ]
        );
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut session = session();
        let id = session.place_snippet("a", Some(Point::ZERO));
        session.toggle_edit(id);
        session.selection.select(id);

        assert!(session.delete_box(id));
        assert!(!session.delete_box(id));
        assert_eq!(session.selection().selected(), None);
        assert_eq!(session.selection().editing(), None);
    }

    #[test]
    fn test_duplicate_and_edit() {
        let mut session = session();
        let id = session.place_snippet("a", Some(Point::new(10.0, 10.0)));
        let copy = session.duplicate_box(id).unwrap();
        assert_eq!(session.store().top(), Some(copy));
        assert_eq!(session.store().get(copy).unwrap().position(), Point::new(34.0, 34.0));

        assert!(session.toggle_edit(copy));
        session.commit_edit(copy, "edited\nline two");
        assert_eq!(session.store().get(copy).unwrap().text, "edited\nline two");
        assert_eq!(session.store().get(id).unwrap().text, "a");
        assert!(!session.selection().is_editing(copy));
        assert!(!session.toggle_edit(Uuid::new_v4()));
    }

    #[test]
    fn test_fit_and_reset() {
        let mut session = session();
        session.fit_to_content();
        let reset = *session.camera().camera();

        session.place_snippet("a", Some(Point::new(4000.0, 4000.0)));
        session.fit_to_content();
        assert!((session.camera().scale() - 2.5).abs() < f64::EPSILON);

        session.pan(Vec2::new(15.0, -5.0));
        session.reset_view();
        assert_eq!(*session.camera().camera(), reset);
    }

    #[test]
    fn test_pointer_drag_through_session() {
        let mut session = session();
        session.set_tool(ToolKind::Select);
        let id = session.place_snippet("a", Some(Point::new(4000.0, 4000.0)));
        let header = session.camera().world_to_screen(Point::new(4010.0, 4010.0));

        session.handle_pointer(PointerEvent::Down {
            position: header,
            button: MouseButton::Left,
            time_ms: 0,
        });
        session.handle_pointer(PointerEvent::Move {
            position: header + Vec2::new(40.0, 20.0),
        });
        session.handle_pointer(PointerEvent::Up {
            position: header + Vec2::new(40.0, 20.0),
            button: MouseButton::Left,
        });

        assert_eq!(session.store().get(id).unwrap().position(), Point::new(4040.0, 4020.0));
        assert_eq!(session.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_export_includes_document() {
        let mut session = loaded();
        session.pin_snippet(0);
        let export = session.export();
        assert_eq!(export.document.as_ref().unwrap().name, "paper.pdf");
        assert_eq!(export.canvas.items.len(), 1);
        assert_eq!(export.summary(), "1 info box(es) from \"paper.pdf\"");
    }
}
