//! SnipCanvas Core Library
//!
//! Platform-agnostic camera, object store and interaction logic for an
//! infinite canvas of info boxes pinned from an uploaded document.

pub mod camera;
pub mod config;
pub mod drop;
pub mod error;
pub mod export;
pub mod geometry;
pub mod info_box;
pub mod input;
pub mod interaction;
pub mod random;
pub mod selection;
pub mod services;
pub mod session;
pub mod store;
pub mod tasks;
pub mod tools;

pub use camera::{Camera, CameraController};
pub use config::CanvasConfig;
pub use drop::DropPayload;
pub use error::{CanvasError, CanvasResult};
pub use export::{ExportDocument, EXPORT_VERSION};
pub use info_box::{BoxId, BoxRegion, InfoBox};
pub use input::{MouseButton, PointerEvent};
pub use interaction::{Gesture, InteractionController};
pub use random::{RandomSource, SeededRandom};
pub use selection::Selection;
pub use services::{
    AssistantService, CannedAssistant, ChatMessage, ChatRole, Document, DocumentRef,
    DocumentSource, FileDescriptor, MockDocumentSource, Snippet,
};
pub use session::{ProcessingState, Services, Session};
pub use store::{CanvasSnapshot, ObjectStore};
pub use tools::ToolKind;
