//! External collaborators: document extraction and the assistant.
//!
//! Both are traits so hosts can plug in real backends. The bundled
//! implementations are deterministic stand-ins.

use crate::error::CanvasResult;
use crate::random::{RandomSource, SeededRandom};
use crate::store::CanvasSnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded file as seen by the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// A text fragment extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub text: String,
}

/// The document currently loaded, with its extracted snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub snippets: Vec<Snippet>,
}

impl Document {
    /// Identity used by exports.
    pub fn reference(&self) -> DocumentRef {
        DocumentRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Document identity without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: Uuid,
    pub name: String,
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
        }
    }
}

/// Turns an uploaded file into snippets. Called once per upload.
pub trait DocumentSource: Send + Sync {
    fn extract(&self, file: &FileDescriptor) -> CanvasResult<Vec<Snippet>>;
}

/// Produces the assistant's next message. Stateless per call.
pub trait AssistantService: Send + Sync {
    fn reply(&self, transcript: &[ChatMessage], canvas: &CanvasSnapshot) -> String;
}

const SAMPLE_SENTENCES: [&str; 10] = [
    "Problem statement: clarify scope and constraints.",
    "Key insight: cluster related ideas spatially.",
    "Consider edge cases and non-happy paths.",
    "User journey suggests progressive disclosure.",
    "Prioritize readability and navigation.",
    "Use pinning to externalize working memory.",
    "Zoom in for detail, out for structure.",
    "Connections to be added in a future phase.",
    "Simulated AI can suggest organization tactics.",
    "Export prepares artifacts for sharing.",
];

const MIN_SNIPPETS: usize = 12;
const SNIPPET_SPREAD: usize = 6;

/// Fabricates snippets from the sample sentence pool.
///
/// Output is reproducible per file name: the generator is seeded from the sum
/// of the name's characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDocumentSource;

impl MockDocumentSource {
    pub fn new() -> Self {
        Self
    }

    fn seed_for(name: &str) -> u64 {
        name.chars().map(|c| c as u64).sum()
    }

    fn pick(random: &mut dyn RandomSource) -> &'static str {
        let idx = (random.next_f64() * SAMPLE_SENTENCES.len() as f64) as usize;
        SAMPLE_SENTENCES[idx.min(SAMPLE_SENTENCES.len() - 1)]
    }
}

impl DocumentSource for MockDocumentSource {
    fn extract(&self, file: &FileDescriptor) -> CanvasResult<Vec<Snippet>> {
        let mut random = match Self::seed_for(&file.name) {
            0 => SeededRandom::from_entropy(),
            seed => SeededRandom::new(seed),
        };
        let count = MIN_SNIPPETS + (random.next_f64() * SNIPPET_SPREAD as f64) as usize;

        let snippets = (1..=count)
            .map(|n| {
                let (s1, s2, s3) = (
                    Self::pick(&mut random),
                    Self::pick(&mut random),
                    Self::pick(&mut random),
                );
                Snippet {
                    id: Uuid::new_v4().to_string(),
                    text: format!("({n}) {s1} {s2} {s3}"),
                }
            })
            .collect();
        Ok(snippets)
    }
}

/// Opening line of every transcript.
pub const GREETING: &str = "Hi! I'm your simulated assistant. Upload a PDF to generate mock snippets, \
pin them to the canvas, then use Select to arrange. Ask me for help any time.";

const EXPORT_REPLY: &str =
    "To export, click the Export button in the top bar. You'll see a JSON preview of your info boxes.";
const EMPTY_CANVAS_REPLY: &str =
    "There's nothing on the canvas yet. Pin snippets from the left, then ask me to summarize.";
const TOOLBAR_REPLY: &str = "Use the toolbar in the canvas: \u{2212}, +, Fit, and Reset. \
Pan mode lets you move the canvas; Select mode lets you drag boxes.";
const WORKFLOW_REPLY: &str = "Workflow: Upload a PDF \u{2192} select snippets \u{2192} Pin to canvas \
\u{2192} Arrange in Select mode \u{2192} Zoom as needed \u{2192} Export JSON.";
const TIP_REPLY: &str = "Tip: Try dragging a snippet onto the canvas. Switch to Select to arrange, \
and use Fit to center your work.";

const SUMMARY_ITEMS: usize = 3;
const SUMMARY_PREVIEW_CHARS: usize = 80;

/// Keyword-triggered replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedAssistant;

impl CannedAssistant {
    pub fn new() -> Self {
        Self
    }

    fn summarize(canvas: &CanvasSnapshot) -> String {
        if canvas.items.is_empty() {
            return EMPTY_CANVAS_REPLY.to_string();
        }
        let start = canvas.items.len().saturating_sub(SUMMARY_ITEMS);
        let preview: Vec<String> = canvas.items[start..]
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let head: String = item.text.chars().take(SUMMARY_PREVIEW_CHARS).collect();
                let ellipsis = if item.text.chars().count() > SUMMARY_PREVIEW_CHARS {
                    "\u{2026}"
                } else {
                    ""
                };
                format!("{}. {}{}", i + 1, head, ellipsis)
            })
            .collect();
        format!(
            "Here's a quick summary of your latest items:\n{}",
            preview.join("\n")
        )
    }
}

impl AssistantService for CannedAssistant {
    fn reply(&self, transcript: &[ChatMessage], canvas: &CanvasSnapshot) -> String {
        let lower = transcript
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.text.to_lowercase())
            .unwrap_or_default();

        if lower.contains("export") {
            EXPORT_REPLY.to_string()
        } else if lower.contains("summar") {
            Self::summarize(canvas)
        } else if lower.contains("fit") || lower.contains("zoom") {
            TOOLBAR_REPLY.to_string()
        } else if lower.contains("help") || lower.contains("how") {
            WORKFLOW_REPLY.to_string()
        } else {
            TIP_REPLY.to_string()
        }
    }
}
