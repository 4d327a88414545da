//! JSON export of the canvas and the current document identity.

use crate::error::CanvasResult;
use crate::info_box::InfoBox;
use crate::services::DocumentRef;
use crate::store::CanvasSnapshot;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format version written into every export.
pub const EXPORT_VERSION: &str = "phase-1";

/// File name suggested for downloads.
pub const DEFAULT_EXPORT_FILENAME: &str = "akiec-export.json";

/// Boxes section of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportCanvas {
    pub items: Vec<InfoBox>,
}

/// Export artifact. Owns copies of everything it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub document: Option<DocumentRef>,
    pub canvas: ExportCanvas,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub exported_at: String,
    pub version: String,
}

impl ExportDocument {
    /// Build an export stamped with the current time.
    pub fn build(document: Option<DocumentRef>, snapshot: CanvasSnapshot) -> Self {
        Self::build_at(document, snapshot, Utc::now())
    }

    /// Build an export stamped with `at`.
    pub fn build_at(
        document: Option<DocumentRef>,
        snapshot: CanvasSnapshot,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            document,
            canvas: ExportCanvas {
                items: snapshot.items,
            },
            exported_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed JSON to `path`.
    pub fn write_to(&self, path: &Path) -> CanvasResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Exported {} box(es) to {}", self.canvas.items.len(), path.display());
        Ok(())
    }

    /// One-line description, e.g. `3 info box(es) from "paper.pdf"`.
    pub fn summary(&self) -> String {
        let source = match &self.document {
            Some(doc) => format!("\"{}\"", doc.name),
            None => "\u{2014}".to_string(),
        };
        format!("{} info box(es) from {}", self.canvas.items.len(), source)
    }
}
