//! Extract — the in-page graphic extraction core.
//!
//! DESIGN
//! ======
//! One run works against one settled [`PageSnapshot`](crate::page::PageSnapshot):
//! [`discover`] walks the five embedding patterns and produces ordered
//! candidates, [`fetch`] fills in content for referenced files, and the
//! orchestrator drops whatever is still empty. Every normalization step
//! (context color, computed paint, sanitization, wrapping) runs on owned
//! [`Fragment`](crate::dom::Fragment) clones, never on the live document.
//!
//! Ids come from an [`IdAllocator`] created per run and threaded through the
//! scanners, so numbering is deterministic and never shared across requests.

pub mod assemble;
pub mod color;
pub mod decompose;
pub mod discover;
pub mod fetch;
pub mod style;

use std::time::Duration;

use serde::Serialize;

use crate::page::EngineError;

// =============================================================================
// ERRORS
// =============================================================================

/// Machine-readable error identity, logged next to the message.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("{0}")]
    Navigation(String),
    #[error("extraction timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("extraction failed: {0}")]
    Extraction(String),
    #[error(transparent)]
    Engine(EngineError),
}

impl From<EngineError> for ExtractError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Navigation(_) | EngineError::NavigationTimeout(_) => Self::Navigation(err.to_string()),
            other => Self::Engine(other),
        }
    }
}

impl ErrorCode for ExtractError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingUrl => "E_URL_REQUIRED",
            Self::InvalidUrl => "E_URL_INVALID",
            Self::Navigation(_) => "E_NAVIGATION",
            Self::Timeout(_) => "E_TIMEOUT",
            Self::Extraction(_) => "E_EXTRACTION",
            Self::Engine(e) => e.error_code(),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// How a graphic was embedded in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Inline,
    ImageReference,
    BackgroundImage,
    EmbeddedObject,
    SpriteSymbol,
}

impl SourceKind {
    /// Prefix of the synthesized ordinal label.
    #[must_use]
    pub fn label_prefix(self) -> &'static str {
        match self {
            Self::Inline => "Inline SVG",
            Self::ImageReference => "Image SVG",
            Self::BackgroundImage => "Background SVG",
            Self::EmbeddedObject => "Object SVG",
            Self::SpriteSymbol => "Symbol SVG",
        }
    }
}

/// One discovered graphic asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedGraphic {
    pub id: String,
    pub content: String,
    pub source_kind: SourceKind,
    pub label: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub parts: Vec<GraphicPart>,
}

/// One decomposed top-level shape of an inline graphic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphicPart {
    pub id: String,
    pub content: String,
    pub tag: String,
    pub label: String,
}

// =============================================================================
// IDS
// =============================================================================

/// Run-scoped ordinal source for graphic ids.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: usize,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next ordinal, starting at 1.
    pub fn next_ordinal(&mut self) -> usize {
        self.issued += 1;
        self.issued
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued
    }
}

/// Graphic id for an ordinal, `svg-<n>`.
#[must_use]
pub fn graphic_id(ordinal: usize) -> String {
    format!("svg-{ordinal}")
}

/// Part id under a parent graphic, `<parent>-part-<k>`.
#[must_use]
pub fn part_id(parent: &str, index: usize) -> String {
    format!("{parent}-part-{index}")
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
