//! Page — capability interface to the rendering collaborator.
//!
//! ARCHITECTURE
//! ============
//! The extraction core never talks to a browser directly. It consumes the
//! five capabilities below through [`PageSnapshot`]:
//! - query the document (via [`PageSnapshot::document`])
//! - computed style per element
//! - live geometry (bounding box, intrinsic image size)
//! - subtree serialization
//! - same-context network fetch
//!
//! [`BrowserEngine`] and [`BrowserSession`] cover acquisition: one session
//! per extraction request, closed by the orchestrator on every exit path.
//! [`static_engine::StaticEngine`] is the shipped backend; tests use an
//! in-memory fake.

pub mod cascade;
pub mod static_engine;

#[cfg(test)]
pub mod fake;

use std::time::Duration;

use url::Url;

use crate::dom::{Document, Fragment, NodeId};

// =============================================================================
// ERRORS
// =============================================================================

/// Failures of the rendering collaborator itself.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("navigation timed out after {}s", .0.as_secs())]
    NavigationTimeout(Duration),
    #[error("page snapshot failed: {0}")]
    Snapshot(String),
}

impl crate::extract::ErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Launch(_) => "E_ENGINE_LAUNCH",
            Self::Navigation(_) => "E_NAVIGATION",
            Self::NavigationTimeout(_) => "E_NAVIGATION_TIMEOUT",
            Self::Snapshot(_) => "E_SNAPSHOT",
        }
    }
}

/// Failures of a single in-page retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("reference cannot be resolved: {0}")]
    Resolve(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("response body unreadable: {0}")]
    Body(String),
}

impl crate::extract::ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Resolve(_) => "E_FETCH_RESOLVE",
            Self::Request(_) => "E_FETCH_REQUEST",
            Self::Status(_) => "E_FETCH_STATUS",
            Self::Body(_) => "E_FETCH_BODY",
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Layout rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn sized(width: f64, height: f64) -> Self {
        Self { x: 0.0, y: 0.0, width, height }
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// A settled, point-in-time view of one rendered page.
#[async_trait::async_trait]
pub trait PageSnapshot: Send + Sync {
    /// The page's document, for element queries.
    fn document(&self) -> &Document;

    /// Location relative references resolve against (honours `<base href>`).
    fn base_url(&self) -> &Url;

    /// Computed value of a CSS property, in the engine's serialized form
    /// (colors as `rgb()`/`rgba()`). `None` when the property is unknown.
    fn computed_style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Rendered bounding box. `None` when the engine cannot measure the node.
    fn bounding_box(&self, node: NodeId) -> Option<Rect>;

    /// Natural size of an image-like element, `(width, height)`.
    fn intrinsic_size(&self, node: NodeId) -> Option<(f64, f64)>;

    /// Serialize an element subtree to namespaced markup.
    fn serialize(&self, fragment: &Fragment) -> String {
        fragment.serialize()
    }

    /// Retrieve `url` from within the page's context.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on network failure, a non-success status, or
    /// an unreadable body.
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError>;
}

/// Factory for browser sessions.
#[async_trait::async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Acquire a fresh session owned by one extraction request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Launch`] if the session cannot be created.
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError>;
}

/// One exclusively owned browser session.
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` and wait until the page has settled, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Navigation`] or [`EngineError::NavigationTimeout`].
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), EngineError>;

    /// Capture the current state of the loaded page.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Snapshot`] if no page is loaded.
    async fn snapshot(&self) -> Result<Box<dyn PageSnapshot>, EngineError>;

    /// Release the session. Called exactly once, on every exit path.
    async fn close(&mut self);
}
