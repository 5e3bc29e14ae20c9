//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the browser engine sessions are launched from and the per-request
//! extraction options. Nothing about a request outlives its handler; there
//! is no cache and no persistence.

use std::sync::Arc;

use crate::page::BrowserEngine;
use crate::services::extraction::ExtractionOptions;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn BrowserEngine>,
    pub options: ExtractionOptions,
}

impl AppState {
    #[must_use]
    pub fn new(engine: Arc<dyn BrowserEngine>, options: ExtractionOptions) -> Self {
        Self { engine, options }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
