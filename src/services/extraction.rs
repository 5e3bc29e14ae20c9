//! Extraction service — one page URL in, ordered graphic records out.
//!
//! DESIGN
//! ======
//! Each call owns a fresh browser session:
//! navigate → settle delay → snapshot → discover → fetch → drop empty.
//! The whole run is bounded by one wall-clock budget. The session is closed
//! on every exit path before the result or error is handed back.
//!
//! ERROR HANDLING
//! ==============
//! Navigation and launch failures, budget expiry, and discovery faults fail
//! the request. Fetch failures only drop the affected candidate.

use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::extract::discover::{Candidate, discover};
use crate::extract::fetch::fill_external;
use crate::extract::{ExtractError, ExtractedGraphic, IdAllocator};
use crate::page::{BrowserEngine, BrowserSession};

/// Per-request timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// Upper bound for loading the page.
    pub navigation_timeout: Duration,
    /// Extra wait after load for lazily inserted content.
    pub settle_delay: Duration,
    /// Wall-clock bound for the whole run, navigation included.
    pub budget: Duration,
}

/// Extract every graphic from the page at `url`.
///
/// # Errors
///
/// Returns [`ExtractError::Navigation`] when the page cannot be loaded,
/// [`ExtractError::Timeout`] when the budget runs out,
/// [`ExtractError::Engine`] when no session can be acquired, and
/// [`ExtractError::Extraction`] when discovery fails.
pub async fn extract_page(
    engine: &dyn BrowserEngine,
    url: &Url,
    options: &ExtractionOptions,
) -> Result<Vec<ExtractedGraphic>, ExtractError> {
    let mut session = engine.launch().await?;

    let result = tokio::time::timeout(options.budget, run(session.as_mut(), url, options))
        .await
        .unwrap_or(Err(ExtractError::Timeout(options.budget)));

    session.close().await;
    debug!(%url, ok = result.is_ok(), "extraction: session closed");
    result
}

async fn run(
    session: &mut dyn BrowserSession,
    url: &Url,
    options: &ExtractionOptions,
) -> Result<Vec<ExtractedGraphic>, ExtractError> {
    session.navigate(url, options.navigation_timeout).await?;
    if !options.settle_delay.is_zero() {
        tokio::time::sleep(options.settle_delay).await;
    }

    let page = session.snapshot().await?;
    let mut ids = IdAllocator::new();
    let mut candidates = discover(page.as_ref(), &mut ids)?;
    let discovered = candidates.len();

    fill_external(page.as_ref(), &mut candidates).await;
    let graphics = keep_filled(candidates);

    info!(%url, discovered, count = graphics.len(), "extraction: complete");
    Ok(graphics)
}

/// Drop candidates whose content never arrived.
fn keep_filled(candidates: Vec<Candidate>) -> Vec<ExtractedGraphic> {
    candidates
        .into_iter()
        .map(|c| c.graphic)
        .filter(|g| !g.content.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "extraction_test.rs"]
mod tests;
