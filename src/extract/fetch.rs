//! External content fetch for referenced graphics.
//!
//! Runs after discovery, one candidate at a time in discovery order. Each
//! reference is resolved against the page's base location and retrieved
//! once through the page. A failure leaves the content empty; the caller's
//! final filter drops the candidate. No retries.

use tracing::{debug, warn};
use url::Url;

use crate::page::{FetchError, PageSnapshot};

use super::ErrorCode;
use super::discover::Candidate;

/// Text a response must contain to be accepted as a graphic.
pub const ROOT_MARKER: &str = "<svg";

/// Resolve a page reference to an absolute URL.
///
/// # Errors
///
/// Returns [`FetchError::Resolve`] if `reference` cannot be joined onto `base`.
pub fn resolve_reference(base: &Url, reference: &str) -> Result<Url, FetchError> {
    base.join(reference.trim())
        .map_err(|e| FetchError::Resolve(format!("{reference}: {e}")))
}

/// Resolve and retrieve one referenced graphic.
///
/// # Errors
///
/// Returns a [`FetchError`] when the reference does not resolve, the
/// retrieval fails, or the body carries no graphic root.
pub async fn fetch_graphic(page: &dyn PageSnapshot, reference: &str) -> Result<String, FetchError> {
    let url = resolve_reference(page.base_url(), reference)?;
    let text = page.fetch_text(&url).await?;
    if text.contains(ROOT_MARKER) {
        Ok(text)
    } else {
        Err(FetchError::Body(format!("no {ROOT_MARKER} root in response from {url}")))
    }
}

/// Fill content for every candidate still empty after discovery.
///
/// Retrieved files are kept verbatim: no color sanitization, no
/// well-formedness check.
pub async fn fill_external(page: &dyn PageSnapshot, candidates: &mut [Candidate]) {
    for candidate in candidates.iter_mut().filter(|c| c.graphic.content.is_empty()) {
        let Some(reference) = candidate.reference.as_deref() else {
            continue;
        };
        match fetch_graphic(page, reference).await {
            Ok(content) => {
                debug!(id = %candidate.graphic.id, bytes = content.len(), "fetch: graphic retrieved");
                candidate.graphic.content = content;
            }
            Err(e) => {
                warn!(
                    id = %candidate.graphic.id,
                    reference,
                    error = %e,
                    code = e.error_code(),
                    "fetch: graphic dropped"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
