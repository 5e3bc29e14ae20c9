//! Static rendering backend — HTTP fetch plus HTML parsing, no script.
//!
//! DESIGN
//! ======
//! Navigation downloads the page with `reqwest` and keeps the final URL and
//! body. A snapshot parses the body into a [`Document`] and answers style and
//! geometry queries from [`cascade`](super::cascade). In-page fetches reuse
//! the session's HTTP client, so asset requests carry the same User-Agent
//! and redirect policy as the page request.
//!
//! LIMITATIONS
//! ===========
//! Pages that build their markup with script, or style graphics from
//! stylesheets, need a script-executing engine behind the same traits.

use std::time::Duration;

use tracing::debug;
use url::Url;

use super::{BrowserEngine, BrowserSession, EngineError, FetchError, PageSnapshot, Rect, cascade};
use crate::dom::{Document, NodeId};

/// Settings shared by every session the engine launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEngineConfig {
    pub user_agent: String,
    pub max_redirects: usize,
}

pub struct StaticEngine {
    config: StaticEngineConfig,
}

impl StaticEngine {
    #[must_use]
    pub fn new(config: StaticEngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl BrowserEngine for StaticEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        let http = reqwest::Client::builder()
            .user_agent(&self.config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(self.config.max_redirects))
            .build()
            .map_err(|e| EngineError::Launch(e.to_string()))?;
        debug!("static engine: session launched");
        Ok(Box::new(StaticSession { http, loaded: None }))
    }
}

// =============================================================================
// SESSION
// =============================================================================

struct LoadedPage {
    url: Url,
    body: String,
}

pub struct StaticSession {
    http: reqwest::Client,
    loaded: Option<LoadedPage>,
}

impl StaticSession {
    async fn load(&self, url: &Url) -> Result<LoadedPage, EngineError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| EngineError::Navigation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Navigation(format!("HTTP {status} for {url}")));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| EngineError::Navigation(e.to_string()))?;
        Ok(LoadedPage { url: final_url, body })
    }
}

#[async_trait::async_trait]
impl BrowserSession for StaticSession {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), EngineError> {
        let page = tokio::time::timeout(timeout, self.load(url))
            .await
            .map_err(|_| EngineError::NavigationTimeout(timeout))??;
        debug!(url = %page.url, bytes = page.body.len(), "static engine: page loaded");
        self.loaded = Some(page);
        Ok(())
    }

    async fn snapshot(&self) -> Result<Box<dyn PageSnapshot>, EngineError> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| EngineError::Snapshot("no page loaded".into()))?;
        let document = Document::parse_html(&loaded.body);
        let base_url = document_base(&document, &loaded.url);
        Ok(Box::new(StaticPage { document, base_url, http: self.http.clone() }))
    }

    async fn close(&mut self) {
        self.loaded = None;
        debug!("static engine: session closed");
    }
}

/// The page URL, overridden by the first `<base href>`.
fn document_base(document: &Document, page_url: &Url) -> Url {
    document
        .elements_by_tag("base")
        .into_iter()
        .find_map(|b| document.attr(b, "href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

// =============================================================================
// SNAPSHOT
// =============================================================================

pub struct StaticPage {
    document: Document,
    base_url: Url,
    http: reqwest::Client,
}

#[async_trait::async_trait]
impl PageSnapshot for StaticPage {
    fn document(&self) -> &Document {
        &self.document
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        cascade::computed_value(&self.document, node, property)
    }

    fn bounding_box(&self, node: NodeId) -> Option<Rect> {
        cascade::estimated_box(&self.document, node)
    }

    fn intrinsic_size(&self, node: NodeId) -> Option<(f64, f64)> {
        cascade::intrinsic_size(&self.document, node)
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[cfg(test)]
#[path = "static_engine_test.rs"]
mod tests;
