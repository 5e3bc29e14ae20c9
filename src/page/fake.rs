//! In-memory page and engine used by unit tests.
//!
//! `FakePage` answers every capability from a parsed HTML string. Computed
//! style and geometry default to the static cascade; tests override single
//! values by element `id`. Fetches are served from canned responses and
//! anything else answers 404.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use super::{BrowserEngine, BrowserSession, EngineError, FetchError, PageSnapshot, Rect, cascade};
use crate::dom::{Document, NodeId};

pub const FAKE_BASE: &str = "https://example.test/page/";

// =============================================================================
// PAGE
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakePage {
    document: Document,
    base_url: Url,
    styles: HashMap<(String, String), String>,
    boxes: HashMap<String, Option<Rect>>,
    responses: HashMap<String, String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl FakePage {
    pub fn new(html: &str) -> Self {
        Self {
            document: Document::parse_html(html),
            base_url: Url::parse(FAKE_BASE).unwrap(),
            styles: HashMap::new(),
            boxes: HashMap::new(),
            responses: HashMap::new(),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wrap `body` in a minimal HTML page.
    pub fn body(body: &str) -> Self {
        Self::new(&format!("<!doctype html><html><head></head><body>{body}</body></html>"))
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base_url = Url::parse(base).unwrap();
        self
    }

    pub fn with_style(mut self, element_id: &str, property: &str, value: &str) -> Self {
        self.styles.insert((element_id.to_owned(), property.to_owned()), value.to_owned());
        self
    }

    pub fn with_box(mut self, element_id: &str, width: f64, height: f64) -> Self {
        self.boxes.insert(element_id.to_owned(), Some(Rect::sized(width, height)));
        self
    }

    pub fn with_unmeasurable(mut self, element_id: &str) -> Self {
        self.boxes.insert(element_id.to_owned(), None);
        self
    }

    pub fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_owned(), body.to_owned());
        self
    }

    /// Node carrying `id="element_id"`. Panics when absent.
    pub fn node(&self, element_id: &str) -> NodeId {
        self.document.select(|e| e.attr("id") == Some(element_id))[0]
    }

    /// URLs requested through `fetch_text`, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    fn element_id(&self, node: NodeId) -> Option<&str> {
        self.document.attr(node, "id")
    }
}

#[async_trait::async_trait]
impl PageSnapshot for FakePage {
    fn document(&self) -> &Document {
        &self.document
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        self.element_id(node)
            .and_then(|id| self.styles.get(&(id.to_owned(), property.to_owned())))
            .cloned()
            .or_else(|| cascade::computed_value(&self.document, node, property))
    }

    fn bounding_box(&self, node: NodeId) -> Option<Rect> {
        match self.element_id(node).and_then(|id| self.boxes.get(id)) {
            Some(rect) => *rect,
            None => cascade::estimated_box(&self.document, node),
        }
    }

    fn intrinsic_size(&self, node: NodeId) -> Option<(f64, f64)> {
        cascade::intrinsic_size(&self.document, node)
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.responses.get(url.as_str()).cloned().ok_or(FetchError::Status(404))
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// What a fake session does when asked to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeNavigation {
    Load,
    Fail,
    Hang,
}

#[derive(Debug)]
pub struct FakeEngine {
    page: FakePage,
    navigation: FakeNavigation,
    pub launches: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl FakeEngine {
    pub fn new(page: FakePage, navigation: FakeNavigation) -> Self {
        Self {
            page,
            navigation,
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            page: self.page.clone(),
            navigation: self.navigation,
            loaded: false,
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct FakeSession {
    page: FakePage,
    navigation: FakeNavigation,
    loaded: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> Result<(), EngineError> {
        match self.navigation {
            FakeNavigation::Load => {
                self.loaded = true;
                Ok(())
            }
            FakeNavigation::Fail => Err(EngineError::Navigation(format!("net::ERR_NAME_NOT_RESOLVED at {url}"))),
            FakeNavigation::Hang => std::future::pending().await,
        }
    }

    async fn snapshot(&self) -> Result<Box<dyn PageSnapshot>, EngineError> {
        if !self.loaded {
            return Err(EngineError::Snapshot("no page loaded".into()));
        }
        Ok(Box::new(self.page.clone()))
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
