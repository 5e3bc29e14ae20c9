use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

use super::*;

const PAGE: &str = r#"<!doctype html>
<html><head><base href="/assets/"></head>
<body>
  <div style="color: #123456"><svg id="icon" width="24" height="24"><path id="p" fill="currentColor"/></svg></div>
</body></html>"#;

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"/>"#;

fn engine() -> StaticEngine {
    StaticEngine::new(StaticEngineConfig { user_agent: "svg-harvest-test".into(), max_redirects: 2 })
}

/// Serve a tiny site on an ephemeral local port.
async fn serve() -> Url {
    let app = Router::new()
        .route("/page", get(|| async { axum::response::Html(PAGE) }))
        .route("/moved", get(|| async { axum::response::Redirect::temporary("/page") }))
        .route("/assets/icon.svg", get(|| async { ICON }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/slow", get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

#[test]
fn document_base_honours_base_element() {
    let page_url = Url::parse("https://example.test/a/b.html").unwrap();

    let doc = Document::parse_html(r#"<html><head><base href="/static/"></head></html>"#);
    assert_eq!(document_base(&doc, &page_url).as_str(), "https://example.test/static/");

    let doc = Document::parse_html("<html><head></head></html>");
    assert_eq!(document_base(&doc, &page_url), page_url);
}

#[tokio::test]
async fn snapshot_requires_navigation() {
    let session = engine().launch().await.unwrap();
    let err = session.snapshot().await.err().unwrap();
    assert!(matches!(err, EngineError::Snapshot(_)));
}

#[tokio::test]
async fn navigate_snapshot_and_fetch_against_local_site() {
    let site = serve().await;
    let mut session = engine().launch().await.unwrap();

    session.navigate(&site.join("moved").unwrap(), Duration::from_secs(5)).await.unwrap();
    let page = session.snapshot().await.unwrap();

    assert_eq!(page.base_url().as_str(), site.join("assets/").unwrap().as_str());
    let icon = page.document().select(|e| e.attr("id") == Some("icon"))[0];
    let path = page.document().select(|e| e.attr("id") == Some("p"))[0];
    assert_eq!(page.bounding_box(icon), Some(Rect::sized(24.0, 24.0)));
    assert_eq!(page.computed_style(path, "fill").as_deref(), Some("rgb(18, 52, 86)"));

    let asset = page.base_url().join("icon.svg").unwrap();
    assert_eq!(page.fetch_text(&asset).await.unwrap(), ICON);
    let missing = site.join("missing").unwrap();
    assert!(matches!(page.fetch_text(&missing).await, Err(FetchError::Status(404))));

    session.close().await;
}

#[tokio::test]
async fn non_success_page_is_a_navigation_error() {
    let site = serve().await;
    let mut session = engine().launch().await.unwrap();
    let err = session.navigate(&site.join("missing").unwrap(), Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, EngineError::Navigation(ref m) if m.contains("404")), "{err}");
}

#[tokio::test]
async fn slow_page_hits_navigation_timeout() {
    let site = serve().await;
    let mut session = engine().launch().await.unwrap();
    let err = session.navigate(&site.join("slow").unwrap(), Duration::from_millis(50)).await.unwrap_err();
    assert!(matches!(err, EngineError::NavigationTimeout(_)));
}
