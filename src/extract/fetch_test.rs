use super::*;
use crate::extract::{ExtractedGraphic, SourceKind};
use crate::page::fake::{FAKE_BASE, FakePage};

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"/>"#;

fn referenced(id: &str, reference: Option<&str>) -> Candidate {
    Candidate {
        graphic: ExtractedGraphic {
            id: id.into(),
            content: String::new(),
            source_kind: SourceKind::ImageReference,
            label: id.into(),
            width: None,
            height: None,
            parts: vec![],
        },
        reference: reference.map(str::to_owned),
    }
}

#[test]
fn references_resolve_against_base() {
    let base = Url::parse(FAKE_BASE).unwrap();
    assert_eq!(resolve_reference(&base, "icon.svg").unwrap().as_str(), "https://example.test/page/icon.svg");
    assert_eq!(resolve_reference(&base, "/a.svg").unwrap().as_str(), "https://example.test/a.svg");
    assert_eq!(resolve_reference(&base, "//cdn.test/b.svg").unwrap().as_str(), "https://cdn.test/b.svg");
    assert!(matches!(resolve_reference(&base, "http://[::1"), Err(FetchError::Resolve(_))));
}

#[tokio::test]
async fn fetched_graphics_fill_content() {
    let page = FakePage::body("").with_response("https://example.test/page/icon.svg", ICON);
    let mut candidates = vec![referenced("svg-1", Some("icon.svg"))];
    fill_external(&page, &mut candidates).await;
    assert_eq!(candidates[0].graphic.content, ICON);
}

#[tokio::test]
async fn failed_fetches_leave_content_empty() {
    let page = FakePage::body("")
        .with_response("https://example.test/not-svg.svg", "<html>login required</html>");
    let mut candidates = vec![
        referenced("svg-1", Some("/missing.svg")),
        referenced("svg-2", Some("/not-svg.svg")),
        referenced("svg-3", Some("http://[::1")),
    ];
    fill_external(&page, &mut candidates).await;
    assert!(candidates.iter().all(|c| c.graphic.content.is_empty()));
    assert_eq!(page.fetched(), ["https://example.test/missing.svg", "https://example.test/not-svg.svg"]);
}

#[tokio::test]
async fn fetches_run_in_discovery_order_and_skip_filled_candidates() {
    let page = FakePage::body("")
        .with_response("https://example.test/b.svg", ICON)
        .with_response("https://example.test/a.svg", ICON);
    let mut inline = referenced("svg-1", None);
    inline.graphic.content = ICON.to_owned();
    let mut candidates = vec![inline, referenced("svg-2", Some("/b.svg")), referenced("svg-3", Some("/a.svg"))];

    fill_external(&page, &mut candidates).await;

    assert_eq!(page.fetched(), ["https://example.test/b.svg", "https://example.test/a.svg"]);
    assert!(candidates.iter().all(|c| !c.graphic.content.is_empty()));
}

#[tokio::test]
async fn fetch_graphic_reports_missing_root() {
    let page = FakePage::body("").with_response("https://example.test/x.svg", "plain text");
    let err = fetch_graphic(&page, "/x.svg").await.unwrap_err();
    assert_eq!(err.error_code(), "E_FETCH_BODY");

    let err = fetch_graphic(&page, "/gone.svg").await.unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
}
