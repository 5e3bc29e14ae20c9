use super::*;
use crate::extract::SourceKind;
use crate::page::fake::{FakeEngine, FakeNavigation, FakePage};

fn options() -> ExtractionOptions {
    ExtractionOptions {
        navigation_timeout: Duration::from_secs(30),
        settle_delay: Duration::ZERO,
        budget: Duration::from_secs(5),
    }
}

fn target() -> Url {
    Url::parse("https://example.test/page/").unwrap()
}

fn assert_well_formed(content: &str) {
    let mut reader = quick_xml::Reader::from_str(content);
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Start(e)) => {
                assert_unique_attributes(content, &e);
                depth += 1;
            }
            Ok(quick_xml::events::Event::Empty(e)) => assert_unique_attributes(content, &e),
            Ok(quick_xml::events::Event::End(_)) => depth -= 1,
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed content {content}: {e}"),
        }
    }
    assert_eq!(depth, 0, "unbalanced content {content}");
}

fn assert_unique_attributes(content: &str, element: &quick_xml::events::BytesStart<'_>) {
    for attribute in element.attributes() {
        if let Err(e) = attribute {
            panic!("bad attribute in {content}: {e}");
        }
    }
}

#[tokio::test]
async fn single_icon_page_yields_one_inline_graphic() {
    let page = FakePage::body(r#"<svg width="24" height="24" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#);
    let engine = FakeEngine::new(page, FakeNavigation::Load);

    let graphics = extract_page(&engine, &target(), &options()).await.unwrap();

    assert_eq!(graphics.len(), 1);
    assert_eq!(graphics[0].source_kind, SourceKind::Inline);
    assert_eq!((graphics[0].width, graphics[0].height), (Some(24.0), Some(24.0)));
    assert!(graphics[0].parts.is_empty());
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn missing_background_graphic_is_dropped() {
    let page = FakePage::body(
        r#"<div style="background-image: url(/gone.svg)"></div>
           <img src="/ok.svg" alt="ok">"#,
    )
    .with_response("https://example.test/ok.svg", r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
    let engine = FakeEngine::new(page, FakeNavigation::Load);

    let graphics = extract_page(&engine, &target(), &options()).await.unwrap();

    let ids: Vec<&str> = graphics.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["svg-1"]);
    assert_eq!(graphics[0].label, "ok");
}

#[tokio::test]
async fn every_returned_graphic_is_well_formed_and_namespaced() {
    let page = FakePage::body(
        r#"<svg viewBox="0 0 10 10" style="color: rgb(1, 2, 3)">
             <defs><linearGradient id="g"><stop stop-color="var(--a)"/></linearGradient></defs>
             <path fill="currentColor" d="M0 0"/><circle r="1" stroke="url(#g)"/>
           </svg>
           <svg style="display:none"><symbol id="s" viewBox="0 0 4 4"><text>a &amp; b</text></symbol></svg>"#,
    );
    let engine = FakeEngine::new(page, FakeNavigation::Load);

    let graphics = extract_page(&engine, &target(), &options()).await.unwrap();

    assert_eq!(graphics.len(), 2);
    for graphic in &graphics {
        assert!(!graphic.content.is_empty());
        assert!(graphic.content.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert_well_formed(&graphic.content);
        for part in &graphic.parts {
            assert_well_formed(&part.content);
        }
    }
    assert_eq!(graphics[0].parts.len(), 2);
    assert!(graphics[0].content.contains(r##"fill="#010203""##));
    assert!(!graphics[0].content.contains("var(--a)"));
}

#[tokio::test]
async fn href_and_xlink_href_on_one_element_stay_distinct() {
    let page = FakePage::body(
        r##"<svg width="24" height="24"><use href="#a" xlink:href="#a"/><path d="M0 0h24"/></svg>"##,
    );
    let engine = FakeEngine::new(page, FakeNavigation::Load);

    let graphics = extract_page(&engine, &target(), &options()).await.unwrap();

    assert_eq!(graphics.len(), 1);
    let content = &graphics[0].content;
    assert_well_formed(content);
    assert!(content.contains(r##"<use href="#a" xlink:href="#a""##), "{content}");
    assert!(content.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#), "{content}");
    for part in &graphics[0].parts {
        assert_well_formed(&part.content);
    }
    assert!(graphics[0].parts[0].content.contains("xmlns:xlink="), "{}", graphics[0].parts[0].content);
}

#[tokio::test]
async fn navigation_failure_closes_session() {
    let engine = FakeEngine::new(FakePage::body(""), FakeNavigation::Fail);

    let err = extract_page(&engine, &target(), &options()).await.unwrap_err();

    assert!(matches!(err, ExtractError::Navigation(_)), "{err:?}");
    assert_eq!(engine.launches(), 1);
    assert_eq!(engine.closes(), 1);
}

#[tokio::test]
async fn budget_expiry_fails_the_request_and_closes_session() {
    let engine = FakeEngine::new(FakePage::body(""), FakeNavigation::Hang);
    let opts = ExtractionOptions { budget: Duration::from_millis(20), ..options() };

    let err = extract_page(&engine, &target(), &opts).await.unwrap_err();

    assert!(matches!(err, ExtractError::Timeout(d) if d == Duration::from_millis(20)));
    assert_eq!(engine.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn settle_delay_runs_before_snapshot() {
    let page = FakePage::body(r#"<svg viewBox="0 0 1 1"><path d="M0 0"/></svg>"#);
    let engine = FakeEngine::new(page, FakeNavigation::Load);
    let opts = ExtractionOptions { settle_delay: Duration::from_millis(1500), ..options() };

    let started = tokio::time::Instant::now();
    let graphics = extract_page(&engine, &target(), &opts).await.unwrap();

    assert_eq!(graphics.len(), 1);
    assert!(started.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test]
async fn repeated_runs_agree_on_records() {
    let page = FakePage::body(
        r#"<svg id="a" viewBox="0 0 8 8"><path d="M0 0"/></svg><img src="x.svg">
           <svg style="display:none"><symbol id="s" viewBox="0 0 2 2"><path d="M0 0"/></symbol></svg>"#,
    )
    .with_response("https://example.test/page/x.svg", "<svg/>");
    let engine = FakeEngine::new(page, FakeNavigation::Load);

    let first = extract_page(&engine, &target(), &options()).await.unwrap();
    let second = extract_page(&engine, &target(), &options()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(engine.closes(), 2);
}
