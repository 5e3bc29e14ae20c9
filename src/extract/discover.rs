//! Discovery scanner: one pass over the snapshot, five embedding patterns.
//!
//! DESIGN
//! ======
//! Patterns are scanned in a fixed order, each in document order:
//! inline roots, image references, sprite symbols, embedded objects,
//! background images. Ids come from the caller's [`IdAllocator`] and are only
//! drawn once a candidate is accepted, so skipped elements leave no gaps.
//!
//! Inline and symbol candidates carry finished content. The other three
//! carry the raw reference from the page and empty content, to be filled by
//! the fetch phase.
//!
//! ERROR HANDLING
//! ==============
//! The scan is all-or-nothing: the first [`ExtractError`] aborts the pass and
//! no partial candidate list is returned.

use tracing::debug;

use crate::dom::{Document, ElementData, NodeId};
use crate::page::PageSnapshot;

use super::assemble::{
    Dimensions, attribute_dimensions, ensure_dimensions, finish, resolve_dimensions, shared_definitions, wrap,
};
use super::color::url_target;
use super::decompose::decompose;
use super::style::resolve_styles;
use super::{ExtractError, ExtractedGraphic, IdAllocator, SourceKind, graphic_id};

/// Raw serializations shorter than this are treated as empty graphics.
pub const MIN_CONTENT_LEN: usize = 20;

/// File extension that marks a referenced graphic.
const GRAPHIC_EXTENSION: &str = ".svg";

/// One discovered graphic plus, for referenced kinds, where to fetch it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub graphic: ExtractedGraphic,
    pub reference: Option<String>,
}

/// Scan every pattern in order.
///
/// # Errors
///
/// Returns [`ExtractError::Extraction`] if any candidate cannot be built.
pub fn discover(page: &dyn PageSnapshot, ids: &mut IdAllocator) -> Result<Vec<Candidate>, ExtractError> {
    let mut candidates = Vec::new();

    let scanners: [(&str, Scanner); 5] = [
        ("inline", scan_inline),
        ("image", scan_images),
        ("symbol", scan_symbols),
        ("object", scan_objects),
        ("background", scan_backgrounds),
    ];
    for (pattern, scan) in scanners {
        let before = candidates.len();
        scan(page, ids, &mut candidates)?;
        debug!(pattern, found = candidates.len() - before, "discovery: pattern scanned");
    }

    Ok(candidates)
}

type Scanner = fn(&dyn PageSnapshot, &mut IdAllocator, &mut Vec<Candidate>) -> Result<(), ExtractError>;

// =============================================================================
// LABELS
// =============================================================================

/// Generic label chain: `aria-label`, `title` attribute, `<title>` text,
/// `id`, first class token.
#[must_use]
pub fn label_chain(doc: &Document, node: NodeId) -> Option<String> {
    let element = doc.element(node)?;
    element
        .non_empty_attr("aria-label")
        .or_else(|| element.non_empty_attr("title"))
        .map(str::to_owned)
        .or_else(|| title_text(doc, node))
        .or_else(|| element.non_empty_attr("id").map(str::to_owned))
        .or_else(|| element.attr("class").and_then(|c| c.split_whitespace().next()).map(str::to_owned))
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty())
}

fn title_text(doc: &Document, node: NodeId) -> Option<String> {
    doc.descendants(node)
        .into_iter()
        .skip(1)
        .find(|n| doc.tag(*n) == Some("title"))
        .map(|title| doc.text_content(title).trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn ordinal_label(kind: SourceKind, ordinal: usize) -> String {
    format!("{} {ordinal}", kind.label_prefix())
}

fn element_of(doc: &Document, node: NodeId) -> Result<&ElementData, ExtractError> {
    doc.element(node)
        .ok_or_else(|| ExtractError::Extraction(format!("node {node} is not an element")))
}

// =============================================================================
// REFERENCES
// =============================================================================

/// `true` for a source ending in `.svg`, or carrying `.svg?` before a query.
#[must_use]
pub fn is_svg_reference(src: &str) -> bool {
    src.ends_with(GRAPHIC_EXTENSION) || src.contains(".svg?")
}

/// First `url(...)` target in a computed `background-image` that points at
/// a graphic file, optionally followed by a query or fragment.
#[must_use]
pub fn background_svg_url(value: &str) -> Option<&str> {
    url_tokens(value).into_iter().filter_map(url_target).find(|target| {
        let path = target.split(['?', '#']).next().unwrap_or_default();
        path.ends_with(GRAPHIC_EXTENSION)
    })
}

/// Every bracketed `url(...)` token in `value`, quotes included.
fn url_tokens(value: &str) -> Vec<&str> {
    let lower = value.to_ascii_lowercase();
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("url(") {
        let start = cursor + found;
        let body = start + 4;
        let after = &value[body..];
        let trimmed = after.trim_start();
        let lead = after.len() - trimmed.len();

        let close = match trimmed.chars().next() {
            Some(quote @ ('"' | '\'')) => trimmed[1..]
                .find(quote)
                .and_then(|q| trimmed[q + 2..].find(')').map(|p| q + 2 + p)),
            _ => trimmed.find(')'),
        };
        let Some(close) = close else { break };

        let end = body + lead + close + 1;
        tokens.push(&value[start..end]);
        cursor = end;
    }
    tokens
}

// =============================================================================
// SCANNERS
// =============================================================================

/// Outermost graphic roots: SVG-namespace `<svg>` with no `<svg>` ancestor.
fn inline_roots(doc: &Document) -> Vec<NodeId> {
    doc.select(|e| e.svg && e.is("svg"))
        .into_iter()
        .filter(|n| !doc.ancestors(*n).any(|a| doc.tag(a) == Some("svg")))
        .collect()
}

fn scan_inline(page: &dyn PageSnapshot, ids: &mut IdAllocator, out: &mut Vec<Candidate>) -> Result<(), ExtractError> {
    let doc = page.document();
    for root in inline_roots(doc) {
        let bbox = page.bounding_box(root);
        if bbox.is_some_and(|b| b.width < 1.0 && b.height < 1.0) {
            continue;
        }

        let mut clone = doc
            .clone_subtree(root)
            .ok_or_else(|| ExtractError::Extraction(format!("inline root {root} is not an element")))?;
        if page.serialize(&clone).len() < MIN_CONTENT_LEN {
            continue;
        }

        let dimensions = resolve_dimensions(element_of(doc, root)?, bbox);
        resolve_styles(page, &mut clone, root);
        ensure_dimensions(&mut clone, dimensions);

        let ordinal = ids.next_ordinal();
        let id = graphic_id(ordinal);
        let parts = decompose(page, root, &id)?;
        out.push(Candidate {
            graphic: ExtractedGraphic {
                content: finish(page, clone),
                source_kind: SourceKind::Inline,
                label: label_chain(doc, root).unwrap_or_else(|| ordinal_label(SourceKind::Inline, ordinal)),
                width: dimensions.width,
                height: dimensions.height,
                parts,
                id,
            },
            reference: None,
        });
    }
    Ok(())
}

fn scan_images(page: &dyn PageSnapshot, ids: &mut IdAllocator, out: &mut Vec<Candidate>) -> Result<(), ExtractError> {
    let doc = page.document();
    let images = doc.select(|e| e.is("img") && e.non_empty_attr("src").is_some_and(is_svg_reference));
    for img in images {
        let element = element_of(doc, img)?;
        let src = element.attr("src").unwrap_or_default().to_owned();
        let (width, height) = page
            .intrinsic_size(img)
            .map_or((None, None), |(w, h)| (Some(w).filter(|w| *w > 0.0), Some(h).filter(|h| *h > 0.0)));

        let ordinal = ids.next_ordinal();
        let label = element
            .non_empty_attr("alt")
            .map(str::to_owned)
            .or_else(|| label_chain(doc, img))
            .unwrap_or_else(|| ordinal_label(SourceKind::ImageReference, ordinal));
        out.push(referenced(ordinal, SourceKind::ImageReference, label, Dimensions { width, height }, src));
    }
    Ok(())
}

fn scan_symbols(page: &dyn PageSnapshot, ids: &mut IdAllocator, out: &mut Vec<Candidate>) -> Result<(), ExtractError> {
    let doc = page.document();
    for symbol in doc.elements_by_tag("symbol") {
        let element = element_of(doc, symbol)?;
        let mut clone = doc
            .clone_subtree(symbol)
            .ok_or_else(|| ExtractError::Extraction(format!("symbol {symbol} is not an element")))?;
        if page.serialize(&clone).len() < MIN_CONTENT_LEN {
            continue;
        }
        resolve_styles(page, &mut clone, symbol);

        let owner = doc.ancestors(symbol).find(|a| doc.tag(*a) == Some("svg"));
        let defs = owner.and_then(|svg| shared_definitions(doc, svg));
        let dimensions = resolve_dimensions(element, page.bounding_box(symbol));
        let mut root = wrap(std::mem::take(&mut clone.children), element.non_empty_attr("viewBox"), defs);
        ensure_dimensions(&mut root, dimensions);

        let ordinal = ids.next_ordinal();
        out.push(Candidate {
            graphic: ExtractedGraphic {
                id: graphic_id(ordinal),
                content: finish(page, root),
                source_kind: SourceKind::SpriteSymbol,
                label: element
                    .non_empty_attr("id")
                    .map_or_else(|| ordinal_label(SourceKind::SpriteSymbol, ordinal), str::to_owned),
                width: dimensions.width,
                height: dimensions.height,
                parts: Vec::new(),
            },
            reference: None,
        });
    }
    Ok(())
}

fn scan_objects(page: &dyn PageSnapshot, ids: &mut IdAllocator, out: &mut Vec<Candidate>) -> Result<(), ExtractError> {
    let doc = page.document();
    let objects = doc.select(|e| {
        (e.is("object") && e.attr("data").is_some_and(|d| d.ends_with(GRAPHIC_EXTENSION)))
            || (e.is("embed") && e.attr("src").is_some_and(|s| s.ends_with(GRAPHIC_EXTENSION)))
    });
    for object in objects {
        let element = element_of(doc, object)?;
        let Some(src) = element.non_empty_attr("data").or_else(|| element.non_empty_attr("src")) else {
            continue;
        };

        let ordinal = ids.next_ordinal();
        let label = label_chain(doc, object).unwrap_or_else(|| ordinal_label(SourceKind::EmbeddedObject, ordinal));
        out.push(referenced(
            ordinal,
            SourceKind::EmbeddedObject,
            label,
            attribute_dimensions(element),
            src.to_owned(),
        ));
    }
    Ok(())
}

fn scan_backgrounds(
    page: &dyn PageSnapshot,
    ids: &mut IdAllocator,
    out: &mut Vec<Candidate>,
) -> Result<(), ExtractError> {
    let doc = page.document();
    for node in doc.elements() {
        let Some(background) = page.computed_style(node, "background-image") else {
            continue;
        };
        let Some(target) = background_svg_url(&background) else {
            continue;
        };

        let ordinal = ids.next_ordinal();
        let label = label_chain(doc, node).unwrap_or_else(|| ordinal_label(SourceKind::BackgroundImage, ordinal));
        out.push(referenced(
            ordinal,
            SourceKind::BackgroundImage,
            label,
            Dimensions::default(),
            target.to_owned(),
        ));
    }
    Ok(())
}

/// Candidate whose content is fetched later.
fn referenced(ordinal: usize, kind: SourceKind, label: String, size: Dimensions, reference: String) -> Candidate {
    Candidate {
        graphic: ExtractedGraphic {
            id: graphic_id(ordinal),
            content: String::new(),
            source_kind: kind,
            label,
            width: size.width,
            height: size.height,
            parts: Vec::new(),
        },
        reference: Some(reference),
    }
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
