//! Inline `style` attribute declarations.
//!
//! Splitting respects quotes and parentheses, so values such as
//! `url("data:image/svg+xml;utf8,...")` stay in one piece.

/// One `property: value` pair from a declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    /// Property name, trimmed. Case is preserved; compare case-insensitively.
    pub property: &'a str,
    /// Value, trimmed, `!important` included.
    pub value: &'a str,
}

/// Split a declaration block into its declarations.
///
/// Entries without a `:` or with an empty property name are skipped.
#[must_use]
pub fn declarations(block: &str) -> Vec<Declaration<'_>> {
    split_top_level(block, ';')
        .into_iter()
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim();
            if property.is_empty() {
                return None;
            }
            Some(Declaration { property, value: value.trim() })
        })
        .collect()
}

/// Last declared value of `property` in `block`, with `!important` stripped.
#[must_use]
pub fn declared_value<'a>(block: &'a str, property: &str) -> Option<&'a str> {
    declarations(block)
        .into_iter()
        .rev()
        .find(|d| d.property.eq_ignore_ascii_case(property))
        .map(|d| strip_important(d.value).0)
}

/// Split `!important` off a value. Returns the bare value and the suffix.
#[must_use]
pub fn strip_important(value: &str) -> (&str, &str) {
    let trimmed = value.trim_end();
    match trimmed.rfind('!') {
        Some(pos) if trimmed[pos + 1..].trim().eq_ignore_ascii_case("important") => {
            (trimmed[..pos].trim_end(), &trimmed[pos..])
        }
        _ => (trimmed, ""),
    }
}

/// Split on `separator` wherever it is outside quotes and parentheses.
#[must_use]
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}
