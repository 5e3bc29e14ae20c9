//! Color tokens: parsing, hex normalization, and portability sanitization.
//!
//! DESIGN
//! ======
//! The set of portable color tokens is closed and written down as data in
//! [`PORTABLE_FORMS`]. A value is portable when any form accepts it; the
//! check is a small hand-written tokenizer, never a pattern string.
//!
//! Anything outside the grammar (custom-property references, `currentColor`
//! left over from the page, `color-mix()`, typos) is replaced by
//! [`FALLBACK_COLOR`] on every color-bearing attribute and on the same
//! properties inside inline `style` blocks.

use std::borrow::Cow;

use crate::dom::Fragment;
use crate::dom::style::{declarations, strip_important};

/// Replacement for color values that fail the portable grammar.
pub const FALLBACK_COLOR: &str = "#000000";

/// Attributes (and style properties) that carry a color value.
pub const COLOR_ATTRIBUTES: &[&str] = &["fill", "stroke", "color", "stop-color", "flood-color", "lighting-color"];

// =============================================================================
// GRAMMAR
// =============================================================================

/// One accepted shape of color token.
#[derive(Debug, Clone, Copy)]
pub enum TokenForm {
    /// `#` followed by a bounded run of hex digits.
    Hex { min_digits: usize, max_digits: usize },
    /// `name(arg, arg, arg[, alpha])` with numeric arguments.
    Function { names: &'static [&'static str], min_args: usize, max_args: usize },
    /// Literal keywords, matched case-insensitively.
    Keyword(&'static [&'static str]),
    /// `url(...)` paint-server reference.
    Url,
    /// Entry of the named-color table.
    Named,
}

/// Units allowed after a numeric function argument.
const ARGUMENT_UNITS: &[&str] = &["", "%", "deg", "grad", "rad", "turn"];

/// The portable color grammar.
pub const PORTABLE_FORMS: &[TokenForm] = &[
    TokenForm::Hex { min_digits: 3, max_digits: 8 },
    TokenForm::Function { names: &["rgb", "rgba", "hsl", "hsla"], min_args: 3, max_args: 4 },
    TokenForm::Keyword(&["none", "transparent", "inherit"]),
    TokenForm::Url,
    TokenForm::Named,
];

impl TokenForm {
    #[must_use]
    pub fn accepts(&self, token: &str) -> bool {
        match *self {
            Self::Hex { min_digits, max_digits } => token.strip_prefix('#').is_some_and(|digits| {
                (min_digits..=max_digits).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_hexdigit())
            }),
            Self::Function { names, min_args, max_args } => function_call(token).is_some_and(|(name, args)| {
                names.iter().any(|n| n.eq_ignore_ascii_case(name))
                    && function_args(args).is_some_and(|a| (min_args..=max_args).contains(&a.len()))
            }),
            Self::Keyword(words) => words.iter().any(|w| w.eq_ignore_ascii_case(token)),
            Self::Url => url_target(token).is_some(),
            Self::Named => named_color(token).is_some(),
        }
    }
}

/// `true` when `value` matches one of the [`PORTABLE_FORMS`].
#[must_use]
pub fn is_portable_color(value: &str) -> bool {
    let token = value.trim();
    !token.is_empty() && PORTABLE_FORMS.iter().any(|form| form.accepts(token))
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Split `name(args)` into its name and raw argument text.
fn function_call(token: &str) -> Option<(&str, &str)> {
    let open = token.find('(')?;
    let name = &token[..open];
    let inner = token[open + 1..].strip_suffix(')')?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) || inner.contains(['(', ')']) {
        return None;
    }
    Some((name, inner))
}

/// Numeric arguments of a color function, each as `(value, unit)`.
///
/// Arguments are separated by commas, whitespace, or the alpha slash.
fn function_args(raw: &str) -> Option<Vec<(f64, &str)>> {
    raw.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(numeric_argument)
        .collect()
}

fn numeric_argument(part: &str) -> Option<(f64, &str)> {
    let split = part
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || ((*c == '-' || *c == '+') && *i == 0)))
        .map_or(part.len(), |(i, _)| i);
    let (number, unit) = part.split_at(split);
    if !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let unit_ok = ARGUMENT_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit));
    let value = number.parse::<f64>().ok()?;
    unit_ok.then_some((value, unit))
}

/// Target of a `url(...)` token, quotes removed.
#[must_use]
pub fn url_target(token: &str) -> Option<&str> {
    let head = token.get(..4)?;
    if !head.eq_ignore_ascii_case("url(") {
        return None;
    }
    let inner = token[4..].strip_suffix(')')?.trim();
    let inner = unquote(inner);
    if inner.is_empty() || inner.contains(['(', ')']) {
        return None;
    }
    Some(inner)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

// =============================================================================
// PARSED COLORS
// =============================================================================

/// A resolved sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Lowercase hex, with an alpha byte only when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, unit_to_byte(self.a))
        }
    }

    /// Functional form, the way computed styles report colors.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse any color the portable grammar describes into sRGB.
///
/// Keywords without a color (`none`, `inherit`) and `url(...)` references
/// return `None`. `transparent` is fully transparent black.
#[must_use]
pub fn parse_color(value: &str) -> Option<Rgba> {
    let token = value.trim();
    if token.eq_ignore_ascii_case("transparent") {
        return Some(Rgba { r: 0, g: 0, b: 0, a: 0.0 });
    }
    if let Some(digits) = token.strip_prefix('#') {
        return parse_hex(digits);
    }
    if let Some((name, raw)) = function_call(token) {
        let args = function_args(raw)?;
        return match name.to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => rgb_from_args(&args),
            "hsl" | "hsla" => hsl_from_args(&args),
            _ => None,
        };
    }
    named_color(token).map(|[r, g, b]| Rgba::opaque(r, g, b))
}

fn parse_hex(digits: &str) -> Option<Rgba> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match digits.len() {
        3 => Some(Rgba::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba { r: nibble(0)?, g: nibble(1)?, b: nibble(2)?, a: f64::from(nibble(3)?) / 255.0 }),
        6 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: f64::from(byte(6)?) / 255.0 }),
        _ => None,
    }
}

fn rgb_from_args(args: &[(f64, &str)]) -> Option<Rgba> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let channel = |(value, unit): (f64, &str)| -> Option<u8> {
        match unit {
            "" => Some(clamp_byte(value)),
            "%" => Some(clamp_byte(value * 2.55)),
            _ => None,
        }
    };
    Some(Rgba {
        r: channel(args[0])?,
        g: channel(args[1])?,
        b: channel(args[2])?,
        a: alpha(args.get(3).copied())?,
    })
}

fn hsl_from_args(args: &[(f64, &str)]) -> Option<Rgba> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let (h, h_unit) = args[0];
    let hue = match h_unit.to_ascii_lowercase().as_str() {
        "" | "deg" => h,
        "grad" => h * 0.9,
        "rad" => h.to_degrees(),
        "turn" => h * 360.0,
        _ => return None,
    };
    let percent = |(value, _): (f64, &str)| (value / 100.0).clamp(0.0, 1.0);
    let (s, l) = (percent(args[1]), percent(args[2]));

    // CSS Color 4, hsl-to-rgb.
    let hue = hue.rem_euclid(360.0);
    let f = |n: f64| {
        let k = (n + hue / 30.0) % 12.0;
        let a = s * l.min(1.0 - l);
        l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };
    Some(Rgba {
        r: unit_to_byte(f(0.0)),
        g: unit_to_byte(f(8.0)),
        b: unit_to_byte(f(4.0)),
        a: alpha(args.get(3).copied())?,
    })
}

fn alpha(arg: Option<(f64, &str)>) -> Option<f64> {
    match arg {
        None => Some(1.0),
        Some((value, "")) => Some(value.clamp(0.0, 1.0)),
        Some((value, "%")) => Some((value / 100.0).clamp(0.0, 1.0)),
        Some(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn unit_to_byte(value: f64) -> u8 {
    clamp_byte(value * 255.0)
}

// =============================================================================
// SANITIZATION
// =============================================================================

/// `value` unchanged when portable, otherwise [`FALLBACK_COLOR`].
#[must_use]
pub fn sanitize_color(value: &str) -> Cow<'_, str> {
    if is_portable_color(value) { Cow::Borrowed(value) } else { Cow::Borrowed(FALLBACK_COLOR) }
}

/// Rewrite non-portable color declarations inside a `style` block.
///
/// Returns the block untouched when every color declaration is portable.
#[must_use]
pub fn sanitize_style(block: &str) -> Cow<'_, str> {
    let decls = declarations(block);
    let needs_rewrite = decls.iter().any(|d| is_color_property(d.property) && !is_portable_color(strip_important(d.value).0));
    if !needs_rewrite {
        return Cow::Borrowed(block);
    }

    let rewritten: Vec<String> = decls
        .iter()
        .map(|d| {
            let (bare, important) = strip_important(d.value);
            if is_color_property(d.property) && !is_portable_color(bare) {
                join_declaration(d.property, FALLBACK_COLOR, important)
            } else {
                join_declaration(d.property, bare, important)
            }
        })
        .collect();
    Cow::Owned(rewritten.join("; "))
}

fn join_declaration(property: &str, value: &str, important: &str) -> String {
    if important.is_empty() { format!("{property}: {value}") } else { format!("{property}: {value} {important}") }
}

fn is_color_property(property: &str) -> bool {
    COLOR_ATTRIBUTES.iter().any(|p| p.eq_ignore_ascii_case(property))
}

/// Sanitize every color attribute and inline style block in `root`'s subtree.
pub fn sanitize_fragment(root: &mut Fragment) {
    root.walk_mut(&mut |element| {
        for (name, value) in &mut element.attrs {
            if COLOR_ATTRIBUTES.contains(&name.as_str()) {
                let clean = sanitize_color(value);
                if clean != value.as_str() {
                    *value = clean.into_owned();
                }
            } else if name == "style" {
                if let Cow::Owned(clean) = sanitize_style(value) {
                    *value = clean;
                }
            }
        }
    });
}

// =============================================================================
// NAMED COLORS
// =============================================================================

/// Look up a CSS named color, case-insensitively.
#[must_use]
pub fn named_color(name: &str) -> Option<[u8; 3]> {
    let lower = name.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by(|(entry, _)| entry.cmp(&lower.as_str()))
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

/// CSS named colors, sorted by name.
pub const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
#[path = "color_test.rs"]
mod tests;
