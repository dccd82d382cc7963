use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup tag regex"));

static ENTITY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#(\d+)|#[xX]([0-9a-fA-F]+)|(\w+));").expect("Invalid entity regex")
});

/// Converts an HTML or XHTML fragment to plain text.
///
/// Throws away every tag and decodes character references. Named
/// references are looked up in the XHTML Latin-1 table; names outside it
/// are dropped rather than left half-decoded. Layout is lost.
///
/// # Examples
///
/// ```
/// use syndication::util::markup_to_plain;
///
/// assert_eq!(markup_to_plain("<b>Caf&eacute;</b> &amp; co"), "Café & co");
/// assert_eq!(markup_to_plain("a&bogus;b"), "ab");
/// ```
pub fn markup_to_plain(markup: &str) -> String {
    let text = MARKUP_TAG.replace_all(markup, "");
    decode_entities(&text).into_owned()
}

/// Decodes `&name;`, `&#NN;` and `&#xHH;` references.
///
/// Returns `Cow::Borrowed` when the input has no `&` (common case).
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_REF.replace_all(text, |caps: &Captures<'_>| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named_entity(name.as_str()))
        };
        decoded.map(String::from).unwrap_or_default()
    })
}

/// Escapes plain text for embedding in HTML. Only `&`, `<` and `>` are
/// touched; quotes are left alone because the result is element content.
pub fn plain_to_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Parses an unsigned integer field, leaving it unset when malformed.
pub(crate) fn parse_number<T: std::str::FromStr>(value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::trace!(value, "Ignoring malformed numeric field");
            None
        }
    }
}

/// Named character references from the XHTML 1.0 Latin-1 and special sets.
fn named_entity(name: &str) -> Option<char> {
    let code = match name {
        "quot" => 34,
        "amp" => 38,
        "apos" => 39,
        "lt" => 60,
        "gt" => 62,
        "nbsp" => 160,
        "iexcl" => 161,
        "cent" => 162,
        "pound" => 163,
        "curren" => 164,
        "yen" => 165,
        "brvbar" => 166,
        "sect" => 167,
        "uml" => 168,
        "copy" => 169,
        "ordf" => 170,
        "laquo" => 171,
        "not" => 172,
        "shy" => 173,
        "reg" => 174,
        "macr" => 175,
        "deg" => 176,
        "plusmn" => 177,
        "sup2" => 178,
        "sup3" => 179,
        "acute" => 180,
        "micro" => 181,
        "para" => 182,
        "middot" => 183,
        "cedil" => 184,
        "sup1" => 185,
        "ordm" => 186,
        "raquo" => 187,
        "frac14" => 188,
        "frac12" => 189,
        "frac34" => 190,
        "iquest" => 191,
        "Agrave" => 192,
        "Aacute" => 193,
        "Acirc" => 194,
        "Atilde" => 195,
        "Auml" => 196,
        "Aring" => 197,
        "AElig" => 198,
        "Ccedil" => 199,
        "Egrave" => 200,
        "Eacute" => 201,
        "Ecirc" => 202,
        "Euml" => 203,
        "Igrave" => 204,
        "Iacute" => 205,
        "Icirc" => 206,
        "Iuml" => 207,
        "ETH" => 208,
        "Ntilde" => 209,
        "Ograve" => 210,
        "Oacute" => 211,
        "Ocirc" => 212,
        "Otilde" => 213,
        "Ouml" => 214,
        "times" => 215,
        "Oslash" => 216,
        "Ugrave" => 217,
        "Uacute" => 218,
        "Ucirc" => 219,
        "Uuml" => 220,
        "Yacute" => 221,
        "THORN" => 222,
        "szlig" => 223,
        "agrave" => 224,
        "aacute" => 225,
        "acirc" => 226,
        "atilde" => 227,
        "auml" => 228,
        "aring" => 229,
        "aelig" => 230,
        "ccedil" => 231,
        "egrave" => 232,
        "eacute" => 233,
        "ecirc" => 234,
        "euml" => 235,
        "igrave" => 236,
        "iacute" => 237,
        "icirc" => 238,
        "iuml" => 239,
        "eth" => 240,
        "ntilde" => 241,
        "ograve" => 242,
        "oacute" => 243,
        "ocirc" => 244,
        "otilde" => 245,
        "ouml" => 246,
        "divide" => 247,
        "oslash" => 248,
        "ugrave" => 249,
        "uacute" => 250,
        "ucirc" => 251,
        "uuml" => 252,
        "yacute" => 253,
        "thorn" => 254,
        "yuml" => 255,
        _ => return None,
    };
    char::from_u32(code)
}
