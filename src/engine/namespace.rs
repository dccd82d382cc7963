use std::collections::HashMap;

use crate::source::Attributes;

/// Namespace URIs this crate understands, and the prefix each one is
/// rewritten to regardless of what the feed author called it.
pub const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
    ("http://purl.org/rss/1.0/modules/content/", "content"),
    ("http://www.itunes.com/DTDs/Podcast-1.0.dtd", "itunes"),
    ("http://www.w3.org/1999/xhtml", "xhtml"),
    ("http://purl.org/rss/1.0/modules/syndication/", "sy"),
    ("http://rssnamespace.org/feedburner/ext/1.0", "feedburner"),
];

/// Per-parse map from the document's own prefixes to canonical ones.
///
/// Only root-ish elements (`<rss>`, `<*:RDF>`, `<*:div>`) are inspected for
/// `xmlns:*` declarations; everything else just has known prefixes
/// rewritten. A prefix bound to an unknown URI is left as written.
#[derive(Debug, Default)]
pub struct NamespaceMap {
    prefixes: HashMap<String, &'static str>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every binding. Called at the start of each parse.
    pub fn clear(&mut self) {
        self.prefixes.clear();
    }

    /// Rewrites `tag` to its canonical form, first recording any namespace
    /// declarations carried by `attrs` if the element is root-ish.
    pub fn canonicalize(&mut self, tag: &str, attrs: Option<&Attributes>) -> String {
        if let Some(attrs) = attrs {
            if declares_namespaces(tag) {
                for (key, uri) in attrs.iter() {
                    if let Some(prefix) = key.strip_prefix("xmlns:") {
                        self.define(prefix, uri);
                    }
                }
            }
        }

        match tag.split_once(':') {
            Some((prefix, local)) => match self.prefixes.get(prefix) {
                Some(canonical) => format!("{canonical}:{local}"),
                None => tag.to_string(),
            },
            None => tag.to_string(),
        }
    }

    fn define(&mut self, prefix: &str, uri: &str) {
        let known = KNOWN_NAMESPACES
            .iter()
            .find(|(known_uri, _)| *known_uri == uri)
            .map(|(_, canonical)| *canonical);
        match known {
            Some(canonical) => {
                self.prefixes.insert(prefix.to_string(), canonical);
            }
            None => tracing::trace!(prefix, uri, "Unknown namespace, prefix left as written"),
        }
    }
}

fn declares_namespaces(tag: &str) -> bool {
    if tag.eq_ignore_ascii_case("rss") {
        return true;
    }
    match tag.split_once(':') {
        Some((prefix, local)) => {
            !prefix.is_empty()
                && (local.eq_ignore_ascii_case("rdf") || local.eq_ignore_ascii_case("div"))
        }
        None => false,
    }
}
