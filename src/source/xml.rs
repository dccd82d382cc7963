use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, BytesText, Event as XmlEvent};
use quick_xml::Reader;

use super::{Attributes, Event, SourceError};

/// Default nesting limit, matching `ParseOptions::default()`.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Streaming event source over a `quick-xml` reader.
///
/// The reader is configured to be as forgiving as `quick-xml` allows:
/// end tags are not checked against their start tags and stray end tags
/// are passed through, because the tree builder recovers from both.
/// Empty elements are expanded into an open/close pair.
///
/// # Security
///
/// SEC-002: `quick-xml` (0.37) never expands `<!ENTITY>` declarations, so
/// an XXE payload cannot pull external content into the tree. Unknown
/// entity references fall back to the HTML named-entity table instead of
/// failing the parse.
pub struct XmlSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Close event owed for a self-closing element.
    pending: Option<Event>,
    depth: usize,
    max_depth: usize,
    finished: bool,
}

impl<'a> XmlSource<&'a [u8]> {
    pub fn from_str(text: &'a str) -> Self {
        Self::new(Reader::from_str(text))
    }
}

impl<R: BufRead> XmlSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(Reader::from_reader(reader))
    }

    fn new(mut reader: Reader<R>) -> Self {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        Self {
            reader,
            buf: Vec::new(),
            pending: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            finished: false,
        }
    }

    /// SEC-003: Reject documents nested deeper than `max_depth` elements.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn fail(&mut self, err: SourceError) -> Option<Result<Event, SourceError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for XmlSource<R> {
    type Item = Result<Event, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.take() {
            return Some(Ok(event));
        }
        if self.finished {
            return None;
        }

        loop {
            self.buf.clear();
            let decoder = self.reader.decoder();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(XmlEvent::Start(e)) => open_event(&e, decoder),
                Ok(XmlEvent::Empty(e)) => {
                    let open = open_event(&e, decoder);
                    if let Event::Open { tag, .. } = &open {
                        self.pending = Some(Event::close(tag.clone()));
                    }
                    open
                }
                Ok(XmlEvent::End(e)) => Event::close(lossy(e.name().as_ref())),
                Ok(XmlEvent::Text(e)) => Event::Text(unescape_text(&e)),
                Ok(XmlEvent::CData(e)) => Event::Text(lossy(&e.into_inner()).into_owned()),
                Ok(XmlEvent::Eof) => {
                    self.finished = true;
                    return None;
                }
                // Comments, declarations, processing instructions, doctype
                Ok(_) => continue,
                Err(e) => {
                    let position = self.reader.buffer_position() as u64;
                    return self.fail(SourceError::Xml {
                        position,
                        message: e.to_string(),
                    });
                }
            };

            match &event {
                Event::Open { .. } => {
                    self.depth += 1;
                    // SEC-003: Bound nesting before the builder sees the element
                    if self.depth > self.max_depth {
                        self.pending = None;
                        return self.fail(SourceError::MaxDepthExceeded(self.max_depth));
                    }
                    // A self-closing element never deepens the tree
                    if self.pending.is_some() {
                        self.depth -= 1;
                    }
                }
                Event::Close { .. } => self.depth = self.depth.saturating_sub(1),
                Event::Text(_) => {}
            }
            return Some(Ok(event));
        }
    }
}

fn open_event(e: &BytesStart<'_>, decoder: Decoder) -> Event {
    let mut attrs = Attributes::new();
    for attr_result in e.attributes().with_checks(false) {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed attribute");
                continue;
            }
        };
        let value = match attr.decode_and_unescape_value(decoder) {
            Ok(value) => value.into_owned(),
            Err(_) => html_escape::decode_html_entities(&lossy(&attr.value)).into_owned(),
        };
        attrs.push(lossy(attr.key.as_ref()), value);
    }
    Event::open(lossy(e.name().as_ref()), attrs)
}

fn unescape_text(e: &BytesText<'_>) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        // Entities outside the XML builtins, e.g. &nbsp; in sloppy RSS
        Err(_) => html_escape::decode_html_entities(&lossy(e)).into_owned(),
    }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
