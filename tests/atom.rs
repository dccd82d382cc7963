//! Integration tests for the Atom front-end.

use pretty_assertions::assert_eq;
use syndication::atom::{Feed, Parser};
use syndication::{ContentKind, DateValue, ParseMode, ParseOptions};

fn parse(xml: &str) -> Feed {
    Parser::new().parse(xml).unwrap()
}

// ============================================================================
// Atom 1.0
// ============================================================================

const RFC_4287: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="text">dive into mark</title>
  <subtitle type="html">A &lt;em&gt;lot&lt;/em&gt; of effort went into making this effortless</subtitle>
  <updated>2005-07-31T12:29:29Z</updated>
  <id>tag:example.org,2003:3</id>
  <link rel="alternate" type="text/html" hreflang="en" href="http://example.org/"/>
  <link rel="self" type="application/atom+xml" href="http://example.org/feed.atom"/>
  <rights>Copyright (c) 2003, Mark Pilgrim</rights>
  <generator uri="http://www.example.com/" version="1.0">Example Toolkit</generator>
  <entry>
    <title>Atom draft-07 snapshot</title>
    <link rel="alternate" type="text/html" href="http://example.org/2005/04/02/atom"/>
    <link rel="enclosure" type="audio/mpeg" length="1337" href="http://example.org/audio/ph34r_my_podcast.mp3"/>
    <id>tag:example.org,2003:3.2397</id>
    <updated>2005-07-31T12:29:29Z</updated>
    <published>2003-12-13T08:29:29-04:00</published>
    <author>
      <name>Mark Pilgrim</name>
      <uri>http://example.org/</uri>
      <email>f8dy@example.com</email>
    </author>
    <contributor><name>Sam Ruby</name></contributor>
    <contributor><name>Joe Gregorio</name></contributor>
    <content type="xhtml" xml:lang="en" xml:base="http://diveintomark.org/">
      <div xmlns="http://www.w3.org/1999/xhtml"><p><i>[Update: The Atom draft is finished.]</i></p></div>
    </content>
  </entry>
</feed>"#;

#[test]
fn test_rfc_4287_feed() {
    let feed = parse(RFC_4287);

    let title = feed.title.as_ref().expect("title");
    assert_eq!(title.kind(), ContentKind::Text);
    assert_eq!(title.plain(), "dive into mark");

    let subtitle = feed.subtitle.as_ref().expect("subtitle");
    assert_eq!(subtitle.kind(), ContentKind::Html);
    assert_eq!(
        subtitle.html(),
        "A <em>lot</em> of effort went into making this effortless"
    );
    assert_eq!(
        subtitle.plain(),
        "A lot of effort went into making this effortless"
    );

    assert_eq!(feed.id.as_deref(), Some("tag:example.org,2003:3"));
    assert_eq!(feed.rights.as_deref(), Some("Copyright (c) 2003, Mark Pilgrim"));
    assert_eq!(feed.generator.as_deref(), Some("Example Toolkit"));
    assert!(feed.updated.as_ref().is_some_and(DateValue::is_parsed));
    assert_eq!(feed.links.len(), 2);
    assert_eq!(feed.link(), Some("http://example.org/"));
}

#[test]
fn test_rfc_4287_entry() {
    let feed = parse(RFC_4287);
    assert_eq!(feed.entries.len(), 1);
    let entry = &feed.entries[0];

    assert_eq!(
        entry.title.as_ref().map(|t| t.plain()),
        Some("Atom draft-07 snapshot")
    );
    assert_eq!(entry.id.as_deref(), Some("tag:example.org,2003:3.2397"));
    assert_eq!(entry.link(), Some("http://example.org/2005/04/02/atom"));
    assert_eq!(entry.links[1].rel.as_deref(), Some("enclosure"));
    assert_eq!(entry.links[1].length, Some(1337));
    assert!(entry.published.as_ref().is_some_and(DateValue::is_parsed));

    let author = entry.author.as_ref().expect("author");
    assert_eq!(author.name.as_deref(), Some("Mark Pilgrim"));
    assert_eq!(author.uri.as_deref(), Some("http://example.org/"));
    assert_eq!(author.email.as_deref(), Some("f8dy@example.com"));

    let names: Vec<_> = entry
        .contributors
        .iter()
        .map(|p| p.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("Sam Ruby"), Some("Joe Gregorio")]);

    let content = entry.content.as_ref().expect("content");
    assert_eq!(content.kind(), ContentKind::Xhtml);
    assert_eq!(
        content.xhtml(),
        "<p><i>[Update: The Atom draft is finished.]</i></p>"
    );
    assert_eq!(content.plain(), "[Update: The Atom draft is finished.]");
    assert_eq!(entry.content_src, None);
}

#[test]
fn test_feed_author_is_not_claimed_by_entry() {
    let xml = r#"<feed><author><name>Feed Author</name></author>
        <entry><title>t</title></entry></feed>"#;
    let feed = parse(xml);
    assert_eq!(
        feed.author.as_ref().and_then(|a| a.name.as_deref()),
        Some("Feed Author")
    );
    assert!(feed.entries[0].author.is_none());
}

#[test]
fn test_category_order() {
    let xml = r#"<feed><entry>
        <category term="dull"/>
        <category term="amazingly" label="Amazingly" scheme="http://example.com/tags"/>
        </entry></feed>"#;
    let feed = parse(xml);
    let terms: Vec<_> = feed.entries[0]
        .categories
        .iter()
        .map(|c| c.term.as_deref())
        .collect();
    assert_eq!(terms, vec![Some("dull"), Some("amazingly")]);
    assert_eq!(
        feed.entries[0].categories[1].scheme.as_deref(),
        Some("http://example.com/tags")
    );
}

#[test]
fn test_out_of_line_content() {
    let xml = r#"<feed><entry>
        <content type="video/mp4" src="http://example.com/movie.mp4"/>
        </entry></feed>"#;
    let feed = parse(xml);
    let entry = &feed.entries[0];
    assert_eq!(entry.content_src.as_deref(), Some("http://example.com/movie.mp4"));
    assert_eq!(entry.content.as_ref().map(|c| c.kind()), Some(ContentKind::Text));
    assert_eq!(entry.content.as_ref().map(|c| c.raw()), Some(""));
}

#[test]
fn test_entry_source_feed() {
    let xml = r#"<feed><entry>
        <title>Copied</title>
        <source>
          <id>http://example.org/</id>
          <title>Fourty-Two</title>
          <updated>2003-12-13T18:30:02Z</updated>
          <rights>(c) 2003 Example Inc.</rights>
        </source>
        <id>urn:uuid:1225c695</id>
        </entry></feed>"#;
    let feed = parse(xml);
    let entry = &feed.entries[0];
    assert_eq!(entry.id.as_deref(), Some("urn:uuid:1225c695"));
    assert_eq!(entry.title.as_ref().map(|t| t.plain()), Some("Copied"));

    let source = entry.source.as_deref().expect("source");
    assert_eq!(source.id.as_deref(), Some("http://example.org/"));
    assert_eq!(source.title.as_ref().map(|t| t.plain()), Some("Fourty-Two"));
    assert_eq!(source.rights.as_deref(), Some("(c) 2003 Example Inc."));
    assert!(source.entries.is_empty());

    // The source's title never leaks onto the outer feed
    assert!(feed.title.is_none());
}

#[test]
fn test_google_data_attributes() {
    let xml = r#"<feed xmlns:gd="http://schemas.google.com/g/2005"><entry>
        <title>Gig</title>
        <gd:where valueString="Joe's Pub"/>
        <gd:when startTime="2007-03-18T21:00:00.000-07:00" endTime="2007-03-18T23:30:00.000-07:00"/>
        </entry></feed>"#;
    let feed = parse(xml);
    let google = &feed.entries[0].google;
    assert_eq!(google.location.as_deref(), Some("Joe's Pub"));
    assert!(google.start_time.as_ref().is_some_and(DateValue::is_parsed));
    assert!(google.end_time.as_ref().is_some_and(DateValue::is_parsed));
}

// ============================================================================
// Atom 0.3
// ============================================================================

#[test]
fn test_atom_03_names() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed version="0.3" xmlns="http://purl.org/atom/ns#">
  <title>dive into mark</title>
  <tagline>A lot of effort went into making this effortless</tagline>
  <modified>2003-12-13T18:30:02Z</modified>
  <copyright>Copyright (c) 2003, Mark Pilgrim</copyright>
  <link rel="alternate" type="text/html" href="http://diveintomark.org/"/>
  <entry>
    <title>Atom 0.3 snapshot</title>
    <issued>2003-12-13T08:29:29-04:00</issued>
    <modified>2003-12-13T18:30:02Z</modified>
    <created>2003-12-13T18:30:02Z</created>
    <author><name>Mark Pilgrim</name><url>http://diveintomark.org/</url></author>
  </entry>
</feed>"#;

    let feed = parse(xml);
    assert_eq!(
        feed.subtitle.as_ref().map(|s| s.plain()),
        Some("A lot of effort went into making this effortless")
    );
    assert_eq!(feed.rights.as_deref(), Some("Copyright (c) 2003, Mark Pilgrim"));
    assert!(feed.updated.as_ref().is_some_and(DateValue::is_parsed));
    assert_eq!(feed.link(), Some("http://diveintomark.org/"));

    let entry = &feed.entries[0];
    assert!(entry.published.as_ref().is_some_and(DateValue::is_parsed));
    assert!(entry.updated.as_ref().is_some_and(DateValue::is_parsed));
    assert!(entry.created.as_ref().is_some_and(DateValue::is_parsed));
    assert_eq!(
        entry.author.as_ref().and_then(|a| a.uri.as_deref()),
        Some("http://diveintomark.org/")
    );
}

// ============================================================================
// Mixed content
// ============================================================================

fn entry_content(content: &str) -> syndication::MixedContent {
    let xml = format!("<feed><entry>{content}</entry></feed>");
    parse(&xml).entries.remove(0).content.expect("content")
}

#[test]
fn test_xhtml_wrapper_stripped_once() {
    let content = entry_content(
        r#"<content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><div>inner</div></div></content>"#,
    );
    assert_eq!(content.xhtml(), "<div>inner</div>");
}

#[test]
fn test_stripped_xhtml_reparses_unchanged() {
    let wrapped = [
        "<p><i>[Update: The Atom draft is finished.]</i></p>",
        "<p>a</p><div>b</div>",
        "<div>one</div><div>two</div>",
        "plain text &amp; <b>bold</b>",
    ];
    for body in wrapped {
        let first = entry_content(&format!(
            r#"<content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">{body}</div></content>"#
        ));
        let second = entry_content(&format!(
            r#"<content type="xhtml">{}</content>"#,
            first.xhtml()
        ));
        assert_eq!(second.xhtml(), first.xhtml(), "{body}");
        assert_eq!(first.xhtml(), body);
    }
}

#[test]
fn test_sibling_divs_not_unwrapped() {
    let content = entry_content(r#"<content type="xhtml"><div>a</div><div>b</div></content>"#);
    assert_eq!(content.xhtml(), "<div>a</div><div>b</div>");
}

#[test]
fn test_xhtml_text_reescaped() {
    let content = entry_content(
        r#"<content type="xhtml"><div><p>Fish &amp; Chips &lt;3</p></div></content>"#,
    );
    assert_eq!(content.xhtml(), "<p>Fish &amp; Chips &lt;3</p>");
    assert_eq!(content.plain(), "Fish & Chips <3");
}

#[test]
fn test_html_content_kept_as_markup() {
    let content = entry_content(
        r#"<content type="html">&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</content>"#,
    );
    assert_eq!(content.kind(), ContentKind::Html);
    assert_eq!(content.html(), "<p>Hello <b>world</b></p>");
    assert_eq!(content.plain(), "Hello world");
}

#[test]
fn test_text_content_escaped_for_html() {
    let content = entry_content("<content>AT&amp;T &lt;rocks&gt;</content>");
    assert_eq!(content.kind(), ContentKind::Text);
    assert_eq!(content.plain(), "AT&T <rocks>");
    assert_eq!(content.html(), "AT&amp;T &lt;rocks&gt;");
    assert_eq!(content.xhtml(), content.html());
}

#[test]
fn test_markup_inside_text_construct_not_parsed_as_nodes() {
    // An <entry> inside content must not become a second entry
    let xml = r#"<feed><entry><content type="xhtml"><div><entry>nested</entry></div></content>
        <id>outer</id></entry></feed>"#;
    let feed = parse(xml);
    assert_eq!(feed.entries.len(), 1);
    assert_eq!(feed.entries[0].id.as_deref(), Some("outer"));
    assert_eq!(
        feed.entries[0].content.as_ref().map(|c| c.xhtml()),
        Some("<entry>nested</entry>")
    );
}

// ============================================================================
// Recovery and output
// ============================================================================

#[test]
fn test_truncated_atom_recovers_in_tag_soup() {
    let xml = "<feed><title>Partial</title><entry><title>Cut";
    let mut parser = Parser::with_options(ParseOptions {
        mode: ParseMode::TagSoup,
        ..ParseOptions::default()
    });
    let feed = parser.parse(xml).unwrap();
    assert_eq!(feed.title.as_ref().map(|t| t.plain()), Some("Partial"));
    assert_eq!(feed.entries.len(), 1);
    assert_eq!(
        feed.entries[0].title.as_ref().map(|t| t.plain()),
        Some("Cut")
    );
}

#[test]
fn test_nested_source_chain_stays_flat() {
    // Unclosed <entry><source> pairs: fails strict, falls back to tag soup
    let xml = format!("<feed>{}", "<entry><source><title>s</title>".repeat(20_000));
    let feed = parse(&xml);

    assert!(!feed.entries.is_empty());
    assert!(feed.entries.len() <= ParseOptions::default().max_depth);
    for entry in &feed.entries {
        let source = entry.source.as_deref();
        assert!(source.map_or(true, |s| s.entries.is_empty()));
    }
    assert!(serde_json::to_string(&feed).is_ok());
}

#[test]
fn test_entries_inside_source_belong_to_feed() {
    let xml = r#"<feed><entry><id>1</id><source><id>src</id>
        <entry><id>2</id></entry></source></entry></feed>"#;
    let feed = parse(xml);
    let ids: Vec<_> = feed.entries.iter().map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("1"), Some("2")]);
    let source = feed.entries[0].source.as_deref().expect("source");
    assert_eq!(source.id.as_deref(), Some("src"));
    assert!(source.entries.is_empty());
}

#[test]
fn test_serialized_shape() {
    let feed = parse(RFC_4287);
    let json = serde_json::to_value(&feed).unwrap();

    assert_eq!(
        json["title"],
        serde_json::json!({"type": "text", "value": "dive into mark"})
    );
    assert_eq!(json["subtitle"]["type"], "html");
    assert_eq!(json["entries"][0]["content"]["type"], "xhtml");
    assert_eq!(json["links"][0]["type"], "text/html");
    assert_eq!(json["entries"][0]["google"]["where"], serde_json::Value::Null);
}
