use serde::Serialize;

use super::put;
use crate::util::DateValue;

/// The fifteen Dublin Core elements, plus the DC terms dates feeds use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DublinCore {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub contributor: Option<String>,
    pub date: Option<DateValue>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
    pub identifier: Option<String>,
    pub source: Option<String>,
    pub language: Option<String>,
    pub relation: Option<String>,
    pub coverage: Option<String>,
    pub rights: Option<String>,
    pub created: Option<DateValue>,
    pub issued: Option<DateValue>,
    pub modified: Option<DateValue>,
}

impl DublinCore {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "dc:title" => put(&mut self.title, value),
            "dc:creator" => put(&mut self.creator, value),
            "dc:subject" => put(&mut self.subject, value),
            "dc:description" => put(&mut self.description, value),
            "dc:publisher" => put(&mut self.publisher, value),
            "dc:contributor" => put(&mut self.contributor, value),
            "dc:date" => set_date(&mut self.date, value),
            "dc:type" => put(&mut self.kind, value),
            "dc:format" => put(&mut self.format, value),
            "dc:identifier" => put(&mut self.identifier, value),
            "dc:source" => put(&mut self.source, value),
            "dc:language" => put(&mut self.language, value),
            "dc:relation" => put(&mut self.relation, value),
            "dc:coverage" => put(&mut self.coverage, value),
            "dc:rights" => put(&mut self.rights, value),
            "dcterms:created" => set_date(&mut self.created, value),
            "dcterms:issued" => set_date(&mut self.issued, value),
            "dcterms:modified" => set_date(&mut self.modified, value),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn set_date(slot: &mut Option<DateValue>, value: &str) -> bool {
    *slot = Some(DateValue::parse(value));
    true
}
