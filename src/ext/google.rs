use serde::Serialize;

use crate::source::Attributes;
use crate::util::DateValue;

/// Google Data event fields (`gd:where`, `gd:when`), as found in calendar
/// feeds.
///
/// Google never registered these with a namespace this crate knows, so
/// they match on the literal `gd:` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoogleData {
    #[serde(rename = "where")]
    pub location: Option<String>,
    pub start_time: Option<DateValue>,
    pub end_time: Option<DateValue>,
}

impl GoogleData {
    pub fn set_from_attrs(&mut self, field: &str, attrs: &Attributes) -> bool {
        match field {
            "gd:where" => {
                if let Some(value) = attrs.get("valueString") {
                    self.location = Some(value.to_string());
                }
                true
            }
            "gd:when" => {
                if let Some(start) = attrs.get("startTime") {
                    self.start_time = Some(DateValue::parse(start));
                }
                if let Some(end) = attrs.get("endTime") {
                    self.end_time = Some(DateValue::parse(end));
                }
                true
            }
            _ => false,
        }
    }
}
