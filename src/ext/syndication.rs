use serde::Serialize;

use super::put;
use crate::util::{parse_number, DateValue};

/// RSS 1.0 syndication module: how often the publisher updates the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Syndication {
    /// `hourly`, `daily`, `weekly`, `monthly` or `yearly`.
    pub update_period: Option<String>,
    pub update_frequency: Option<u32>,
    pub update_base: Option<DateValue>,
}

impl Syndication {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "sy:updateperiod" => put(&mut self.update_period, value),
            "sy:updatefrequency" => {
                self.update_frequency = parse_number(value);
                true
            }
            "sy:updatebase" => {
                self.update_base = Some(DateValue::parse(value));
                true
            }
            _ => false,
        }
    }
}
