use serde::Serialize;

use super::put;

/// FeedBurner's pointer back to the original article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedburner {
    pub orig_link: Option<String>,
}

impl Feedburner {
    pub fn set_text(&mut self, field: &str, value: &str) -> bool {
        match field {
            "feedburner:origlink" => put(&mut self.orig_link, value),
            _ => false,
        }
    }
}
