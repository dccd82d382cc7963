//! Shared helpers for field values.
//!
//! - **Dates**: "parse if possible, else keep the original string"
//! - **Text**: markup stripping, entity decoding and escaping used by the
//!   mixed-content projections
//!
//! # Examples
//!
//! ```
//! use syndication::util::{markup_to_plain, plain_to_html, DateValue};
//!
//! assert_eq!(markup_to_plain("<i>otters</i> &amp; seals"), "otters & seals");
//! assert_eq!(plain_to_html("a < b"), "a &lt; b");
//! assert!(DateValue::parse("2005-08-20T21:14:38Z").is_parsed());
//! ```

mod date;
mod text;

pub use date::DateValue;
pub use text::{decode_entities, markup_to_plain, plain_to_html};

pub(crate) use text::parse_number;
