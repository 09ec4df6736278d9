// src/models/mod.rs

pub mod avatar;
pub mod category;
pub mod question;

use url::Url;

/// Returns true when `value` parses as an absolute URL.
pub(crate) fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}
