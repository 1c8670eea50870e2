//! HTTP Basic credentials

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::HeaderValue;

use crate::error::{HttpError, Result};

/// Build a `Basic` authorization value for `username:password`
///
/// The value is marked sensitive so it is redacted from `Debug` output.
pub fn basic(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
