//! Process-wide shared client and the static helper functions
//!
//! The shared [`PostClient`] is created once, either explicitly through
//! [`init_shared`] at startup or lazily with [`HttpConfig::default`] on first
//! use, and lives until the process exits. It is never replaced.
//!
//! ```ignore
//! use postkit::{shared, ResponseType};
//!
//! let body = shared::send_post_by_json(API_URL, None, r#"{"id":1}"#, ResponseType::Text)?
//!     .and_then(|data| data.into_text());
//! ```

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    client::{Headers, PostClient},
    config::HttpConfig,
    error::{HttpError, Result},
    request::{PostOptions, RequestBody},
    response::{ResponseData, ResponseType, ResponseWrapper},
};

static SHARED_CLIENT: OnceCell<PostClient> = OnceCell::new();

/// Install the shared client with `config`
///
/// Fails with [`HttpError::AlreadyInitialized`] once a shared client exists,
/// including one created lazily by [`shared`].
pub fn init_shared(config: HttpConfig) -> Result<&'static PostClient> {
    let mut created = false;
    let client = SHARED_CLIENT.get_or_try_init(|| {
        created = true;
        PostClient::new(config)
    })?;
    if !created {
        return Err(HttpError::AlreadyInitialized);
    }
    debug!(config = ?client.config(), "Shared HTTP client initialized");
    Ok(client)
}

/// Get the shared client, creating it with default configuration if needed
pub fn shared() -> Result<&'static PostClient> {
    SHARED_CLIENT.get_or_try_init(PostClient::with_defaults)
}

/// See [`PostClient::send_post_by_json`]
pub fn send_post_by_json(
    url: &str,
    headers: Option<&Headers>,
    json: impl Into<RequestBody>,
    target: ResponseType,
) -> Result<Option<ResponseData>> {
    shared()?.send_post_by_json(url, headers, json, target)
}

/// See [`PostClient::send_post_by_json_with_timeout`]
pub fn send_post_by_json_with_timeout(
    url: &str,
    headers: Option<&Headers>,
    json: impl Into<RequestBody>,
    target: ResponseType,
    timeout_ms: i64,
) -> Result<Option<ResponseData>> {
    shared()?.send_post_by_json_with_timeout(url, headers, json, target, timeout_ms)
}

/// See [`PostClient::send_post_by_json_with_options`]
pub fn send_post_by_json_with_options(
    url: &str,
    headers: Option<&Headers>,
    json: impl Into<RequestBody>,
    target: ResponseType,
    options: &PostOptions,
) -> Result<Option<ResponseData>> {
    shared()?.send_post_by_json_with_options(url, headers, json, target, options)
}

/// See [`PostClient::send_post_by_json_for_response_wrapper`]
pub fn send_post_by_json_for_response_wrapper(
    url: &str,
    headers: Option<&Headers>,
    json: impl Into<RequestBody>,
    target: ResponseType,
) -> Result<ResponseWrapper<ResponseData>> {
    shared()?.send_post_by_json_for_response_wrapper(url, headers, json, target)
}

/// See [`PostClient::send_post_by_json_for_response_wrapper_with_timeout`]
pub fn send_post_by_json_for_response_wrapper_with_timeout(
    url: &str,
    headers: Option<&Headers>,
    json: impl Into<RequestBody>,
    target: ResponseType,
    timeout_ms: i64,
) -> Result<ResponseWrapper<ResponseData>> {
    shared()?.send_post_by_json_for_response_wrapper_with_timeout(url, headers, json, target, timeout_ms)
}

/// See [`PostClient::send_post_by_json_for_response_wrapper_with_options`]
pub fn send_post_by_json_for_response_wrapper_with_options(
    url: &str,
    headers: Option<&Headers>,
    json: impl Into<RequestBody>,
    target: ResponseType,
    options: &PostOptions,
) -> Result<ResponseWrapper<ResponseData>> {
    shared()?.send_post_by_json_for_response_wrapper_with_options(url, headers, json, target, options)
}

/// See [`PostClient::send_post_by_form`]
pub fn send_post_by_form(
    url: &str,
    headers: Option<&Headers>,
    form: impl Into<RequestBody>,
    target: ResponseType,
) -> Result<Option<ResponseData>> {
    shared()?.send_post_by_form(url, headers, form, target)
}

/// See [`PostClient::send_post_by_form_with_timeout`]
pub fn send_post_by_form_with_timeout(
    url: &str,
    headers: Option<&Headers>,
    form: impl Into<RequestBody>,
    target: ResponseType,
    timeout_ms: i64,
) -> Result<Option<ResponseData>> {
    shared()?.send_post_by_form_with_timeout(url, headers, form, target, timeout_ms)
}

/// See [`PostClient::send_post_by_form_with_options`]
pub fn send_post_by_form_with_options(
    url: &str,
    headers: Option<&Headers>,
    form: impl Into<RequestBody>,
    target: ResponseType,
    options: &PostOptions,
) -> Result<Option<ResponseData>> {
    shared()?.send_post_by_form_with_options(url, headers, form, target, options)
}

/// See [`PostClient::send_post_by_form_for_response_wrapper`]
pub fn send_post_by_form_for_response_wrapper(
    url: &str,
    headers: Option<&Headers>,
    form: impl Into<RequestBody>,
    target: ResponseType,
) -> Result<ResponseWrapper<ResponseData>> {
    shared()?.send_post_by_form_for_response_wrapper(url, headers, form, target)
}

/// See [`PostClient::send_post_by_form_for_response_wrapper_with_timeout`]
pub fn send_post_by_form_for_response_wrapper_with_timeout(
    url: &str,
    headers: Option<&Headers>,
    form: impl Into<RequestBody>,
    target: ResponseType,
    timeout_ms: i64,
) -> Result<ResponseWrapper<ResponseData>> {
    shared()?.send_post_by_form_for_response_wrapper_with_timeout(url, headers, form, target, timeout_ms)
}

/// See [`PostClient::send_post_by_form_for_response_wrapper_with_options`]
pub fn send_post_by_form_for_response_wrapper_with_options(
    url: &str,
    headers: Option<&Headers>,
    form: impl Into<RequestBody>,
    target: ResponseType,
    options: &PostOptions,
) -> Result<ResponseWrapper<ResponseData>> {
    shared()?.send_post_by_form_for_response_wrapper_with_options(url, headers, form, target, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_is_a_single_instance() {
        let first = shared().unwrap();
        let second = shared().unwrap();
        assert!(std::ptr::eq(first, second));

        // Already created lazily above
        let err = init_shared(HttpConfig::fast()).unwrap_err();
        assert!(matches!(err, HttpError::AlreadyInitialized));
        assert!(std::ptr::eq(shared().unwrap(), first));
    }

    #[test]
    fn test_helpers_validate_before_io() {
        let err = send_post_by_form("", None, "a=1", ResponseType::Text).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = send_post_by_json_with_timeout("http://127.0.0.1:9/", None, "{}", ResponseType::Text, -2)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
