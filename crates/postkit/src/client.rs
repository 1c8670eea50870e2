//! POST client implementation

use std::collections::HashMap;

use reqwest::blocking::{Client, Response};
use tracing::debug;

use crate::{
    config::HttpConfig,
    derive::DerivedConfig,
    error::Result,
    request::{self, ContentKind, PostOptions, RequestBody},
    response::{self, ResponseData, ResponseType, ResponseWrapper},
};

/// Caller-supplied request headers
pub type Headers = HashMap<String, String>;

/// Blocking POST client over one pooled transport client.
///
/// Per-call timeout and proxy overrides run on a client derived from this
/// one's configuration; the pooled client itself is never reconfigured, so a
/// `PostClient` can be shared freely between threads.
///
/// A derived client is built for each call that overrides the timeout or the
/// proxy, and it brings its own connection pool and runtime thread. Such a
/// call never reuses a pooled connection. Calls without overrides go through
/// the pooled client.
///
/// Only the converting operations are public. The raw response is kept
/// private so it can never escape unclosed, with the exception of
/// [`ResponseType::Stream`], whose [`response::BodyStream`] owns the
/// response until it is dropped.
pub struct PostClient {
    inner: Client,
    config: HttpConfig,
}

impl PostClient {
    /// Create a new POST client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let inner = DerivedConfig::shared(&config).build_client()?;
        Ok(Self { inner, config })
    }

    /// Create POST client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Get underlying pooled client (for requests this crate does not cover)
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Validate, build and execute a POST. The caller owns the returned response.
    fn send_post(
        &self,
        url: &str,
        kind: ContentKind,
        headers: Option<&Headers>,
        body: Option<RequestBody>,
        options: &PostOptions,
    ) -> Result<Response> {
        let prepared = request::prepare(url, kind, headers, body, options.timeout_ms)?;
        let derived = DerivedConfig::from_base(&self.config, prepared.timeout, options.proxy.as_ref());

        let derived_client;
        let client = if derived.is_overridden() {
            debug!(
                timeout = ?derived.timeout(),
                proxy = ?derived.proxy().map(|p| p.url.as_str()),
                "Using derived client for call"
            );
            derived_client = derived.build_client()?;
            &derived_client
        } else {
            &self.inner
        };

        debug!("HTTP POST ({}): {}", kind, prepared.url);
        let response = client
            .post(prepared.url)
            .headers(prepared.headers)
            .body(prepared.body)
            .send()?;
        debug!(status = response.status().as_u16(), "HTTP POST completed");

        Ok(response)
    }

    fn send_for_data(
        &self,
        url: &str,
        kind: ContentKind,
        headers: Option<&Headers>,
        body: RequestBody,
        target: ResponseType,
        options: &PostOptions,
    ) -> Result<Option<ResponseData>> {
        let response = self.send_post(url, kind, headers, Some(body), options)?;
        response::convert(target, response)
    }

    fn send_for_wrapper(
        &self,
        url: &str,
        kind: ContentKind,
        headers: Option<&Headers>,
        body: RequestBody,
        target: ResponseType,
        options: &PostOptions,
    ) -> Result<ResponseWrapper<ResponseData>> {
        let response = self.send_post(url, kind, headers, Some(body), options)?;
        let status_code = response.status().as_u16();
        let status_message = response::status_message(&response);
        let data = response::convert(target, response)?;

        Ok(ResponseWrapper {
            status_code,
            status_message,
            data,
        })
    }

    // JSON, converted body

    /// POST a JSON body and convert the response body into `target`
    pub fn send_post_by_json(
        &self,
        url: &str,
        headers: Option<&Headers>,
        json: impl Into<RequestBody>,
        target: ResponseType,
    ) -> Result<Option<ResponseData>> {
        self.send_post_by_json_with_options(url, headers, json, target, &PostOptions::default())
    }

    /// Like [`Self::send_post_by_json`] with a timeout in milliseconds (`-1` default, `0` none)
    pub fn send_post_by_json_with_timeout(
        &self,
        url: &str,
        headers: Option<&Headers>,
        json: impl Into<RequestBody>,
        target: ResponseType,
        timeout_ms: i64,
    ) -> Result<Option<ResponseData>> {
        let options = PostOptions::new().with_timeout_ms(timeout_ms);
        self.send_post_by_json_with_options(url, headers, json, target, &options)
    }

    /// Like [`Self::send_post_by_json`] with explicit timeout and proxy
    pub fn send_post_by_json_with_options(
        &self,
        url: &str,
        headers: Option<&Headers>,
        json: impl Into<RequestBody>,
        target: ResponseType,
        options: &PostOptions,
    ) -> Result<Option<ResponseData>> {
        self.send_for_data(url, ContentKind::Json, headers, json.into(), target, options)
    }

    // JSON, response wrapper

    /// POST a JSON body; return status code, status message and converted body
    pub fn send_post_by_json_for_response_wrapper(
        &self,
        url: &str,
        headers: Option<&Headers>,
        json: impl Into<RequestBody>,
        target: ResponseType,
    ) -> Result<ResponseWrapper<ResponseData>> {
        self.send_post_by_json_for_response_wrapper_with_options(
            url,
            headers,
            json,
            target,
            &PostOptions::default(),
        )
    }

    /// Like [`Self::send_post_by_json_for_response_wrapper`] with a timeout in milliseconds (`-1` default, `0` none)
    pub fn send_post_by_json_for_response_wrapper_with_timeout(
        &self,
        url: &str,
        headers: Option<&Headers>,
        json: impl Into<RequestBody>,
        target: ResponseType,
        timeout_ms: i64,
    ) -> Result<ResponseWrapper<ResponseData>> {
        let options = PostOptions::new().with_timeout_ms(timeout_ms);
        self.send_post_by_json_for_response_wrapper_with_options(url, headers, json, target, &options)
    }

    /// Like [`Self::send_post_by_json_for_response_wrapper`] with explicit timeout and proxy
    pub fn send_post_by_json_for_response_wrapper_with_options(
        &self,
        url: &str,
        headers: Option<&Headers>,
        json: impl Into<RequestBody>,
        target: ResponseType,
        options: &PostOptions,
    ) -> Result<ResponseWrapper<ResponseData>> {
        self.send_for_wrapper(url, ContentKind::Json, headers, json.into(), target, options)
    }

    // Form, converted body

    /// POST a URL-encoded form body and convert the response body into `target`
    pub fn send_post_by_form(
        &self,
        url: &str,
        headers: Option<&Headers>,
        form: impl Into<RequestBody>,
        target: ResponseType,
    ) -> Result<Option<ResponseData>> {
        self.send_post_by_form_with_options(url, headers, form, target, &PostOptions::default())
    }

    /// Like [`Self::send_post_by_form`] with a timeout in milliseconds (`-1` default, `0` none)
    pub fn send_post_by_form_with_timeout(
        &self,
        url: &str,
        headers: Option<&Headers>,
        form: impl Into<RequestBody>,
        target: ResponseType,
        timeout_ms: i64,
    ) -> Result<Option<ResponseData>> {
        let options = PostOptions::new().with_timeout_ms(timeout_ms);
        self.send_post_by_form_with_options(url, headers, form, target, &options)
    }

    /// Like [`Self::send_post_by_form`] with explicit timeout and proxy
    pub fn send_post_by_form_with_options(
        &self,
        url: &str,
        headers: Option<&Headers>,
        form: impl Into<RequestBody>,
        target: ResponseType,
        options: &PostOptions,
    ) -> Result<Option<ResponseData>> {
        self.send_for_data(url, ContentKind::Form, headers, form.into(), target, options)
    }

    // Form, response wrapper

    /// POST a URL-encoded form body; return status code, status message and converted body
    pub fn send_post_by_form_for_response_wrapper(
        &self,
        url: &str,
        headers: Option<&Headers>,
        form: impl Into<RequestBody>,
        target: ResponseType,
    ) -> Result<ResponseWrapper<ResponseData>> {
        self.send_post_by_form_for_response_wrapper_with_options(
            url,
            headers,
            form,
            target,
            &PostOptions::default(),
        )
    }

    /// Like [`Self::send_post_by_form_for_response_wrapper`] with a timeout in milliseconds (`-1` default, `0` none)
    pub fn send_post_by_form_for_response_wrapper_with_timeout(
        &self,
        url: &str,
        headers: Option<&Headers>,
        form: impl Into<RequestBody>,
        target: ResponseType,
        timeout_ms: i64,
    ) -> Result<ResponseWrapper<ResponseData>> {
        let options = PostOptions::new().with_timeout_ms(timeout_ms);
        self.send_post_by_form_for_response_wrapper_with_options(url, headers, form, target, &options)
    }

    /// Like [`Self::send_post_by_form_for_response_wrapper`] with explicit timeout and proxy
    pub fn send_post_by_form_for_response_wrapper_with_options(
        &self,
        url: &str,
        headers: Option<&Headers>,
        form: impl Into<RequestBody>,
        target: ResponseType,
        options: &PostOptions,
    ) -> Result<ResponseWrapper<ResponseData>> {
        self.send_for_wrapper(url, ContentKind::Form, headers, form.into(), target, options)
    }
}

impl std::fmt::Debug for PostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ProxySettings;
    use std::time::Duration;

    #[test]
    fn test_client_creation_with_defaults() {
        let client = PostClient::with_defaults();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_with_config() {
        let config = HttpConfig {
            timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        };

        let client = PostClient::new(config).unwrap();
        assert_eq!(client.config().timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_client_with_proxy() {
        let config = HttpConfig::default().with_proxy("http://proxy.example.com:8080");
        assert!(PostClient::new(config).is_ok());
    }

    #[test]
    fn test_blank_url_fails_before_io() {
        let client = PostClient::with_defaults().unwrap();
        let err = client
            .send_post_by_json("   ", None, "{}", ResponseType::Text)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_missing_body_fails_before_io() {
        let client = PostClient::with_defaults().unwrap();
        let err = client
            .send_post(
                "http://127.0.0.1:9/",
                ContentKind::Json,
                None,
                None,
                &PostOptions::default(),
            )
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_illegal_timeout_fails_before_io() {
        let client = PostClient::with_defaults().unwrap();
        let err = client
            .send_post_by_form_with_timeout("http://127.0.0.1:9/", None, "a=1", ResponseType::Text, -5)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_invalid_call_proxy_fails_before_io() {
        let client = PostClient::with_defaults().unwrap();
        let options = PostOptions::new().with_proxy(ProxySettings::new("ftp://proxy.example.com:21"));
        let err = client
            .send_post_by_json_with_options("http://127.0.0.1:9/", None, "{}", ResponseType::Text, &options)
            .unwrap_err();
        assert!(matches!(err, crate::HttpError::InvalidProxy(_)));
    }
}
