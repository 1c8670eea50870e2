//! POST request inputs and their validation

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use reqwest::blocking::Body;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use url::Url;

use crate::error::{HttpError, Result};

/// Timeout sentinel meaning "use the shared client's default"
pub const DEFAULT_TIMEOUT_MS: i64 = -1;

/// Kind of POST payload, which fixes the `Content-Type` header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

impl ContentKind {
    /// The content-type string sent for this kind
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.content_type())
    }
}

/// The body of a POST request.
///
/// Text and byte bodies are sent as-is; they are never re-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// Text, sent as UTF-8
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Contents of a file, opened when the request is prepared
    File(PathBuf),
    /// Immutable byte sequence
    ByteString(Bytes),
}

impl RequestBody {
    fn into_transport(self) -> Result<Body> {
        Ok(match self {
            Self::Text(text) => Body::from(text),
            Self::Bytes(bytes) => Body::from(bytes),
            Self::File(path) => Body::from(File::open(path)?),
            Self::ByteString(bytes) => Body::from(bytes),
        })
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for RequestBody {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Bytes> for RequestBody {
    fn from(value: Bytes) -> Self {
        Self::ByteString(value)
    }
}

impl From<PathBuf> for RequestBody {
    fn from(value: PathBuf) -> Self {
        Self::File(value)
    }
}

impl From<&Path> for RequestBody {
    fn from(value: &Path) -> Self {
        Self::File(value.to_path_buf())
    }
}

/// Validated per-call timeout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallTimeout {
    /// Keep the shared client's timeouts (`-1`)
    Default,
    /// No timeout at all (`0`)
    Unbounded,
    /// Connect, write and read all bounded by this duration (`> 0`)
    Bounded(Duration),
}

impl TryFrom<i64> for CallTimeout {
    type Error = HttpError;

    fn try_from(millis: i64) -> Result<Self> {
        match millis {
            DEFAULT_TIMEOUT_MS => Ok(Self::Default),
            0 => Ok(Self::Unbounded),
            m if m > 0 => Ok(Self::Bounded(Duration::from_millis(m as u64))),
            m => Err(HttpError::invalid_argument(format!(
                "illegal timeout: {m}ms (expected -1, 0 or a positive value)"
            ))),
        }
    }
}

/// Proxy address with optional Basic credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy URL, e.g. `http://proxy.example.com:8080`
    ///
    /// `http`, `https`, `socks5` and `socks5h` schemes are accepted. A SOCKS
    /// proxy reads its credentials from the URL userinfo.
    pub url: String,
    /// Proxy username
    pub username: Option<String>,
    /// Proxy password
    pub password: Option<String>,
}

impl ProxySettings {
    /// Proxy without credentials
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Attach Basic credentials
    ///
    /// The `Proxy-Authorization` header is sent up front on every proxied
    /// request, and on CONNECT for HTTPS targets. It goes out even when the
    /// proxy never answers with a 407 challenge.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Credentials, only when both username and password are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-call overrides; the default changes nothing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostOptions {
    /// Timeout in milliseconds: `-1` shared default, `0` none, `> 0` bound
    pub timeout_ms: i64,
    /// Proxy for this call only
    pub proxy: Option<ProxySettings>,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            proxy: None,
        }
    }
}

impl PostOptions {
    /// Options that keep every shared setting
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set proxy
    pub fn with_proxy(mut self, proxy: ProxySettings) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// A POST request that passed validation and is ready to dispatch
pub(crate) struct PreparedPost {
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Body,
    pub timeout: CallTimeout,
}

/// Validate the inputs and assemble the request, without any network I/O
pub(crate) fn prepare(
    url: &str,
    kind: ContentKind,
    headers: Option<&HashMap<String, String>>,
    body: Option<RequestBody>,
    timeout_ms: i64,
) -> Result<PreparedPost> {
    if url.trim().is_empty() {
        return Err(HttpError::invalid_argument("url is blank"));
    }
    let body = body.ok_or_else(|| HttpError::invalid_argument("The POST request must have a body"))?;
    let timeout = CallTimeout::try_from(timeout_ms)?;

    let parsed = Url::parse(url.trim())
        .map_err(|e| HttpError::invalid_argument(format!("invalid url {url:?}: {e}")))?;

    let body = body.into_transport()?;

    let mut header_map = HeaderMap::new();
    if let Some(headers) = headers {
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::invalid_argument(format!("invalid header name {name:?}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| HttpError::invalid_argument(format!("invalid value for header {name}: {e}")))?;
            header_map.append(header_name, header_value);
        }
    }
    // Set last so a caller-supplied Content-Type never wins
    header_map.insert(CONTENT_TYPE, HeaderValue::from_static(kind.content_type()));

    Ok(PreparedPost {
        url: parsed,
        headers: header_map,
        body,
        timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(body: &str) -> Option<RequestBody> {
        Some(RequestBody::from(body))
    }

    #[test]
    fn test_content_types() {
        assert_eq!(ContentKind::Json.content_type(), "application/json");
        assert_eq!(
            ContentKind::Form.content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_blank_url_rejected() {
        for url in ["", " ", "\t\n"] {
            let err = prepare(url, ContentKind::Json, None, text("{}"), -1).err().unwrap();
            assert!(err.is_invalid_argument(), "{url:?} should be rejected");
            assert!(err.to_string().contains("url is blank"));
        }
    }

    #[test]
    fn test_missing_body_rejected() {
        let err = prepare("http://localhost/", ContentKind::Form, None, None, -1)
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("must have a body"));
    }

    #[test]
    fn test_url_checked_before_body() {
        let err = prepare("", ContentKind::Json, None, None, -2).err().unwrap();
        assert!(err.to_string().contains("url is blank"));
    }

    #[test]
    fn test_timeout_sentinels() {
        assert_eq!(CallTimeout::try_from(-1).unwrap(), CallTimeout::Default);
        assert_eq!(CallTimeout::try_from(0).unwrap(), CallTimeout::Unbounded);
        assert_eq!(
            CallTimeout::try_from(1500).unwrap(),
            CallTimeout::Bounded(Duration::from_millis(1500))
        );
        assert!(CallTimeout::try_from(-2).unwrap_err().is_invalid_argument());
        assert!(CallTimeout::try_from(i64::MIN).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let err = prepare("not a url", ContentKind::Json, None, text("{}"), -1)
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_content_type_overrides_caller_header() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        headers.insert("X-Trace".to_string(), "abc".to_string());

        let prepared = prepare(
            "http://localhost/echo",
            ContentKind::Form,
            Some(&headers),
            text("a=1"),
            -1,
        )
        .unwrap();

        let values: Vec<_> = prepared.headers.get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec!["application/x-www-form-urlencoded"]);
        assert_eq!(prepared.headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        let err = prepare("http://localhost/", ContentKind::Json, Some(&headers), text("{}"), -1)
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_missing_file_body_is_io_error() {
        let body = Some(RequestBody::File(PathBuf::from("/nonexistent/postkit/body.json")));
        let err = prepare("http://localhost/", ContentKind::Json, None, body, -1)
            .err()
            .unwrap();
        assert!(matches!(err, HttpError::Io(_)));
    }

    #[test]
    fn test_proxy_credentials_need_both_parts() {
        let mut proxy = ProxySettings::new("http://proxy:8080");
        assert!(proxy.credentials().is_none());
        proxy.username = Some("user".to_string());
        assert!(proxy.credentials().is_none());
        let proxy = proxy.with_credentials("user", "pass");
        assert_eq!(proxy.credentials(), Some(("user", "pass")));
        assert!(!format!("{proxy:?}").contains("pass\""));
    }
}
