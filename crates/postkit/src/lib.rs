//! Blocking HTTP POST helper over a shared, pooled client
//!
//! Sends JSON or form-encoded POST bodies and converts the response body into
//! text, bytes, a byte stream or an immutable byte sequence.
//!
//! ## Features
//!
//! - **One shared client**: a process-wide pooled client, see [`shared`]
//! - **Per-call overrides**: timeout and proxy (with Basic proxy credentials)
//!   applied to a derived configuration, never to the shared client
//! - **Scoped responses**: responses are closed before any operation returns,
//!   except for [`ResponseType::Stream`] whose [`BodyStream`] owns the
//!   response until dropped
//! - **Fail fast**: argument errors are raised before any network I/O
//!
//! Failures are returned unmodified and are never logged as errors here;
//! the caller owns logging and remediation. Only `debug!` traces are emitted.
//!
//! ```ignore
//! use postkit::{shared, PostOptions, ProxySettings, ResponseType};
//!
//! let options = PostOptions::new()
//!     .with_timeout_ms(30_000)
//!     .with_proxy(ProxySettings::new("http://proxy:8080").with_credentials("acc", "pwd"));
//! let wrapper = shared::send_post_by_form_for_response_wrapper_with_options(
//!     API_URL, Some(&headers), "a=1&b=2", ResponseType::Bytes, &options,
//! )?;
//! assert_eq!(wrapper.status_code, 200);
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod derive;
pub mod error;
pub mod request;
pub mod response;
pub mod shared;

pub use client::{Headers, PostClient};
pub use config::HttpConfig;
pub use derive::DerivedConfig;
pub use error::{HttpError, Result};
pub use request::{CallTimeout, ContentKind, PostOptions, ProxySettings, RequestBody, DEFAULT_TIMEOUT_MS};
pub use response::{BodyStream, ResponseData, ResponseType, ResponseWrapper};
pub use shared::{init_shared, shared};

/// Re-export commonly used types
pub use bytes::Bytes;
pub use reqwest::StatusCode;
