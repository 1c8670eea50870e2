//! Response body conversion
//!
//! The requested representation is picked with [`ResponseType`]. Every
//! conversion except [`ResponseType::Stream`] reads what it needs and lets
//! the response drop before returning. A [`BodyStream`] instead takes
//! ownership of the response, so the connection stays open until the stream
//! is dropped.

use std::io::{self, Read};

use bytes::Bytes;
use reqwest::blocking::Response;

use crate::error::Result;

/// Target representation of a response body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Full body decoded as UTF-8 text
    Text,
    /// Full body as a byte buffer
    Bytes,
    /// Live, single-pass stream over the body
    Stream,
    /// Full body as an immutable byte sequence
    ByteString,
    /// No conversion; the converted body is absent
    Discard,
}

/// A converted response body
#[derive(Debug)]
pub enum ResponseData {
    Text(String),
    Bytes(Vec<u8>),
    Stream(BodyStream),
    ByteString(Bytes),
}

impl ResponseData {
    /// The text, if this is a [`ResponseData::Text`]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The bytes, if this is a [`ResponseData::Bytes`]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The stream, if this is a [`ResponseData::Stream`]
    pub fn into_stream(self) -> Option<BodyStream> {
        match self {
            Self::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// The byte sequence, if this is a [`ResponseData::ByteString`]
    pub fn into_byte_string(self) -> Option<Bytes> {
        match self {
            Self::ByteString(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Lazily consumed response body.
///
/// Owns the underlying response: dropping the stream closes it, whether or
/// not it was read to the end.
pub struct BodyStream {
    inner: Response,
}

impl BodyStream {
    /// Length announced by the server, if any
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }
}

impl Read for BodyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream")
            .field("status", &self.inner.status().as_u16())
            .field("content_length", &self.content_length())
            .finish()
    }
}

/// Status line plus converted body
#[derive(Debug)]
pub struct ResponseWrapper<T> {
    /// HTTP status code
    pub status_code: u16,
    /// HTTP status message
    pub status_message: String,
    /// Converted body, absent for [`ResponseType::Discard`]
    pub data: Option<T>,
}

impl<T> ResponseWrapper<T> {
    /// Check if the status code is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Map the converted body
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseWrapper<U> {
        ResponseWrapper {
            status_code: self.status_code,
            status_message: self.status_message,
            data: self.data.map(f),
        }
    }
}

/// Status message reported for a response
pub(crate) fn status_message(response: &Response) -> String {
    response
        .status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string()
}

/// Convert the body of `response` into `target`, consuming the response
pub(crate) fn convert(target: ResponseType, response: Response) -> Result<Option<ResponseData>> {
    let data = match target {
        ResponseType::Text => Some(ResponseData::Text(read_text(response)?)),
        ResponseType::Bytes => Some(ResponseData::Bytes(read_bytes(response)?.to_vec())),
        ResponseType::Stream => Some(ResponseData::Stream(BodyStream { inner: response })),
        ResponseType::ByteString => Some(ResponseData::ByteString(read_bytes(response)?)),
        ResponseType::Discard => None,
    };
    Ok(data)
}

fn read_text(response: Response) -> Result<String> {
    let bytes = read_bytes(response)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_bytes(response: Response) -> Result<Bytes> {
    Ok(response.bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(
            ResponseData::Text("ok".to_string()).into_text(),
            Some("ok".to_string())
        );
        assert_eq!(ResponseData::Text("ok".to_string()).into_bytes(), None);
        assert_eq!(
            ResponseData::ByteString(Bytes::from_static(b"ok")).into_byte_string(),
            Some(Bytes::from_static(b"ok"))
        );
        assert_eq!(ResponseData::Bytes(vec![1, 2]).into_bytes(), Some(vec![1, 2]));
    }

    #[test]
    fn test_wrapper_map_keeps_status() {
        let wrapper = ResponseWrapper {
            status_code: 201,
            status_message: "Created".to_string(),
            data: Some(ResponseData::Text("{}".to_string())),
        };
        assert!(wrapper.is_success());

        let mapped = wrapper.map(|data| data.into_text());
        assert_eq!(mapped.status_code, 201);
        assert_eq!(mapped.status_message, "Created");
        assert_eq!(mapped.data, Some(Some("{}".to_string())));
    }

    #[test]
    fn test_wrapper_failure_status() {
        let wrapper: ResponseWrapper<String> = ResponseWrapper {
            status_code: 404,
            status_message: "Not Found".to_string(),
            data: None,
        };
        assert!(!wrapper.is_success());
    }
}
