use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use serde::Serialize;

use super::error::ApiError;
use super::http::{HttpRequest, HttpResponse};
use super::RestApiClient;
use crate::transport::TransportError;

pub(crate) const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Characters allowed in a path segment (RFC 3986 `pchar`) stay as-is in substituted
/// values; everything else, `/` included, is percent-encoded.
static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Assembles one request against the client's endpoint.
///
/// Nothing is sent until [`RequestBuilder::execute`]; a path that still contains a
/// `{variable}` placeholder at that point is rejected before any I/O.
pub(crate) struct RequestBuilder<'a> {
    client: &'a RestApiClient,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Result<Option<Vec<u8>>, ApiError>,
    invalid_path_variable: Option<(String, String)>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(client: &'a RestApiClient, method: Method, path: impl Into<String>) -> Self {
        Self {
            client,
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Ok(None),
            invalid_path_variable: None,
        }
    }

    /// Replace every `{name}` in the path with the percent-encoded `value`.
    ///
    /// `""`, `.` and `..` would change which resource the path names, so they fail the
    /// request at [`RequestBuilder::build`].
    pub fn path_variable(mut self, name: &str, value: &str) -> Self {
        if matches!(value, "" | "." | "..") {
            self.invalid_path_variable
                .get_or_insert_with(|| (name.to_owned(), value.to_owned()));
            return self;
        }
        let encoded = utf8_percent_encode(value, &PATH_SEGMENT_ENCODE_SET).to_string();
        self.path = self.path.replace(&format!("{{{name}}}"), &encoded);
        self
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set a header, replacing any previous value with the same (case-insensitive) name.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Ok(Some(body.into()));
        self
    }

    pub fn body_str(self, body: &str) -> Self {
        self.body(body.as_bytes())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.body = serde_json::to_vec(value)
            .map(Some)
            .map_err(|err| ApiError::Serialization(Box::new(err)));
        self
    }

    /// Attach a body produced by one of the transport encoders.
    pub fn encoded(mut self, body: Result<Vec<u8>, TransportError>) -> Self {
        self.body = body
            .map(Some)
            .map_err(|err| ApiError::Serialization(Box::new(err)));
        self
    }

    /// Resolve the request into its unsigned wire form.
    pub fn build(self) -> Result<HttpRequest, ApiError> {
        if let Some((name, value)) = self.invalid_path_variable {
            return Err(ApiError::InvalidPathVariable { name, value });
        }
        if self.path.contains(['{', '}']) {
            return Err(ApiError::UnresolvedPath { path: self.path });
        }
        let body = self.body?;

        let mut url = self.client.endpoint().clone();
        url.set_path(&self.path);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let mut headers = self.headers;
        if body.is_some()
            && !headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER))
        {
            headers.push((CONTENT_TYPE_HEADER.to_owned(), JSON_CONTENT_TYPE.to_owned()));
        }

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }

    pub async fn execute(self) -> Result<HttpResponse, ApiError> {
        let client = self.client;
        let request = self.build()?;
        client.execute(request).await
    }
}
