use std::error::Error as StdError;

use super::context::ContextError;
use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`RestApiClient`](crate::RestApiClient) and its messaging operations.
///
/// The status-code family (`Client`, `Server`, `HttpStatus`) always carries the HTTP
/// status; see [`ApiError::status_code`].
pub enum ApiError {
    /// Transport failure: DNS, TLS, connect or read timeout, broken connection.
    #[error("communication error: {0}")]
    Communication(#[source] Box<dyn StdError + Send + Sync>),

    /// The request body could not be encoded.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] Box<dyn StdError + Send + Sync>),

    /// A successful response body could not be decoded into the expected payload.
    #[error("could not parse response: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured endpoint is not an absolute URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// A path variable value that does not name a single path segment (`""`, `.`, `..`).
    #[error("invalid value {value:?} for path variable {name}")]
    InvalidPathVariable { name: String, value: String },

    /// A `{variable}` placeholder was left in the request path.
    #[error("path variables unresolved, current path is {path}")]
    UnresolvedPath { path: String },

    /// 4xx response.
    #[error("{reason}")]
    Client {
        status: u16,
        reason: String,
        details: Vec<String>,
    },

    /// 5xx response.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Any other non-2xx response.
    #[error("HTTP status code {status}")]
    HttpStatus { status: u16 },

    /// A single-message send did not come back with exactly one message.
    #[error("received {count} messages in the body response, expected exactly one")]
    UnexpectedMessageCount { count: usize },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } | Self::HttpStatus { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Detail lines of a client error; empty for every other variant.
    pub fn details(&self) -> &[String] {
        match self {
            Self::Client { details, .. } => details,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_is_exposed_for_http_family_only() {
        let client = ApiError::Client {
            status: 400,
            reason: "Invalid request".to_owned(),
            details: vec!["content: may not be empty".to_owned()],
        };
        assert_eq!(client.status_code(), Some(400));
        assert_eq!(client.details(), ["content: may not be empty".to_owned()]);
        assert_eq!(client.to_string(), "Invalid request");

        let server = ApiError::Server {
            status: 503,
            message: "HTTP status code 503".to_owned(),
        };
        assert_eq!(server.status_code(), Some(503));
        assert!(server.details().is_empty());

        assert_eq!(ApiError::HttpStatus { status: 302 }.status_code(), Some(302));
        assert_eq!(
            ApiError::UnresolvedPath {
                path: "/v1/messages/{messageId}".to_owned()
            }
            .status_code(),
            None
        );
    }
}
