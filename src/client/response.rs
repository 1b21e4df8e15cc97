use tracing::warn;

use super::error::ApiError;
use super::http::HttpResponse;
use crate::domain::ApiResponse;
use crate::transport::{TransportError, decode_error_body};

const CLIENT_ERROR: u16 = 4;
const SERVER_ERROR: u16 = 5;

fn status_message(status: u16) -> String {
    format!("HTTP status code {status}")
}

/// Turn a raw response into a success carrying the body, or a typed error.
pub(crate) fn classify(response: HttpResponse) -> Result<ApiResponse<Vec<u8>>, ApiError> {
    let status = response.status;
    if (200..300).contains(&status) {
        return Ok(ApiResponse::new(status, response.body));
    }

    let error = match status / 100 {
        CLIENT_ERROR => match decode_error_body(&response.body) {
            Ok(body) => ApiError::Client {
                status,
                reason: body.message.unwrap_or_else(|| status_message(status)),
                details: body.details,
            },
            Err(_) => ApiError::Client {
                status,
                reason: status_message(status),
                details: vec![status_message(status)],
            },
        },
        SERVER_ERROR => ApiError::Server {
            status,
            message: status_message(status),
        },
        _ => ApiError::HttpStatus { status },
    };
    warn!(status, error = %error, "request failed");
    Err(error)
}

/// Decode the body of a successful response; an empty body is a parse error.
pub(crate) fn decode_payload<T>(
    response: ApiResponse<Vec<u8>>,
    decode: impl FnOnce(&[u8]) -> Result<T, TransportError>,
) -> Result<ApiResponse<T>, ApiError> {
    if response.payload.is_empty() {
        return Err(ApiError::Parse("response body is empty".into()));
    }
    let payload = decode(&response.payload).map_err(|err| ApiError::Parse(Box::new(err)))?;
    Ok(ApiResponse::new(response.status, payload))
}

/// Decode the body when the gateway sent one in the expected shape.
pub(crate) fn decode_optional_payload<T>(
    response: ApiResponse<Vec<u8>>,
    decode: impl FnOnce(&[u8]) -> Result<T, TransportError>,
) -> ApiResponse<Option<T>> {
    response.map(|body| decode(&body).ok())
}
