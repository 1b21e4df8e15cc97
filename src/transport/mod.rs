//! Transport layer: wire-format details (JSON bodies and timestamps).

mod confirmation;
mod delivery_reports;
mod error_body;
mod messages;
mod replies;
mod timestamp;

use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid payload: {0}")]
    Validation(#[from] ValidationError),
}

pub use delivery_reports::{
    decode_delivery_report_confirmation_result, decode_delivery_report_list,
    encode_delivery_report_confirmation,
};
pub use error_body::decode_error_body;
pub use messages::{decode_message, decode_message_list, decode_messages, encode_message_list};
pub use replies::{decode_reply_confirmation_result, decode_reply_list, encode_reply_confirmation};
