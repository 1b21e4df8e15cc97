use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::validation::ValidationError;
use crate::domain::value::MessageStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Successful result of an API call: the HTTP status plus the decoded payload.
pub struct ApiResponse<T> {
    pub status: u16,
    pub payload: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, payload: T) -> Self {
        Self { status, payload }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            payload: f(self.payload),
        }
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

fn require_non_empty(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::Empty { field }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Handset-level delivery outcome of a previously sent message.
pub struct DeliveryReport {
    delivery_report_id: String,
    message_id: String,
    source_number: String,
    date_received: DateTime<Utc>,
    delay: Option<i64>,
    status: MessageStatus,
    metadata: BTreeMap<String, String>,
}

/// Raw attributes of a [`DeliveryReport`] before validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeliveryReportParts {
    pub delivery_report_id: Option<String>,
    pub message_id: Option<String>,
    pub source_number: Option<String>,
    pub date_received: Option<DateTime<Utc>>,
    pub delay: Option<i64>,
    pub status: Option<MessageStatus>,
    pub metadata: Option<BTreeMap<String, String>>,
}

impl DeliveryReport {
    pub(crate) fn from_parts(parts: DeliveryReportParts) -> Result<Self, ValidationError> {
        Ok(Self {
            delivery_report_id: require_non_empty(parts.delivery_report_id, "delivery_report_id")?,
            message_id: require_non_empty(parts.message_id, "message_id")?,
            source_number: require_non_empty(parts.source_number, "source_number")?,
            status: parts.status.ok_or(ValidationError::Missing {
                field: MessageStatus::FIELD,
            })?,
            date_received: parts.date_received.ok_or(ValidationError::Missing {
                field: "date_received",
            })?,
            delay: parts.delay,
            metadata: parts.metadata.unwrap_or_default(),
        })
    }

    pub fn delivery_report_id(&self) -> &str {
        &self.delivery_report_id
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Handset the report originates from.
    pub fn source_number(&self) -> &str {
        &self.source_number
    }

    pub fn date_received(&self) -> DateTime<Utc> {
        self.date_received
    }

    /// Delivery delay in milliseconds, when the gateway reports one.
    pub fn delay(&self) -> Option<i64> {
        self.delay
    }

    pub fn status(&self) -> &MessageStatus {
        &self.status
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Up to 100 of the oldest unconfirmed delivery reports.
pub struct DeliveryReportList {
    pub delivery_reports: Vec<DeliveryReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inbound message from a handset.
pub struct Reply {
    reply_id: String,
    content: String,
    source_number: String,
    destination_number: Option<String>,
    message_id: Option<String>,
    date_received: DateTime<Utc>,
    metadata: BTreeMap<String, String>,
}

/// Raw attributes of a [`Reply`] before validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReplyParts {
    pub reply_id: Option<String>,
    pub content: Option<String>,
    pub source_number: Option<String>,
    pub destination_number: Option<String>,
    pub message_id: Option<String>,
    pub date_received: Option<DateTime<Utc>>,
    pub metadata: Option<BTreeMap<String, String>>,
}

impl Reply {
    pub(crate) fn from_parts(parts: ReplyParts) -> Result<Self, ValidationError> {
        Ok(Self {
            content: parts.content.ok_or(ValidationError::Missing { field: "content" })?,
            reply_id: require_non_empty(parts.reply_id, "reply_id")?,
            source_number: require_non_empty(parts.source_number, "source_number")?,
            date_received: parts.date_received.ok_or(ValidationError::Missing {
                field: "date_received",
            })?,
            destination_number: parts.destination_number,
            message_id: parts.message_id,
            metadata: parts.metadata.unwrap_or_default(),
        })
    }

    pub fn reply_id(&self) -> &str {
        &self.reply_id
    }

    /// Reply text; may be empty.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source_number(&self) -> &str {
        &self.source_number
    }

    /// `None` when the gateway could not match the reply to a number.
    pub fn destination_number(&self) -> Option<&str> {
        self.destination_number.as_deref()
    }

    /// `None` for unsolicited replies.
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn date_received(&self) -> DateTime<Utc> {
        self.date_received
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Up to 100 of the oldest unconfirmed replies.
pub struct ReplyList {
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmationResultItem {
    id: String,
    confirmed: bool,
}

impl ConfirmationResultItem {
    pub(crate) fn new(
        id: Option<String>,
        confirmed: Option<bool>,
        id_field: &'static str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_non_empty(id, id_field)?,
            confirmed: confirmed.ok_or(ValidationError::Missing { field: "confirmed" })?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Per-id outcome of a confirmation request, when the gateway returns one.
pub struct ConfirmationResult {
    pub items: Vec<ConfirmationResultItem>,
    pub message: Option<String>,
    pub details: Vec<String>,
}

impl ConfirmationResult {
    /// Ids the gateway refused to confirm.
    pub fn unconfirmed_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|item| !item.confirmed)
            .map(ConfirmationResultItem::id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn received() -> DateTime<Utc> {
        Utc.timestamp_opt(1_318_248_000, 0).unwrap()
    }

    fn report_parts() -> DeliveryReportParts {
        DeliveryReportParts {
            delivery_report_id: Some("dr-1".to_owned()),
            message_id: Some("m-1".to_owned()),
            source_number: Some("+61491570156".to_owned()),
            date_received: Some(received()),
            delay: Some(250),
            status: Some(MessageStatus::Delivered),
            metadata: None,
        }
    }

    #[test]
    fn delivery_report_requires_every_mandatory_field() {
        let report = DeliveryReport::from_parts(report_parts()).unwrap();
        assert_eq!(report.delivery_report_id(), "dr-1");
        assert_eq!(report.delay(), Some(250));
        assert!(report.metadata().is_empty());

        let err = DeliveryReport::from_parts(DeliveryReportParts {
            status: None,
            ..report_parts()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "status" });

        let err = DeliveryReport::from_parts(DeliveryReportParts {
            source_number: Some(String::new()),
            ..report_parts()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "source_number" });

        let err = DeliveryReport::from_parts(DeliveryReportParts {
            date_received: None,
            ..report_parts()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "date_received" });
    }

    #[test]
    fn reply_allows_empty_content_and_missing_correlation() {
        let reply = Reply::from_parts(ReplyParts {
            reply_id: Some("r-1".to_owned()),
            content: Some(String::new()),
            source_number: Some("+61491570156".to_owned()),
            date_received: Some(received()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(reply.content(), "");
        assert!(reply.message_id().is_none());
        assert!(reply.destination_number().is_none());

        let err = Reply::from_parts(ReplyParts {
            reply_id: Some("r-1".to_owned()),
            source_number: Some("+61491570156".to_owned()),
            date_received: Some(received()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "content" });
    }

    #[test]
    fn confirmation_items_require_id_and_flag() {
        assert!(ConfirmationResultItem::new(None, Some(true), "reply_id").is_err());
        assert!(ConfirmationResultItem::new(Some("r-1".to_owned()), None, "reply_id").is_err());

        let result = ConfirmationResult {
            items: vec![
                ConfirmationResultItem::new(Some("a".to_owned()), Some(true), "reply_id").unwrap(),
                ConfirmationResultItem::new(Some("b".to_owned()), Some(false), "reply_id").unwrap(),
            ],
            ..Default::default()
        };
        assert_eq!(result.unconfirmed_ids().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn api_response_map_keeps_status() {
        let response = ApiResponse::new(202, vec![1, 2, 3]).map(|v| v.len());
        assert_eq!(response, ApiResponse::new(202, 3));
    }
}
