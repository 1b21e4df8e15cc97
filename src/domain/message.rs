use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::validation::ValidationError;
use crate::domain::value::{AddressType, MessageFormat, MessageStatus};

/// Maximum message content length, in characters.
pub const MAX_CONTENT_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An outbound message, either built by the caller or returned by the gateway.
///
/// A message built through [`MessageBuilder`] has no id and no status. A message
/// read from a gateway response always has both.
pub struct Message {
    content: String,
    destination_number: String,
    callback_url: Option<String>,
    delivery_report: bool,
    format: MessageFormat,
    source_number: Option<String>,
    source_number_type: Option<AddressType>,
    scheduled: Option<DateTime<Utc>>,
    message_expiry_timestamp: Option<DateTime<Utc>>,
    metadata: BTreeMap<String, String>,
    message_id: Option<String>,
    status: Option<MessageStatus>,
    status_reason: Option<String>,
}

impl Message {
    pub const CONTENT_FIELD: &'static str = "content";
    pub const DESTINATION_NUMBER_FIELD: &'static str = "destination_number";
    pub const MESSAGE_ID_FIELD: &'static str = "message_id";

    /// Start building a message to send.
    pub fn builder(content: impl Into<String>, destination_number: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(content, destination_number)
    }

    /// Materialize a message returned by the gateway.
    ///
    /// Runs the same checks as [`MessageBuilder::build`] and additionally requires a
    /// non-empty message id and a status.
    pub(crate) fn from_server(
        fields: MessageBuilder,
        message_id: Option<String>,
        status: Option<MessageStatus>,
        status_reason: Option<String>,
    ) -> Result<Self, ValidationError> {
        let mut message = fields.build()?;
        let message_id = message_id.ok_or(ValidationError::Empty {
            field: Self::MESSAGE_ID_FIELD,
        })?;
        if message_id.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::MESSAGE_ID_FIELD,
            });
        }
        let status = status.ok_or(ValidationError::Missing {
            field: MessageStatus::FIELD,
        })?;

        message.message_id = Some(message_id);
        message.status = Some(status);
        message.status_reason = status_reason;
        Ok(message)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn destination_number(&self) -> &str {
        &self.destination_number
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    /// Whether a delivery report was requested for this message.
    pub fn delivery_report(&self) -> bool {
        self.delivery_report
    }

    pub fn format(&self) -> MessageFormat {
        self.format
    }

    pub fn source_number(&self) -> Option<&str> {
        self.source_number.as_deref()
    }

    pub fn source_number_type(&self) -> Option<AddressType> {
        self.source_number_type
    }

    pub fn scheduled(&self) -> Option<DateTime<Utc>> {
        self.scheduled
    }

    pub fn message_expiry_timestamp(&self) -> Option<DateTime<Utc>> {
        self.message_expiry_timestamp
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Gateway-assigned id; `None` until the message has been sent.
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Gateway-reported status; `None` until the message has been sent.
    pub fn status(&self) -> Option<&MessageStatus> {
        self.status.as_ref()
    }

    pub fn status_reason(&self) -> Option<&str> {
        self.status_reason.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
/// Collects the attributes of a [`Message`]; validation happens in [`MessageBuilder::build`].
pub struct MessageBuilder {
    content: String,
    destination_number: String,
    callback_url: Option<String>,
    delivery_report: bool,
    format: Option<MessageFormat>,
    source_number: Option<String>,
    source_number_type: Option<AddressType>,
    scheduled: Option<DateTime<Utc>>,
    message_expiry_timestamp: Option<DateTime<Utc>>,
    metadata: BTreeMap<String, String>,
}

impl MessageBuilder {
    pub fn new(content: impl Into<String>, destination_number: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            destination_number: destination_number.into(),
            ..Default::default()
        }
    }

    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn delivery_report(mut self, delivery_report: bool) -> Self {
        self.delivery_report = delivery_report;
        self
    }

    pub fn format(mut self, format: MessageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn source_number(mut self, source_number: impl Into<String>) -> Self {
        self.source_number = Some(source_number.into());
        self
    }

    pub fn source_number_type(mut self, source_number_type: AddressType) -> Self {
        self.source_number_type = Some(source_number_type);
        self
    }

    /// Schedule delivery; the instant is stored in UTC.
    pub fn scheduled<Tz: TimeZone>(mut self, scheduled: DateTime<Tz>) -> Self {
        self.scheduled = Some(scheduled.with_timezone(&Utc));
        self
    }

    /// Stop delivery attempts after this instant; stored in UTC.
    pub fn message_expiry_timestamp<Tz: TimeZone>(mut self, expiry: DateTime<Tz>) -> Self {
        self.message_expiry_timestamp = Some(expiry.with_timezone(&Utc));
        self
    }

    pub fn metadata_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Replace all metadata collected so far.
    pub fn metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validate and freeze the message.
    ///
    /// Errors:
    /// - [`ValidationError::ContentTooLong`] when the content exceeds [`MAX_CONTENT_LENGTH`] characters,
    /// - [`ValidationError::Empty`] when the destination number is empty.
    pub fn build(self) -> Result<Message, ValidationError> {
        let length = self.content.chars().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(ValidationError::ContentTooLong {
                max: MAX_CONTENT_LENGTH,
                actual: length,
            });
        }
        if self.destination_number.is_empty() {
            return Err(ValidationError::Empty {
                field: Message::DESTINATION_NUMBER_FIELD,
            });
        }

        Ok(Message {
            content: self.content,
            destination_number: self.destination_number,
            callback_url: self.callback_url,
            delivery_report: self.delivery_report,
            format: self.format.unwrap_or_default(),
            source_number: self.source_number,
            source_number_type: self.source_number_type,
            scheduled: self.scheduled,
            message_expiry_timestamp: self.message_expiry_timestamp,
            metadata: self.metadata,
            message_id: None,
            status: None,
            status_reason: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let message = Message::builder("hello", "+61491570156").build().unwrap();
        assert_eq!(message.content(), "hello");
        assert_eq!(message.destination_number(), "+61491570156");
        assert!(!message.delivery_report());
        assert_eq!(message.format(), MessageFormat::Sms);
        assert!(message.metadata().is_empty());
        assert!(message.message_id().is_none());
        assert!(message.status().is_none());
        assert!(message.status_reason().is_none());
    }

    #[test]
    fn content_length_is_counted_in_characters() {
        let at_limit = "é".repeat(MAX_CONTENT_LENGTH);
        assert!(Message::builder(at_limit, "123").build().is_ok());

        let over = "a".repeat(MAX_CONTENT_LENGTH + 1);
        let err = Message::builder(over, "123").build().unwrap_err();
        assert_eq!(
            err,
            ValidationError::ContentTooLong {
                max: MAX_CONTENT_LENGTH,
                actual: MAX_CONTENT_LENGTH + 1
            }
        );
    }

    #[test]
    fn empty_content_is_allowed_but_destination_is_required() {
        assert!(Message::builder("", "123").build().is_ok());
        let err = Message::builder("hi", "").build().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "destination_number"
            }
        );
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let offset = FixedOffset::east_opt(11 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2011, 10, 10, 23, 0, 0).unwrap();
        let message = Message::builder("hi", "123")
            .scheduled(local)
            .message_expiry_timestamp(local)
            .build()
            .unwrap();

        let expected = Utc.timestamp_opt(1_318_248_000, 0).unwrap();
        assert_eq!(message.scheduled(), Some(expected));
        assert_eq!(message.message_expiry_timestamp(), Some(expected));
    }

    #[test]
    fn metadata_properties_accumulate_and_can_be_replaced() {
        let message = Message::builder("hi", "123")
            .metadata_property("a", "1")
            .metadata_property("b", "2")
            .build()
            .unwrap();
        assert_eq!(message.metadata().len(), 2);

        let message = Message::builder("hi", "123")
            .metadata_property("a", "1")
            .metadata(BTreeMap::from([("c".to_owned(), "3".to_owned())]))
            .build()
            .unwrap();
        assert_eq!(message.metadata().keys().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn server_messages_require_id_and_status() {
        let fields = || MessageBuilder::new("hi", "123");

        let err = Message::from_server(fields(), None, Some(MessageStatus::Queued), None)
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "message_id" });

        let err = Message::from_server(
            fields(),
            Some(String::new()),
            Some(MessageStatus::Queued),
            None,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "message_id" });

        let err = Message::from_server(fields(), Some("id-1".to_owned()), None, None).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "status" });

        let message = Message::from_server(
            fields(),
            Some("id-1".to_owned()),
            Some(MessageStatus::Failed),
            Some("no route".to_owned()),
        )
        .unwrap();
        assert_eq!(message.message_id(), Some("id-1"));
        assert_eq!(message.status(), Some(&MessageStatus::Failed));
        assert_eq!(message.status_reason(), Some("no route"));
    }

    #[test]
    fn server_messages_still_validate_content() {
        let fields = MessageBuilder::new("x".repeat(MAX_CONTENT_LENGTH + 1), "123");
        let err = Message::from_server(
            fields,
            Some("id-1".to_owned()),
            Some(MessageStatus::Queued),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::ContentTooLong { .. }));
    }
}
