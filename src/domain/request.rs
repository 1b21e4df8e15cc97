use crate::domain::message::Message;
use crate::domain::validation::ValidationError;
use crate::domain::value::MessageSendingMode;

/// Literal body of a cancel request.
pub const CANCEL_MESSAGE_PAYLOAD: &str = r#"{"status":"CANCELLED"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Batch-level properties sent alongside a [`MessageList`].
pub struct MessageListProperties {
    sending_mode: MessageSendingMode,
}

impl MessageListProperties {
    pub fn with_sending_mode(sending_mode: MessageSendingMode) -> Self {
        Self { sending_mode }
    }

    pub fn sending_mode(&self) -> &MessageSendingMode {
        &self.sending_mode
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A non-empty, ordered batch of messages.
pub struct MessageList {
    messages: Vec<Message>,
    properties: MessageListProperties,
}

impl MessageList {
    pub const FIELD: &'static str = "messages";

    /// Create a batch; `None` properties mean production sending mode.
    pub fn new(
        messages: Vec<Message>,
        properties: Option<MessageListProperties>,
    ) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::EmptyList { field: Self::FIELD });
        }
        Ok(Self {
            messages,
            properties: properties.unwrap_or_default(),
        })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn properties(&self) -> &MessageListProperties {
        &self.properties
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Ids of delivery reports to remove from the unconfirmed queue.
pub struct DeliveryReportConfirmation {
    delivery_report_ids: Vec<String>,
}

impl DeliveryReportConfirmation {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            delivery_report_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn delivery_report_ids(&self) -> &[String] {
        &self.delivery_report_ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Ids of replies to remove from the unconfirmed queue.
pub struct ReplyConfirmation {
    reply_ids: Vec<String>,
}

impl ReplyConfirmation {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reply_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reply_ids(&self) -> &[String] {
        &self.reply_ids
    }
}
