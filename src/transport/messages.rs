use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TransportError;
use super::timestamp::{format_timestamp, parse_optional_timestamp};
use crate::domain::{
    AddressType, Message, MessageBuilder, MessageFormat, MessageList, MessageListProperties,
    MessageSendingMode, MessageStatus, ValidationError,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_report: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheduled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_number_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message_expiry_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessageListProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sending_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessageList {
    #[serde(default)]
    messages: Vec<WireMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<WireMessageListProperties>,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            callback_url: message.callback_url().map(str::to_owned),
            content: Some(message.content().to_owned()),
            delivery_report: Some(message.delivery_report()),
            destination_number: Some(message.destination_number().to_owned()),
            format: Some(message.format().as_wire().to_owned()),
            message_id: message.message_id().map(str::to_owned),
            scheduled: message.scheduled().as_ref().map(format_timestamp),
            source_number: message.source_number().map(str::to_owned),
            source_number_type: message
                .source_number_type()
                .map(|kind| kind.as_wire().to_owned()),
            status: message.status().map(|status| status.as_wire().to_owned()),
            status_reason: message.status_reason().map(str::to_owned),
            message_expiry_timestamp: message
                .message_expiry_timestamp()
                .as_ref()
                .map(format_timestamp),
            metadata: Some(message.metadata().clone()),
        }
    }
}

impl TryFrom<WireMessage> for Message {
    type Error = ValidationError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let content = wire.content.ok_or(ValidationError::Missing {
            field: Message::CONTENT_FIELD,
        })?;
        let destination_number = wire.destination_number.ok_or(ValidationError::Empty {
            field: Message::DESTINATION_NUMBER_FIELD,
        })?;

        let mut fields = MessageBuilder::new(content, destination_number)
            .delivery_report(wire.delivery_report.unwrap_or(false));
        if let Some(callback_url) = wire.callback_url {
            fields = fields.callback_url(callback_url);
        }
        if let Some(format) = wire.format.as_deref() {
            fields = fields.format(MessageFormat::from_wire(format)?);
        }
        if let Some(source_number) = wire.source_number {
            fields = fields.source_number(source_number);
        }
        if let Some(kind) = wire.source_number_type.as_deref() {
            fields = fields.source_number_type(AddressType::from_wire(kind)?);
        }
        if let Some(scheduled) = parse_optional_timestamp("scheduled", wire.scheduled.as_deref())? {
            fields = fields.scheduled(scheduled);
        }
        if let Some(expiry) = parse_optional_timestamp(
            "message_expiry_timestamp",
            wire.message_expiry_timestamp.as_deref(),
        )? {
            fields = fields.message_expiry_timestamp(expiry);
        }
        if let Some(metadata) = wire.metadata {
            fields = fields.metadata(metadata);
        }

        Message::from_server(
            fields,
            wire.message_id,
            wire.status.as_deref().map(MessageStatus::from_wire),
            wire.status_reason,
        )
    }
}

#[cfg(test)]
fn encode_message(message: &Message) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(&WireMessage::from(message))?)
}

pub fn decode_message(json: &[u8]) -> Result<Message, TransportError> {
    let wire: WireMessage = serde_json::from_slice(json)?;
    Ok(Message::try_from(wire)?)
}

pub fn encode_message_list(list: &MessageList) -> Result<Vec<u8>, TransportError> {
    let wire = WireMessageList {
        messages: list.messages().iter().map(WireMessage::from).collect(),
        properties: Some(WireMessageListProperties {
            sending_mode: Some(list.properties().sending_mode().as_wire().to_owned()),
        }),
    };
    Ok(serde_json::to_vec(&wire)?)
}

pub fn decode_message_list(json: &[u8]) -> Result<MessageList, TransportError> {
    let wire: WireMessageList = serde_json::from_slice(json)?;
    let messages = wire
        .messages
        .into_iter()
        .map(Message::try_from)
        .collect::<Result<Vec<_>, ValidationError>>()?;
    let properties = wire
        .properties
        .and_then(|properties| properties.sending_mode)
        .map(|mode| MessageListProperties::with_sending_mode(MessageSendingMode::from_wire(&mode)));

    Ok(MessageList::new(messages, properties)?)
}

/// Messages of a send response, without the non-empty batch requirement.
pub fn decode_messages(json: &[u8]) -> Result<Vec<Message>, TransportError> {
    let wire: WireMessageList = serde_json::from_slice(json)?;
    Ok(wire
        .messages
        .into_iter()
        .map(Message::try_from)
        .collect::<Result<Vec<_>, ValidationError>>()?)
}
