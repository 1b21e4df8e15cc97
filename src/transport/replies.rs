use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TransportError;
use super::confirmation::{WireConfirmationItem, decode_confirmation_items};
use super::timestamp::{format_timestamp, parse_optional_timestamp};
use crate::domain::{
    ConfirmationResult, Reply, ReplyConfirmation, ReplyList, ReplyParts, ValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reply_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_received: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireReplyList {
    #[serde(default)]
    replies: Option<Vec<WireReply>>,
}

#[derive(Debug, Clone, Serialize)]
struct WireReplyConfirmation<'a> {
    reply_ids: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
struct WireReplyConfirmationItem {
    #[serde(default)]
    reply_id: Option<String>,
    #[serde(default)]
    confirmed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireReplyConfirmationResult {
    #[serde(default)]
    reply_ids: Option<Vec<WireReplyConfirmationItem>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Vec<String>>,
}

impl From<&Reply> for WireReply {
    fn from(reply: &Reply) -> Self {
        Self {
            reply_id: Some(reply.reply_id().to_owned()),
            content: Some(reply.content().to_owned()),
            source_number: Some(reply.source_number().to_owned()),
            destination_number: reply.destination_number().map(str::to_owned),
            message_id: reply.message_id().map(str::to_owned),
            date_received: Some(format_timestamp(&reply.date_received())),
            metadata: Some(reply.metadata().clone()),
        }
    }
}

impl TryFrom<WireReply> for Reply {
    type Error = ValidationError;

    fn try_from(wire: WireReply) -> Result<Self, Self::Error> {
        Reply::from_parts(ReplyParts {
            date_received: parse_optional_timestamp("date_received", wire.date_received.as_deref())?,
            reply_id: wire.reply_id,
            content: wire.content,
            source_number: wire.source_number,
            destination_number: wire.destination_number,
            message_id: wire.message_id,
            metadata: wire.metadata,
        })
    }
}

pub fn decode_reply_list(json: &[u8]) -> Result<ReplyList, TransportError> {
    let wire: WireReplyList = serde_json::from_slice(json)?;
    let replies = wire
        .replies
        .ok_or(ValidationError::Missing { field: "replies" })?
        .into_iter()
        .map(Reply::try_from)
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(ReplyList { replies })
}

#[cfg(test)]
fn encode_reply(reply: &Reply) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(&WireReply::from(reply))?)
}

#[cfg(test)]
fn decode_reply(json: &[u8]) -> Result<Reply, TransportError> {
    let wire: WireReply = serde_json::from_slice(json)?;
    Ok(Reply::try_from(wire)?)
}

pub fn encode_reply_confirmation(confirmation: &ReplyConfirmation) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(&WireReplyConfirmation {
        reply_ids: confirmation.reply_ids(),
    })?)
}

pub fn decode_reply_confirmation_result(json: &[u8]) -> Result<ConfirmationResult, TransportError> {
    let wire: WireReplyConfirmationResult = serde_json::from_slice(json)?;
    let items = wire
        .reply_ids
        .ok_or(ValidationError::Missing { field: "reply_ids" })?
        .into_iter()
        .map(|item| WireConfirmationItem {
            id: item.reply_id,
            confirmed: item.confirmed,
        });

    Ok(ConfirmationResult {
        items: decode_confirmation_items(items, "reply_id")?,
        message: wire.message,
        details: wire.details.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn decode_reply_list_with_optional_fields() {
        let json = r#"
        {
          "replies": [
            {
              "reply_id": "a175e797-2b54-468b-9850-41a3eab32f74",
              "content": "I'm on my way!",
              "source_number": "+61491570156",
              "destination_number": "+61491570157",
              "message_id": "877c19ef-fa2e-4cec-827a-e1df9b5509f7",
              "date_received": "2016-12-07T08:43:00.850Z",
              "callback_url": "https://my.callback.url.com",
              "metadata": {"key1": "value1"}
            },
            {
              "reply_id": "3d8d53d8-01d3-45dd-8cfa-4dfc81600f7f",
              "content": "",
              "source_number": "+61491570158",
              "date_received": "2016-12-07T08:43:00+11:00"
            }
          ]
        }
        "#;

        let list = decode_reply_list(json.as_bytes()).unwrap();
        assert_eq!(list.replies.len(), 2);

        let first = &list.replies[0];
        assert_eq!(first.content(), "I'm on my way!");
        assert_eq!(first.destination_number(), Some("+61491570157"));
        assert_eq!(first.message_id(), Some("877c19ef-fa2e-4cec-827a-e1df9b5509f7"));
        assert_eq!(first.date_received().timestamp(), 1_481_100_180);

        let unsolicited = &list.replies[1];
        assert_eq!(unsolicited.content(), "");
        assert!(unsolicited.message_id().is_none());
        assert!(unsolicited.destination_number().is_none());
        assert_eq!(
            unsolicited.date_received(),
            Utc.timestamp_opt(1_481_060_580, 0).unwrap()
        );
    }

    #[test]
    fn reply_survives_encode_decode() {
        let json = r#"
        {
          "replies": [
            {
              "reply_id": "r-1",
              "content": "I'm on my way!",
              "source_number": "+61491570156",
              "destination_number": "+61491570157",
              "message_id": "m-1",
              "date_received": "2016-12-07T19:43:00+11:00",
              "metadata": {"key1": "value1"}
            },
            {
              "reply_id": "r-2",
              "content": "",
              "source_number": "+61491570158",
              "date_received": "2016-12-07T08:43:00Z"
            }
          ]
        }
        "#;
        let list = decode_reply_list(json.as_bytes()).unwrap();

        for reply in &list.replies {
            let encoded = encode_reply(reply).unwrap();
            assert_eq!(&decode_reply(&encoded).unwrap(), reply);
            assert_eq!(encode_reply(reply).unwrap(), encoded);
        }

        let value: serde_json::Value =
            serde_json::from_slice(&encode_reply(&list.replies[1]).unwrap()).unwrap();
        assert_eq!(value["date_received"], "2016-12-07T08:43:00Z");
        assert!(value.get("message_id").is_none());
        assert!(value.get("destination_number").is_none());
    }

    #[test]
    fn decode_reply_without_id_fails() {
        let json = r#"
        {
          "replies": [{
            "content": "hi",
            "source_number": "+61491570156",
            "date_received": "2016-12-07T08:43:00Z"
          }]
        }
        "#;
        let err = decode_reply_list(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Validation(ValidationError::Empty { field: "reply_id" })
        ));
    }

    #[test]
    fn decode_reply_list_requires_replies_key() {
        assert!(decode_reply_list(br#"{"replies": []}"#).is_ok());
        assert!(matches!(
            decode_reply_list(b"{}").unwrap_err(),
            TransportError::Validation(ValidationError::Missing { field: "replies" })
        ));
    }

    #[test]
    fn encode_confirmation_body() {
        let confirmation = ReplyConfirmation::new(["r-1"]);
        let body = encode_reply_confirmation(&confirmation).unwrap();
        assert_eq!(body, br#"{"reply_ids":["r-1"]}"#);
    }

    #[test]
    fn decode_confirmation_result_with_details() {
        let json = r#"
        {
          "reply_ids": [{"reply_id": "r-1", "confirmed": true}],
          "details": ["already confirmed"]
        }
        "#;
        let result = decode_reply_confirmation_result(json.as_bytes()).unwrap();
        assert_eq!(result.items[0].id(), "r-1");
        assert!(result.items[0].confirmed());
        assert_eq!(result.details, vec!["already confirmed".to_owned()]);

        let err = decode_reply_confirmation_result(
            br#"{"reply_ids": [{"reply_id": "", "confirmed": true}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Validation(ValidationError::Empty { field: "reply_id" })
        ));
    }
}
