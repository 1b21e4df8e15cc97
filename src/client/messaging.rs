use reqwest::Method;

use super::RestApiClient;
use super::error::ApiError;
use super::request::RequestBuilder;
use super::response::{classify, decode_optional_payload, decode_payload};
use crate::domain::{
    ApiResponse, CANCEL_MESSAGE_PAYLOAD, ConfirmationResult, DeliveryReportConfirmation,
    DeliveryReportList, Message, MessageList, MessageListProperties, ReplyConfirmation, ReplyList,
};
use crate::transport::{
    decode_delivery_report_confirmation_result, decode_delivery_report_list, decode_message,
    decode_message_list, decode_messages, decode_reply_confirmation_result, decode_reply_list,
    encode_delivery_report_confirmation, encode_message_list, encode_reply_confirmation,
};

const MESSAGES_PATH: &str = "/v1/messages";
const MESSAGE_PATH: &str = "/v1/messages/{messageId}";
const REPLIES_PATH: &str = "/v1/replies";
const CONFIRM_REPLIES_PATH: &str = "/v1/replies/confirmed";
const DELIVERY_REPORTS_PATH: &str = "/v1/delivery_reports";
const CONFIRM_DELIVERY_REPORTS_PATH: &str = "/v1/delivery_reports/confirmed";

/// Messaging operations of a [`RestApiClient`].
///
/// Obtained from [`RestApiClient::messaging`]. Every operation performs exactly one
/// HTTP round trip and returns the status together with the decoded payload.
#[derive(Clone, Copy)]
pub struct Messaging<'a> {
    client: &'a RestApiClient,
}

impl<'a> Messaging<'a> {
    pub(crate) fn new(client: &'a RestApiClient) -> Self {
        Self { client }
    }

    /// Send one message.
    ///
    /// Errors with [`ApiError::UnexpectedMessageCount`] when the gateway does not
    /// return exactly one message.
    pub async fn send_message(
        &self,
        message: Message,
        properties: Option<MessageListProperties>,
    ) -> Result<ApiResponse<Message>, ApiError> {
        let list = MessageList::new(vec![message], properties)?;
        let response = self.post_messages(&list).await?;
        let ApiResponse { status, payload } = decode_payload(response, decode_messages)?;

        let count = payload.len();
        match <[Message; 1]>::try_from(payload) {
            Ok([message]) => Ok(ApiResponse::new(status, message)),
            Err(_) => Err(ApiError::UnexpectedMessageCount { count }),
        }
    }

    /// Send a batch of messages; `properties` defaults to production sending mode.
    pub async fn send_messages(
        &self,
        messages: Vec<Message>,
        properties: Option<MessageListProperties>,
    ) -> Result<ApiResponse<MessageList>, ApiError> {
        let list = MessageList::new(messages, properties)?;
        let response = self.post_messages(&list).await?;
        decode_payload(response, decode_message_list)
    }

    pub async fn get_message(&self, message_id: &str) -> Result<ApiResponse<Message>, ApiError> {
        let response = self
            .request(Method::GET, MESSAGE_PATH)
            .path_variable("messageId", message_id)
            .execute()
            .await?;
        decode_payload(classify(response)?, decode_message)
    }

    /// Cancel a scheduled message that has not been delivered yet.
    pub async fn cancel_message(&self, message_id: &str) -> Result<ApiResponse<Message>, ApiError> {
        let response = self
            .request(Method::PUT, MESSAGE_PATH)
            .path_variable("messageId", message_id)
            .body_str(CANCEL_MESSAGE_PAYLOAD)
            .execute()
            .await?;
        decode_payload(classify(response)?, decode_message)
    }

    /// Up to 100 of the oldest unconfirmed replies.
    pub async fn check_replies(&self) -> Result<ApiResponse<ReplyList>, ApiError> {
        let response = self.request(Method::GET, REPLIES_PATH).execute().await?;
        decode_payload(classify(response)?, decode_reply_list)
    }

    pub async fn confirm_replies<I, S>(
        &self,
        reply_ids: I,
    ) -> Result<ApiResponse<Option<ConfirmationResult>>, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let confirmation = ReplyConfirmation::new(reply_ids);
        let response = self
            .request(Method::POST, CONFIRM_REPLIES_PATH)
            .encoded(encode_reply_confirmation(&confirmation))
            .execute()
            .await?;
        Ok(decode_optional_payload(
            classify(response)?,
            decode_reply_confirmation_result,
        ))
    }

    /// Up to 100 of the oldest unconfirmed delivery reports.
    pub async fn check_delivery_reports(&self) -> Result<ApiResponse<DeliveryReportList>, ApiError> {
        let response = self
            .request(Method::GET, DELIVERY_REPORTS_PATH)
            .execute()
            .await?;
        decode_payload(classify(response)?, decode_delivery_report_list)
    }

    pub async fn confirm_delivery_reports<I, S>(
        &self,
        delivery_report_ids: I,
    ) -> Result<ApiResponse<Option<ConfirmationResult>>, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let confirmation = DeliveryReportConfirmation::new(delivery_report_ids);
        let response = self
            .request(Method::POST, CONFIRM_DELIVERY_REPORTS_PATH)
            .encoded(encode_delivery_report_confirmation(&confirmation))
            .execute()
            .await?;
        Ok(decode_optional_payload(
            classify(response)?,
            decode_delivery_report_confirmation_result,
        ))
    }

    async fn post_messages(&self, list: &MessageList) -> Result<ApiResponse<Vec<u8>>, ApiError> {
        let response = self
            .request(Method::POST, MESSAGES_PATH)
            .encoded(encode_message_list(list))
            .execute()
            .await?;
        classify(response)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder<'a> {
        RequestBuilder::new(self.client, method, path)
    }
}
