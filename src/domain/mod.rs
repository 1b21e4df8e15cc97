//! Domain layer: strong types with validation and invariants (no I/O).

mod message;
mod request;
mod response;
mod validation;
mod value;

pub use message::{MAX_CONTENT_LENGTH, Message, MessageBuilder};
pub use request::{
    CANCEL_MESSAGE_PAYLOAD, DeliveryReportConfirmation, MessageList, MessageListProperties,
    ReplyConfirmation,
};
pub(crate) use response::{DeliveryReportParts, ReplyParts};
pub use response::{
    ApiResponse, ConfirmationResult, ConfirmationResultItem, DeliveryReport, DeliveryReportList,
    Reply, ReplyList,
};
pub use validation::ValidationError;
pub use value::{
    AddressType, ApiKey, ApiSecret, Credentials, MessageFormat, MessageSendingMode, MessageStatus,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn message(destination: &str) -> Message {
        Message::builder("hello", destination).build().unwrap()
    }

    #[test]
    fn message_list_rejects_empty_batches() {
        let err = MessageList::new(Vec::new(), None).unwrap_err();
        assert_eq!(err, ValidationError::EmptyList { field: "messages" });
    }

    #[test]
    fn message_list_defaults_to_production_mode() {
        let list = MessageList::new(vec![message("123")], None).unwrap();
        assert_eq!(list.messages().len(), 1);
        assert_eq!(
            list.properties().sending_mode(),
            &MessageSendingMode::Production
        );
    }

    #[test]
    fn message_list_keeps_order_and_properties() {
        let properties =
            MessageListProperties::with_sending_mode(MessageSendingMode::FunctionalTestDelivered);
        let list = MessageList::new(
            vec![message("1"), message("2"), message("3")],
            Some(properties.clone()),
        )
        .unwrap();

        let destinations = list
            .messages()
            .iter()
            .map(Message::destination_number)
            .collect::<Vec<_>>();
        assert_eq!(destinations, vec!["1", "2", "3"]);
        assert_eq!(list.properties(), &properties);
    }

    #[test]
    fn confirmations_compare_by_ids() {
        let a = ReplyConfirmation::new(["r-1", "r-2"]);
        let b = ReplyConfirmation::new(vec!["r-1".to_owned(), "r-2".to_owned()]);
        assert_eq!(a, b);
        assert_ne!(a, ReplyConfirmation::new(["r-2", "r-1"]));

        let source = vec!["dr-1".to_owned()];
        let confirmation = DeliveryReportConfirmation::new(source.iter().cloned());
        drop(source);
        assert_eq!(confirmation.delivery_report_ids(), ["dr-1".to_owned()]);
    }
}
