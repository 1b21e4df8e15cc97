use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Subcommand};
use messagemedia_rest::{
    AddressType, ApiError, DeliveryReport, Message, MessageFormat, Reply, RestApiClient,
    ValidationError,
};

/// Actions understood by the command line, one per API operation.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Send a single message
    #[command(name = "SendMessage")]
    SendMessage(SendMessageArgs),

    /// Get the current status of a message
    #[command(name = "GetMessageStatus")]
    GetMessageStatus { message_id: String },

    /// Cancel a scheduled message
    #[command(name = "CancelMessage")]
    CancelMessage { message_id: String },

    /// List unconfirmed replies
    #[command(name = "CheckReplies")]
    CheckReplies,

    /// Confirm replies so they are no longer returned
    #[command(name = "ConfirmReplies")]
    ConfirmReplies {
        #[arg(required = true, num_args = 1..)]
        reply_ids: Vec<String>,
    },

    /// List unconfirmed delivery reports
    #[command(name = "CheckDeliveryReports")]
    CheckDeliveryReports,

    /// Confirm delivery reports so they are no longer returned
    #[command(name = "ConfirmDeliveryReports")]
    ConfirmDeliveryReports {
        #[arg(required = true, num_args = 1..)]
        delivery_report_ids: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct SendMessageArgs {
    /// The content of the message
    #[arg(long)]
    content: String,

    /// The destination number to send to
    #[arg(long)]
    destination_number: String,

    /// Request a delivery report for the message
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    delivery_report: bool,

    /// The callback URL for any replies or delivery reports
    #[arg(long)]
    callback_url: Option<String>,

    /// The source address to send from
    #[arg(long)]
    source_number: Option<String>,

    /// The type of the source address (INTERNATIONAL, SHORTCODE or ALPHANUMERIC)
    #[arg(long, value_parser = AddressType::from_wire)]
    source_number_type: Option<AddressType>,

    /// The format of the message (SMS or TTS)
    #[arg(long, value_parser = MessageFormat::from_wire)]
    format: Option<MessageFormat>,

    /// The time to schedule the message for, in epoch milliseconds
    #[arg(long, value_parser = parse_epoch_millis)]
    scheduled: Option<DateTime<Utc>>,

    /// The time to expire the message at, in epoch milliseconds
    #[arg(long, value_parser = parse_epoch_millis)]
    message_expiry_timestamp: Option<DateTime<Utc>>,
}

impl SendMessageArgs {
    fn into_message(self) -> Result<Message, ValidationError> {
        let mut builder = Message::builder(self.content, self.destination_number)
            .delivery_report(self.delivery_report);
        if let Some(callback_url) = self.callback_url {
            builder = builder.callback_url(callback_url);
        }
        if let Some(source_number) = self.source_number {
            builder = builder.source_number(source_number);
        }
        if let Some(source_number_type) = self.source_number_type {
            builder = builder.source_number_type(source_number_type);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(scheduled) = self.scheduled {
            builder = builder.scheduled(scheduled);
        }
        if let Some(expiry) = self.message_expiry_timestamp {
            builder = builder.message_expiry_timestamp(expiry);
        }
        builder.build()
    }
}

fn parse_epoch_millis(value: &str) -> Result<DateTime<Utc>, String> {
    let millis: i64 = value
        .parse()
        .ok()
        .filter(|millis| *millis >= 0)
        .ok_or_else(|| format!("'{value}' is not an epoch timestamp in milliseconds"))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| format!("'{value}' is out of range"))
}

impl Action {
    /// Used in error reports: "Error <description>. <message>".
    pub fn description(&self) -> &'static str {
        match self {
            Self::SendMessage(_) => "sending message(s)",
            Self::GetMessageStatus { .. } => "getting message status",
            Self::CancelMessage { .. } => "cancelling message",
            Self::CheckReplies => "retrieving replies",
            Self::ConfirmReplies { .. } => "confirming replies",
            Self::CheckDeliveryReports => "retrieving delivery reports",
            Self::ConfirmDeliveryReports { .. } => "confirming delivery reports",
        }
    }

    /// Run the action and return what should be printed on success.
    pub async fn run(self, client: &RestApiClient) -> Result<String, ApiError> {
        let messaging = client.messaging();
        match self {
            Self::SendMessage(args) => {
                let message = args.into_message()?;
                let response = messaging.send_message(message, None).await?;
                Ok(render_message(&response.payload))
            }
            Self::GetMessageStatus { message_id } => {
                let response = messaging.get_message(&message_id).await?;
                Ok(render_message(&response.payload))
            }
            Self::CancelMessage { message_id } => {
                messaging.cancel_message(&message_id).await?;
                Ok("Message cancelled".to_owned())
            }
            Self::CheckReplies => {
                let response = messaging.check_replies().await?;
                Ok(render_replies(&response.payload.replies))
            }
            Self::ConfirmReplies { reply_ids } => {
                messaging.confirm_replies(reply_ids).await?;
                Ok("Successfully requested confirmation!".to_owned())
            }
            Self::CheckDeliveryReports => {
                let response = messaging.check_delivery_reports().await?;
                Ok(render_delivery_reports(&response.payload.delivery_reports))
            }
            Self::ConfirmDeliveryReports {
                delivery_report_ids,
            } => {
                messaging.confirm_delivery_reports(delivery_report_ids).await?;
                Ok("Successfully requested confirmation!".to_owned())
            }
        }
    }
}

fn or_default<T: ToString>(value: Option<T>, default: &str) -> String {
    value.map_or_else(|| default.to_owned(), |value| value.to_string())
}

fn render_message(message: &Message) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Message ID: {}", message.message_id().unwrap_or_default());
    let _ = writeln!(
        out,
        "  Callback URL: {}",
        or_default(message.callback_url(), "not specified")
    );
    let _ = writeln!(out, "  Content: {}", message.content());
    let _ = writeln!(out, "  Delivery report requested: {}", message.delivery_report());
    let _ = writeln!(out, "  Destination number: {}", message.destination_number());
    let _ = writeln!(out, "  Format: {}", message.format());
    let _ = writeln!(
        out,
        "  Scheduled date/time: {}",
        or_default(message.scheduled().map(|at| at.to_rfc3339()), "not specified")
    );
    let _ = writeln!(
        out,
        "  Source number: {}",
        or_default(message.source_number(), "not specified")
    );
    let _ = writeln!(out, "  Status: {}", or_default(message.status(), "N/A"));
    let _ = writeln!(
        out,
        "  Status reason: {}",
        or_default(message.status_reason(), "N/A")
    );
    let _ = write!(
        out,
        "  Message expiry date/time: {}",
        or_default(
            message.message_expiry_timestamp().map(|at| at.to_rfc3339()),
            "not specified"
        )
    );
    out
}

fn render_replies(replies: &[Reply]) -> String {
    if replies.is_empty() {
        return "No unconfirmed replies.".to_owned();
    }

    let mut out = String::from("Retrieved the following replies:");
    for reply in replies {
        let _ = write!(out, "\n  ID: {}", reply.reply_id());
        let _ = write!(out, "\n    Content: {}", reply.content());
        let _ = write!(out, "\n    Date Received: {}", reply.date_received().to_rfc3339());
        let _ = write!(out, "\n    Message ID: {}", or_default(reply.message_id(), "N/A"));
        let _ = write!(out, "\n    Source Number (handset): {}", reply.source_number());
        let _ = write!(
            out,
            "\n    Destination Number: {}",
            or_default(reply.destination_number(), "N/A")
        );
        let _ = write!(out, "\n    Metadata: {:?}", reply.metadata());
    }
    out
}

fn render_delivery_reports(reports: &[DeliveryReport]) -> String {
    if reports.is_empty() {
        return "No unconfirmed delivery reports.".to_owned();
    }

    let mut out = String::from("Retrieved the following delivery reports:");
    for report in reports {
        let _ = write!(out, "\n  ID: {}", report.delivery_report_id());
        let _ = write!(out, "\n    Date Received: {}", report.date_received().to_rfc3339());
        let _ = write!(out, "\n    Delay: {}", or_default(report.delay(), "N/A"));
        let _ = write!(out, "\n    Message ID: {}", report.message_id());
        let _ = write!(out, "\n    Source Number (handset): {}", report.source_number());
        let _ = write!(out, "\n    Status: {}", report.status());
        let _ = write!(out, "\n    Metadata: {:?}", report.metadata());
    }
    out
}

/// Text printed to stderr when an action fails.
pub fn error_report(description: &str, error: &ApiError) -> String {
    let mut out = format!("Error {description}. {error}");
    if let Some(status) = error.status_code() {
        let _ = write!(out, "\nHTTP status code: {status}");
    }
    if !error.details().is_empty() {
        out.push_str("\nDetails:");
        for detail in error.details() {
            let _ = write!(out, "\n  {detail}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_millis_are_parsed_as_utc() {
        let at = parse_epoch_millis("1318248000000").unwrap();
        assert_eq!(at.timestamp(), 1_318_248_000);
        assert!(parse_epoch_millis("-1").is_err());
        assert!(parse_epoch_millis("tomorrow").is_err());
    }

    #[test]
    fn send_message_args_build_a_message() {
        let args = SendMessageArgs {
            content: "Hello".to_owned(),
            destination_number: "+61491570156".to_owned(),
            delivery_report: false,
            callback_url: None,
            source_number: Some("MyCompany".to_owned()),
            source_number_type: Some(AddressType::Alphanumeric),
            format: Some(MessageFormat::Tts),
            scheduled: Some(parse_epoch_millis("1318248000000").unwrap()),
            message_expiry_timestamp: None,
        };
        let message = args.into_message().unwrap();
        assert!(!message.delivery_report());
        assert_eq!(message.format(), MessageFormat::Tts);
        assert_eq!(message.source_number_type(), Some(AddressType::Alphanumeric));
        assert_eq!(message.scheduled().map(|at| at.timestamp()), Some(1_318_248_000));
    }

    #[test]
    fn empty_reply_and_report_lists_have_friendly_output() {
        assert_eq!(render_replies(&[]), "No unconfirmed replies.");
        assert_eq!(
            render_delivery_reports(&[]),
            "No unconfirmed delivery reports."
        );
    }

    #[test]
    fn caller_built_message_renders_placeholders() {
        let message = Message::builder("Hi", "+61491570156").build().unwrap();
        let rendered = render_message(&message);
        assert!(rendered.contains("  Callback URL: not specified"));
        assert!(rendered.contains("  Status: N/A"));
        assert!(rendered.contains("  Format: SMS"));
    }

    #[test]
    fn error_report_lists_status_and_details() {
        let error = ApiError::Client {
            status: 400,
            reason: "Invalid request".to_owned(),
            details: vec!["content: may not be empty".to_owned()],
        };
        assert_eq!(
            error_report("sending message(s)", &error),
            "Error sending message(s). Invalid request\nHTTP status code: 400\nDetails:\n  content: may not be empty"
        );

        let error = ApiError::UnresolvedPath {
            path: "/v1/messages/{messageId}".to_owned(),
        };
        assert_eq!(
            error_report("getting message status", &error),
            "Error getting message status. path variables unresolved, current path is /v1/messages/{messageId}"
        );
    }
}
