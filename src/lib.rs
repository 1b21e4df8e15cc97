//! Typed Rust client for the MessageMedia REST messaging API.
//!
//! The crate is split the same way the API is used:
//! - [`domain`]: validated value types (messages, delivery reports, replies, confirmations),
//! - a private transport layer for JSON and timestamp wire details,
//! - [`signing`]: HMAC request signing,
//! - [`client`]: the HTTP client, its messaging operations and typed errors.
//!
//! ```rust,no_run
//! use messagemedia_rest::{Context, Credentials, Message, RestApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RestApiClient::new(Credentials::new("api-key", "api-secret")?)?;
//!
//!     let message = Message::builder("My first message", "+61491570156")
//!         .delivery_report(true)
//!         .build()?;
//!     let sent = client.messaging().send_message(message, None).await?;
//!     println!("sent {:?}", sent.payload.message_id());
//!
//!     let account = Context::builder().account("subaccount").build();
//!     let replies = client
//!         .scope(account, client.messaging().check_replies())
//!         .await??;
//!     println!("{} replies", replies.payload.replies.len());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod signing;
mod transport;

pub use client::{
    ApiError, AuthorizationScheme, Context, ContextBuilder, ContextError, Messaging,
    RestApiClient, RestApiClientBuilder,
};
pub use domain::{
    AddressType, ApiKey, ApiResponse, ApiSecret, ConfirmationResult, ConfirmationResultItem,
    Credentials, DeliveryReport, DeliveryReportConfirmation, DeliveryReportList, Message,
    MessageBuilder, MessageFormat, MessageList, MessageListProperties, MessageSendingMode,
    MessageStatus, Reply, ReplyConfirmation, ReplyList, ValidationError,
};
