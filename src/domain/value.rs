use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// API key identifying the caller (`username` in the `Authorization` header).
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.0).finish()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Shared secret used as the HMAC key.
///
/// Invariant: must not be empty (whitespace is preserved). `Debug` never prints the value.
pub struct ApiSecret(String);

impl ApiSecret {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "secret_key";

    /// Create a validated [`ApiSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// API key and secret pair used to sign every request.
pub struct Credentials {
    key: ApiKey,
    secret: ApiSecret,
}

impl Credentials {
    /// Validate both parts and pair them.
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            key: ApiKey::new(key)?,
            secret: ApiSecret::new(secret)?,
        })
    }

    pub fn key(&self) -> &ApiKey {
        &self.key
    }

    pub fn secret(&self) -> &ApiSecret {
        &self.secret
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Lifecycle status of a message, also reported by delivery reports.
///
/// Values the crate does not know are preserved in [`MessageStatus::Unknown`] and
/// written back verbatim.
pub enum MessageStatus {
    Queued,
    Processing,
    Processed,
    Scheduled,
    Cancelled,
    Failed,
    Delivered,
    Expired,
    Enroute,
    Held,
    Submitted,
    Rejected,
    Unknown(String),
}

impl MessageStatus {
    pub const FIELD: &'static str = "status";

    /// Map a wire value; never fails.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "processing" => Self::Processing,
            "processed" => Self::Processed,
            "scheduled" => Self::Scheduled,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            "delivered" => Self::Delivered,
            "expired" => Self::Expired,
            "enroute" => Self::Enroute,
            "held" => Self::Held,
            "submitted" => Self::Submitted,
            "rejected" => Self::Rejected,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Delivered => "delivered",
            Self::Expired => "expired",
            Self::Enroute => "enroute",
            Self::Held => "held",
            Self::Submitted => "submitted",
            Self::Rejected => "rejected",
            Self::Unknown(value) => value,
        }
    }

    /// Returns `true` once the status can no longer change.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Failed | Self::Delivered | Self::Expired | Self::Rejected
        )
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
/// Whether a batch is delivered for real or simulated by the gateway.
pub enum MessageSendingMode {
    #[default]
    Production,
    FunctionalTestDelivered,
    FunctionalTestDeliveryFailed,
    Unknown(String),
}

impl MessageSendingMode {
    pub const FIELD: &'static str = "sending_mode";

    pub fn from_wire(value: &str) -> Self {
        match value {
            "production" => Self::Production,
            "functional_test_delivered" => Self::FunctionalTestDelivered,
            "functional_test_delivery_failed" => Self::FunctionalTestDeliveryFailed,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Production => "production",
            Self::FunctionalTestDelivered => "functional_test_delivered",
            Self::FunctionalTestDeliveryFailed => "functional_test_delivery_failed",
            Self::Unknown(value) => value,
        }
    }
}

impl fmt::Display for MessageSendingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Delivery format of a message.
pub enum MessageFormat {
    #[default]
    Sms,
    /// Text-to-speech voice call.
    Tts,
}

impl MessageFormat {
    pub const FIELD: &'static str = "format";

    pub fn from_wire(value: &str) -> Result<Self, ValidationError> {
        match value {
            "SMS" => Ok(Self::Sms),
            "TTS" => Ok(Self::Tts),
            other => Err(ValidationError::UnknownVariant {
                field: Self::FIELD,
                value: other.to_owned(),
            }),
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Tts => "TTS",
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of source address a message is sent from.
pub enum AddressType {
    International,
    Shortcode,
    Alphanumeric,
}

impl AddressType {
    pub const FIELD: &'static str = "source_number_type";

    pub fn from_wire(value: &str) -> Result<Self, ValidationError> {
        match value {
            "INTERNATIONAL" => Ok(Self::International),
            "SHORTCODE" => Ok(Self::Shortcode),
            "ALPHANUMERIC" => Ok(Self::Alphanumeric),
            other => Err(ValidationError::UnknownVariant {
                field: Self::FIELD,
                value: other.to_owned(),
            }),
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::International => "INTERNATIONAL",
            Self::Shortcode => "SHORTCODE",
            Self::Alphanumeric => "ALPHANUMERIC",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_trim_key_and_keep_secret() {
        let credentials = Credentials::new("  key ", " secret ").unwrap();
        assert_eq!(credentials.key().as_str(), "key");
        assert_eq!(credentials.secret().as_str(), " secret ");

        assert!(Credentials::new("  ", "secret").is_err());
        assert!(Credentials::new("key", "").is_err());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let credentials = Credentials::new("key", "hunter2").unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("hunter2"), "{debug}");
        assert!(debug.contains("key"));
    }

    #[test]
    fn message_status_keeps_unknown_wire_values() {
        assert_eq!(MessageStatus::from_wire("delivered"), MessageStatus::Delivered);
        assert_eq!(MessageStatus::from_wire("enroute"), MessageStatus::Enroute);

        let unknown = MessageStatus::from_wire("teleported");
        assert_eq!(unknown, MessageStatus::Unknown("teleported".to_owned()));
        assert_eq!(unknown.as_wire(), "teleported");
        assert!(!unknown.is_final());
        assert!(MessageStatus::Rejected.is_final());
    }

    #[test]
    fn sending_mode_defaults_to_production() {
        assert_eq!(MessageSendingMode::default(), MessageSendingMode::Production);
        assert_eq!(
            MessageSendingMode::from_wire("functional_test_delivery_failed"),
            MessageSendingMode::FunctionalTestDeliveryFailed
        );
        assert_eq!(
            MessageSendingMode::from_wire("unknown"),
            MessageSendingMode::Unknown("unknown".to_owned())
        );
    }

    #[test]
    fn closed_enums_reject_unknown_wire_values() {
        assert_eq!(MessageFormat::from_wire("TTS"), Ok(MessageFormat::Tts));
        assert!(matches!(
            MessageFormat::from_wire("sms"),
            Err(ValidationError::UnknownVariant { field: "format", .. })
        ));

        assert_eq!(
            AddressType::from_wire("ALPHANUMERIC"),
            Ok(AddressType::Alphanumeric)
        );
        assert!(AddressType::from_wire("LONGCODE").is_err());
    }
}
