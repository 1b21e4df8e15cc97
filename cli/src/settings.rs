use messagemedia_rest::{ApiError, Context, Credentials, RestApiClient, ValidationError};

pub const API_KEY_VAR: &str = "MESSAGEMEDIA_API_KEY";
pub const SECRET_KEY_VAR: &str = "MESSAGEMEDIA_SECRET_KEY";
pub const ENDPOINT_VAR: &str = "MESSAGEMEDIA_ENDPOINT";
pub const ACCOUNT_VAR: &str = "MESSAGEMEDIA_ACCOUNT";
pub const USERNAME_VAR: &str = "MESSAGEMEDIA_USERNAME";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{what} cannot be null or empty. Have you tried setting the '{var}' environment variable?")]
    Missing { what: &'static str, var: &'static str },

    #[error("invalid credentials: {0}")]
    Credentials(#[from] ValidationError),
}

/// Connection settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    credentials: Credentials,
    endpoint: Option<String>,
    account: Option<String>,
    username: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(SettingsError::Missing {
            what: "API key",
            var: API_KEY_VAR,
        })?;
        let secret_key = non_empty(SECRET_KEY_VAR).ok_or(SettingsError::Missing {
            what: "Secret key",
            var: SECRET_KEY_VAR,
        })?;

        Ok(Self {
            credentials: Credentials::new(api_key, secret_key)?,
            endpoint: non_empty(ENDPOINT_VAR),
            account: non_empty(ACCOUNT_VAR),
            username: non_empty(USERNAME_VAR),
        })
    }

    pub fn client(&self) -> Result<RestApiClient, ApiError> {
        let mut builder = RestApiClient::builder(self.credentials.clone());
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        builder.build()
    }

    /// Identity override to run the action under, when one is configured.
    pub fn context(&self) -> Option<Context> {
        if self.account.is_none() && self.username.is_none() {
            return None;
        }

        let mut builder = Context::builder();
        if let Some(account) = &self.account {
            builder = builder.account(account.clone());
        }
        if let Some(username) = &self.username {
            builder = builder.username(username.clone());
        }
        Some(builder.build())
    }
}
