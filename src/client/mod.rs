//! Client layer: request orchestration, authentication and response mapping.

mod context;
mod error;
mod http;
mod messaging;
mod request;
mod response;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use reqwest::Method;
use tracing::debug;
use url::Url;

pub use context::{Context, ContextBuilder, ContextError};
pub use error::ApiError;
pub use messaging::Messaging;

use self::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use self::request::RequestBuilder;
use self::response::classify;
use crate::domain::Credentials;
use crate::signing::{self, CONTENT_MD5_HEADER, DATE_HEADER, SignableRequest};

pub const DEFAULT_ENDPOINT: &str = "https://api.messagemedia.com/";
pub const DEFAULT_USER_AGENT: &str = "rest-api-rust-client-v1";
pub const DEFAULT_MAX_CONNECTIONS: usize = 200;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const STATUS_PATH: &str = "/v1/status";
const AUTHORIZATION_HEADER: &str = "Authorization";
const USER_AGENT_HEADER: &str = "User-Agent";
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// How requests are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum AuthorizationScheme {
    /// HMAC-SHA1 over the `Date` header and request line.
    #[default]
    HmacMmV2,
}

#[derive(Debug, Clone)]
/// Builder for [`RestApiClient`].
///
/// Every setting is fixed once [`RestApiClientBuilder::build`] returns.
pub struct RestApiClientBuilder {
    credentials: Credentials,
    endpoint: String,
    connect_timeout: Duration,
    socket_timeout: Duration,
    max_connections: usize,
    user_agent: String,
    authorization_scheme: AuthorizationScheme,
}

impl RestApiClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            socket_timeout: DEFAULT_SOCKET_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            authorization_scheme: AuthorizationScheme::default(),
        }
    }

    /// Base URL of the API, e.g. `https://api.messagemedia.com/`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Time allowed to establish a connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Time allowed to wait for data on an established connection.
    pub fn socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout = timeout;
        self
    }

    /// Idle connections kept open per host for reuse.
    ///
    /// Applied as reqwest's `pool_max_idle_per_host`; reqwest has no cap on the total
    /// number of open connections, so concurrent requests beyond this open extra
    /// connections that are closed instead of pooled once they finish.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn authorization_scheme(mut self, scheme: AuthorizationScheme) -> Self {
        self.authorization_scheme = scheme;
        self
    }

    pub fn build(self) -> Result<RestApiClient, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.socket_timeout)
            .pool_max_idle_per_host(self.max_connections)
            .build()
            .map_err(|err| ApiError::Communication(Box::new(err)))?;

        self.build_with(Arc::new(ReqwestTransport { client }))
    }

    fn build_with(self, http: Arc<dyn HttpTransport>) -> Result<RestApiClient, ApiError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|source| ApiError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        Ok(RestApiClient {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            credentials: self.credentials,
            endpoint,
            user_agent: self.user_agent,
            authorization_scheme: self.authorization_scheme,
            http,
        })
    }
}

#[derive(Clone)]
/// Client for the MessageMedia REST API.
///
/// Cheap to clone; clones share the connection pool and count as the same client
/// for [`RestApiClient::scope`].
///
/// ```rust,no_run
/// use messagemedia_rest::{Credentials, Message, RestApiClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RestApiClient::new(Credentials::new("key", "secret")?)?;
///     let message = Message::builder("Hello!", "+61491570156").build()?;
///     let sent = client.messaging().send_message(message, None).await?;
///     println!("{:?}", sent.payload.message_id());
///     Ok(())
/// }
/// ```
pub struct RestApiClient {
    id: u64,
    credentials: Credentials,
    endpoint: Url,
    user_agent: String,
    authorization_scheme: AuthorizationScheme,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for RestApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestApiClient")
            .field("id", &self.id)
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint.as_str())
            .field("user_agent", &self.user_agent)
            .field("authorization_scheme", &self.authorization_scheme)
            .finish_non_exhaustive()
    }
}

impl RestApiClient {
    /// Create a client with default settings.
    pub fn new(credentials: Credentials) -> Result<Self, ApiError> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> RestApiClientBuilder {
        RestApiClientBuilder::new(credentials)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn messaging(&self) -> Messaging<'_> {
        Messaging::new(self)
    }

    /// `true` when the status endpoint answers with 2xx. Any failure reads as `false`;
    /// use [`RestApiClient::check_alive`] to see why.
    pub async fn is_alive(&self) -> bool {
        self.check_alive().await.is_ok()
    }

    pub async fn check_alive(&self) -> Result<(), ApiError> {
        let response = RequestBuilder::new(self, Method::GET, STATUS_PATH)
            .execute()
            .await?;
        classify(response).map(|_| ())
    }

    /// Run `future` with `context` applied to every request this client sends from it.
    ///
    /// Fails with [`ContextError::AlreadyActive`] if a context of this client is
    /// already active on the current task; `future` is not polled in that case.
    pub async fn scope<F>(&self, context: Context, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        context::scope(self.id, context, future).await
    }

    pub(crate) async fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.prepare(&mut request);
        debug!(method = %request.method, url = %request.url, "sending request");

        self.http
            .execute(request)
            .await
            .map_err(ApiError::Communication)
    }

    /// Add the ambient headers and sign the request.
    fn prepare(&self, request: &mut HttpRequest) {
        let existing_date = request.header(DATE_HEADER).map(str::to_owned);
        let date = match existing_date {
            Some(date) => date,
            None => {
                let date = Utc::now().format(HTTP_DATE_FORMAT).to_string();
                request.headers.push((DATE_HEADER.to_owned(), date.clone()));
                date
            }
        };
        if request.header(USER_AGENT_HEADER).is_none() {
            request
                .headers
                .push((USER_AGENT_HEADER.to_owned(), self.user_agent.clone()));
        }
        if let Some(context) = context::current(self.id) {
            for (name, value) in context.headers() {
                request.headers.push((name.to_owned(), value.to_owned()));
            }
        }

        let path_and_query = match request.url.query() {
            Some(query) => format!("{}?{query}", request.url.path()),
            None => request.url.path().to_owned(),
        };
        let authorization = match self.authorization_scheme {
            AuthorizationScheme::HmacMmV2 => signing::authorization_header(
                &self.credentials,
                &SignableRequest {
                    date: &date,
                    method: request.method.as_str(),
                    path_and_query: &path_and_query,
                    content_md5: request.header(CONTENT_MD5_HEADER),
                },
            ),
        };
        request
            .headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
        request
            .headers
            .push((AUTHORIZATION_HEADER.to_owned(), authorization));
    }
}
