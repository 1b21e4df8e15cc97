//! Per-task identity override.
//!
//! A [`Context`] impersonates another account and/or user of the same API key.
//! It is opened for one client with [`RestApiClient::scope`](crate::RestApiClient::scope)
//! and stays active only while the scoped future runs. The active contexts live in
//! task-local storage, so concurrent tasks sharing one client never see each
//! other's overrides, and nothing leaks into tasks spawned from inside a scope.

use std::future::Future;

pub(crate) const ACCOUNT_HEADER: &str = "Account";
pub(crate) const USERNAME_HEADER: &str = "Username";

tokio::task_local! {
    static ACTIVE_CONTEXTS: Vec<(u64, Context)>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    account: Option<String>,
    username: Option<String>,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Override headers to attach; empty values are left out.
    pub(crate) fn headers(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (ACCOUNT_HEADER, self.account.as_deref()),
            (USERNAME_HEADER, self.username.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| match value {
            Some(value) if !value.is_empty() => Some((name, value)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    account: Option<String>,
    username: Option<String>,
}

impl ContextBuilder {
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn build(self) -> Context {
        Context {
            account: self.account,
            username: self.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("there is already a context set for this client; close it before opening another one")]
    AlreadyActive,
}

/// Context active for `client_id` on the current task, if any.
pub(crate) fn current(client_id: u64) -> Option<Context> {
    ACTIVE_CONTEXTS
        .try_with(|contexts| {
            contexts
                .iter()
                .find(|(id, _)| *id == client_id)
                .map(|(_, context)| context.clone())
        })
        .ok()
        .flatten()
}

pub(crate) async fn scope<F>(
    client_id: u64,
    context: Context,
    future: F,
) -> Result<F::Output, ContextError>
where
    F: Future,
{
    let mut contexts = ACTIVE_CONTEXTS
        .try_with(Clone::clone)
        .unwrap_or_default();
    if contexts.iter().any(|(id, _)| *id == client_id) {
        return Err(ContextError::AlreadyActive);
    }
    contexts.push((client_id, context));

    Ok(ACTIVE_CONTEXTS.scope(contexts, future).await)
}
