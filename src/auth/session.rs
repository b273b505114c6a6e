use async_trait::async_trait;
use tracing::warn;

use super::claims::{self, Claims};

/// The signed-in user as seen by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(c: Claims) -> Self {
        Self {
            uid: c.sub,
            email: c.email,
            display_name: c.name,
        }
    }
}

/// Source of bearer credentials for the API client.
///
/// Implementations own any token caching; callers ask for a token on every request.
#[async_trait]
pub trait IdentitySession: Send + Sync {
    async fn current_user(&self) -> Option<SessionUser>;

    /// `Ok(None)` means nobody is signed in.
    async fn id_token(&self) -> anyhow::Result<Option<String>>;
}

/// Never signed in.
#[derive(Debug, Clone, Default)]
pub struct AnonymousSession;

#[async_trait]
impl IdentitySession for AnonymousSession {
    async fn current_user(&self) -> Option<SessionUser> {
        None
    }

    async fn id_token(&self) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// A token obtained out of band (e.g. copied from a signed-in browser session).
#[derive(Debug, Clone)]
pub struct StaticTokenSession {
    token: String,
}

impl StaticTokenSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentitySession for StaticTokenSession {
    async fn current_user(&self) -> Option<SessionUser> {
        match claims::peek(&self.token) {
            Ok(c) => Some(c.into()),
            Err(e) => {
                warn!(error = %e, "static token is not a readable jwt");
                None
            }
        }
    }

    async fn id_token(&self) -> anyhow::Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn anonymous_has_no_user_and_no_token() {
        let s = AnonymousSession;
        assert!(s.current_user().await.is_none());
        assert!(s.id_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn static_token_is_returned_as_is() {
        let s = StaticTokenSession::new("opaque");
        assert_eq!(s.id_token().await.unwrap().as_deref(), Some("opaque"));
        // not a jwt, so no user can be derived
        assert!(s.current_user().await.is_none());
    }
}
