use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use time::{Duration as TimeDuration, OffsetDateTime};

use super::claims::Claims;
use super::session::{IdentitySession, SessionUser};

/// In-memory identity provider for tests and offline demos.
///
/// Mints HS256 tokens for the configured user and counts how often one was requested.
pub struct FakeIdentity {
    encoding: EncodingKey,
    user: Option<SessionUser>,
    fail: bool,
    issued: AtomicUsize,
}

impl FakeIdentity {
    pub fn signed_in(uid: &str, email: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(b"fake-identity"),
            user: Some(SessionUser {
                uid: uid.into(),
                email: Some(email.into()),
                display_name: email.split('@').next().map(str::to_string),
            }),
            fail: false,
            issued: AtomicUsize::new(0),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            encoding: EncodingKey::from_secret(b"fake-identity"),
            user: None,
            fail: false,
            issued: AtomicUsize::new(0),
        }
    }

    /// Signed in, but the provider errors when asked for a token.
    pub fn failing(uid: &str) -> Self {
        Self {
            fail: true,
            ..Self::signed_in(uid, "broken@example.com")
        }
    }

    pub fn tokens_issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn mint(&self, user: &SessionUser) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user.uid.clone(),
            iat: now.unix_timestamp(),
            exp: (now + TimeDuration::hours(1)).unix_timestamp(),
            iss: "fake-identity".into(),
            aud: "fineprint".into(),
            email: user.email.clone(),
            name: user.display_name.clone(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}

#[async_trait]
impl IdentitySession for FakeIdentity {
    async fn current_user(&self) -> Option<SessionUser> {
        self.user.clone()
    }

    async fn id_token(&self) -> anyhow::Result<Option<String>> {
        let Some(user) = &self.user else {
            return Ok(None);
        };
        if self.fail {
            anyhow::bail!("identity provider unavailable");
        }
        let token = self.mint(user)?;
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(Some(token))
    }
}
