use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use time::{Duration as TimeDuration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::claims;
use super::session::{IdentitySession, SessionUser};
use crate::config::FirebaseConfig;

/// Refresh this long before the provider-reported expiry.
const REFRESH_MARGIN: TimeDuration = TimeDuration::minutes(5);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    id_token: String,
    user: SessionUser,
    expires_at: OffsetDateTime,
}

#[derive(Debug)]
struct State {
    refresh_token: String,
    cached: Option<CachedToken>,
}

/// Google-federated sign-in session backed by a long-lived refresh token.
///
/// Mirrors what the provider SDK does in a browser: the short-lived ID token is kept
/// here and silently re-minted when it is about to expire.
pub struct FirebaseSession {
    http: reqwest::Client,
    api_key: String,
    token_url: String,
    state: Mutex<State>,
}

impl FirebaseSession {
    pub fn new(http: reqwest::Client, cfg: &FirebaseConfig) -> Self {
        Self {
            http,
            api_key: cfg.api_key.clone(),
            token_url: cfg.token_url.clone(),
            state: Mutex::new(State {
                refresh_token: cfg.refresh_token.clone(),
                cached: None,
            }),
        }
    }

    async fn fresh_token(&self) -> anyhow::Result<CachedToken> {
        let mut state = self.state.lock().await;
        if let Some(cached) = &state.cached {
            if cached.expires_at - OffsetDateTime::now_utc() > REFRESH_MARGIN {
                return Ok(cached.clone());
            }
        }

        let minted = self.exchange(&state.refresh_token).await?;
        state.refresh_token = minted.1;
        state.cached = Some(minted.0.clone());
        Ok(minted.0)
    }

    #[instrument(skip(self, refresh_token))]
    async fn exchange(&self, refresh_token: &str) -> anyhow::Result<(CachedToken, String)> {
        let res = self
            .http
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .context("secure token request")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, "secure token exchange rejected");
            anyhow::bail!("token refresh failed ({}): {}", status, body);
        }

        let body: TokenResponse = res.json().await.context("decode secure token response")?;
        let parsed = claims::peek(&body.id_token).context("read id token claims")?;

        // Prefer the token's own exp; fall back to expires_in.
        let expires_at = if parsed.exp > 0 {
            parsed.expires_at()
        } else {
            let secs = body
                .expires_in
                .as_deref()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(3600);
            OffsetDateTime::now_utc() + TimeDuration::seconds(secs)
        };

        debug!(uid = %parsed.sub, %expires_at, "id token refreshed");
        Ok((
            CachedToken {
                id_token: body.id_token,
                user: parsed.into(),
                expires_at,
            },
            body.refresh_token,
        ))
    }
}

#[async_trait]
impl IdentitySession for FirebaseSession {
    async fn current_user(&self) -> Option<SessionUser> {
        match self.fresh_token().await {
            Ok(t) => Some(t.user),
            Err(e) => {
                warn!(error = %e, "no usable firebase session");
                None
            }
        }
    }

    async fn id_token(&self) -> anyhow::Result<Option<String>> {
        let token = self.fresh_token().await?;
        Ok(Some(token.id_token))
    }
}
