use std::sync::Arc;

use crate::config::IdentityConfig;

pub mod claims;
pub mod fake;
mod firebase;
mod session;

pub use fake::FakeIdentity;
pub use firebase::FirebaseSession;
pub use session::{AnonymousSession, IdentitySession, SessionUser, StaticTokenSession};

pub fn session_from_config(http: reqwest::Client, cfg: &IdentityConfig) -> Arc<dyn IdentitySession> {
    match cfg {
        IdentityConfig::Anonymous => Arc::new(AnonymousSession),
        IdentityConfig::StaticToken(token) => Arc::new(StaticTokenSession::new(token.clone())),
        IdentityConfig::Firebase(fb) => Arc::new(FirebaseSession::new(http, fb)),
    }
}
