//! One handler per CLI subcommand. Handlers write their report to `out` so
//! `main` decides where it goes and tests can capture it.

use anyhow::bail;

use crate::state::AppState;

pub mod analysis;
pub mod dashboard;
pub mod health;
pub mod history;
pub mod profile;
pub mod render;

pub use analysis::{analyze, scan, ResultOptions};

/// Commands that only make sense for a signed-in user.
pub(crate) async fn require_user(state: &AppState) -> anyhow::Result<()> {
    if state.client.session().current_user().await.is_none() {
        bail!(
            "Not signed in: set FINEPRINT_ID_TOKEN, or FIREBASE_API_KEY and FIREBASE_REFRESH_TOKEN"
        );
    }
    Ok(())
}
