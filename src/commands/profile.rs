use std::io::Write;

use anyhow::bail;
use tracing::{info, instrument};

use super::dashboard::display_name;
use super::require_user;
use crate::api::{ProfileUpdate, UserProfile};
use crate::state::AppState;

#[instrument(skip(state, out))]
pub async fn show(state: &AppState, out: &mut dyn Write) -> anyhow::Result<()> {
    require_user(state).await?;
    let profile = state.client.get_user_profile().await?;
    print_profile(out, &profile)?;
    Ok(())
}

#[instrument(skip(state, out))]
pub async fn rename(state: &AppState, name: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    require_user(state).await?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Display name cannot be empty");
    }
    let profile = state
        .client
        .update_user_profile(&ProfileUpdate::display_name(name))
        .await?;
    info!(uid = %profile.uid, "profile renamed");
    print_profile(out, &profile)?;
    Ok(())
}

#[instrument(skip(state, out))]
pub async fn delete(state: &AppState, confirmed: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    require_user(state).await?;
    if !confirmed {
        bail!("Deleting the profile removes all scan history; pass --yes to confirm");
    }
    state.client.delete_user_profile().await?;
    writeln!(out, "Profile deleted")?;
    Ok(())
}

fn print_profile(out: &mut dyn Write, p: &UserProfile) -> std::io::Result<()> {
    writeln!(out, "{}", display_name(&p.display_name, &p.email))?;
    writeln!(out, "  uid:   {}", p.uid)?;
    writeln!(out, "  email: {}", p.email)?;
    if let Some(history) = &p.scan_history {
        writeln!(out, "  scans: {}", history.len())?;
    }
    if !p.ingredient_counts.is_empty() {
        writeln!(out, "  ingredients seen: {}", p.ingredient_counts.len())?;
    }
    Ok(())
}
