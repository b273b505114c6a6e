use std::io::Write;

use time::OffsetDateTime;
use tracing::instrument;

use super::{render, require_user};
use crate::dashboard::{Dashboard, RECENT_LIMIT, TOP_LIMIT};
use crate::state::AppState;

#[instrument(skip(state, out))]
pub async fn dashboard(state: &AppState, out: &mut dyn Write) -> anyhow::Result<()> {
    require_user(state).await?;
    let dash = Dashboard::load(&state.client).await;
    let now = OffsetDateTime::now_utc();

    match &dash.profile {
        Some(p) => writeln!(out, "{} <{}>", display_name(&p.display_name, &p.email), p.email)?,
        None => writeln!(out, "Profile unavailable")?,
    }
    let stats = dash.stats(now);
    writeln!(
        out,
        "Total scans: {}  This week: {}",
        stats.total_scans, stats.this_week
    )?;

    writeln!(out, "\nRecent scans")?;
    if dash.history.is_empty() {
        writeln!(out, "  none")?;
    }
    for scan in dash.recent(RECENT_LIMIT) {
        render::scan_row(out, scan, now)?;
    }

    writeln!(out, "\nTop ingredients")?;
    let top = dash.ranked_top(TOP_LIMIT);
    if top.is_empty() {
        writeln!(out, "  none")?;
    }
    for (i, t) in top.iter().enumerate() {
        writeln!(out, "{:>3}. {} ({} times)", i + 1, t.ingredient_name, t.count)?;
    }
    Ok(())
}

/// Falls back to the local part of the email when no name was set.
pub(crate) fn display_name<'a>(name: &'a str, email: &'a str) -> &'a str {
    if !name.is_empty() {
        return name;
    }
    email.split('@').next().filter(|s| !s.is_empty()).unwrap_or("User")
}

#[cfg(test)]
mod dashboard_cmd_tests {
    use super::*;
    use crate::state::fakes::Routes;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn degrades_when_parts_fail() {
        let routes = Routes::new()
            .status("/user/profile", 404, "")
            .down("/user/scan-history")
            .json(
                "/user/top-ingredients",
                json!([
                    { "ingredientName": "Salt", "count": 2 },
                    { "ingredientName": "Sugar", "count": 7 }
                ]),
            );
        let state = AppState::fake(Arc::new(routes));
        let mut out = Vec::new();
        dashboard(&state, &mut out).await.unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("Profile unavailable\nTotal scans: 0  This week: 0\n"));
        assert!(s.contains("  1. Sugar (7 times)\n  2. Salt (2 times)"));
    }

    #[test]
    fn display_name_fallbacks() {
        assert_eq!(display_name("Ana", "ana@example.com"), "Ana");
        assert_eq!(display_name("", "ana@example.com"), "ana");
        assert_eq!(display_name("", ""), "User");
    }
}
