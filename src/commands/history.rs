use std::io::Write;

use time::OffsetDateTime;
use tracing::instrument;

use super::{render, require_user};
use crate::history::{filter_history, sort_newest_first, HistoryStats};
use crate::state::AppState;

#[instrument(skip(state, out))]
pub async fn history(state: &AppState, query: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    require_user(state).await?;
    let mut scans = state.client.get_scan_history().await?;
    sort_newest_first(&mut scans);

    let now = OffsetDateTime::now_utc();
    let stats = HistoryStats::compute(&scans, now);
    writeln!(
        out,
        "{} scans, {} this week, {} ingredients analyzed",
        stats.total_scans, stats.this_week, stats.total_ingredients
    )?;

    if scans.is_empty() {
        writeln!(out, "No scans yet")?;
        return Ok(());
    }
    let shown = filter_history(&scans, query);
    if shown.is_empty() {
        writeln!(out, "No scans found matching \"{}\"", query)?;
        return Ok(());
    }
    for scan in shown {
        render::scan_row(out, scan, now)?;
    }
    Ok(())
}
