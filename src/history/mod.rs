use time::{macros::format_description, Duration, OffsetDateTime};

use crate::api::ScanSummary;

const PREVIEW_NAMES: usize = 3;

/// Scans with at least one ingredient name containing `query`, ignoring case.
pub fn filter_history<'a>(history: &'a [ScanSummary], query: &str) -> Vec<&'a ScanSummary> {
    if query.is_empty() {
        return history.iter().collect();
    }
    let q = query.to_lowercase();
    history
        .iter()
        .filter(|scan| {
            scan.ingredient_names
                .iter()
                .any(|name| name.to_lowercase().contains(&q))
        })
        .collect()
}

/// The server makes no ordering promise, so views call this before rendering.
pub fn sort_newest_first(history: &mut [ScanSummary]) {
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_scans: usize,
    pub this_week: usize,
    pub total_ingredients: usize,
}

impl HistoryStats {
    pub fn compute(history: &[ScanSummary], now: OffsetDateTime) -> Self {
        let week_ago = now - Duration::days(7);
        Self {
            total_scans: history.len(),
            this_week: history.iter().filter(|s| s.timestamp >= week_ago).count(),
            total_ingredients: history.iter().map(|s| s.ingredient_names.len()).sum(),
        }
    }
}

/// "Today", "Yesterday", "N days ago" within a week, then a short date like "Mar 4".
pub fn relative_label(ts: OffsetDateTime, now: OffsetDateTime) -> String {
    let days = (now - ts).whole_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        _ => ts
            .format(format_description!("[month repr:short] [day padding:none]"))
            .unwrap_or_else(|_| ts.date().to_string()),
    }
}

pub fn preview(scan: &ScanSummary) -> String {
    let shown = scan
        .ingredient_names
        .iter()
        .take(PREVIEW_NAMES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if scan.ingredient_names.len() > PREVIEW_NAMES {
        format!("{}...", shown)
    } else {
        shown
    }
}
