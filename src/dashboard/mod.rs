use time::OffsetDateTime;
use tracing::{instrument, warn};

use crate::api::{ApiClient, ScanSummary, TopIngredient, UserProfile};
use crate::history::{sort_newest_first, HistoryStats};

pub const TOP_LIMIT: usize = 10;
pub const RECENT_LIMIT: usize = 5;

/// Everything the account overview shows. Each part is loaded independently;
/// a failed part is simply missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub profile: Option<UserProfile>,
    pub history: Vec<ScanSummary>,
    pub top: Vec<TopIngredient>,
}

impl Dashboard {
    #[instrument(skip(client))]
    pub async fn load(client: &ApiClient) -> Self {
        let (profile, history, top) = tokio::join!(
            client.get_user_profile(),
            client.get_scan_history(),
            client.get_top_ingredients(),
        );

        let profile = profile
            .map_err(|e| warn!(error = %e, "dashboard: profile unavailable"))
            .ok();
        let mut history = history.unwrap_or_else(|e| {
            warn!(error = %e, "dashboard: scan history unavailable");
            Vec::new()
        });
        let top = top.unwrap_or_else(|e| {
            warn!(error = %e, "dashboard: top ingredients unavailable");
            Vec::new()
        });

        sort_newest_first(&mut history);
        Self {
            profile,
            history,
            top,
        }
    }

    pub fn stats(&self, now: OffsetDateTime) -> HistoryStats {
        HistoryStats::compute(&self.history, now)
    }

    pub fn recent(&self, limit: usize) -> &[ScanSummary] {
        &self.history[..self.history.len().min(limit)]
    }

    /// Most frequent first; equal counts by name so the order is stable.
    pub fn ranked_top(&self, limit: usize) -> Vec<&TopIngredient> {
        let mut ranked: Vec<&TopIngredient> = self.top.iter().collect();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
        });
        ranked.truncate(limit);
        ranked
    }
}
