use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::AnalysisResult;

pub const SHARE_TITLE: &str = "finePrint Scan Results";

/// Plain-text report: summary followed by one bullet per ingredient.
pub fn copy_text(result: &AnalysisResult) -> String {
    let bullets = result
        .ingredients
        .iter()
        .map(|i| format!("• {} - {}", i.name, i.category))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "finePrint Analysis\n\n{}\n\nIngredients ({}):\n{}",
        result.summary,
        result.ingredients.len(),
        bullets
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Cancelled,
    Unavailable,
}

/// A platform share sheet or anything that can receive a title and text.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, title: &str, text: &str) -> anyhow::Result<ShareOutcome>;
}

/// Shares the summary. A missing share target or a cancelled share is not an error.
pub async fn share(
    result: &AnalysisResult,
    target: Option<&dyn ShareTarget>,
) -> anyhow::Result<ShareOutcome> {
    let Some(target) = target.filter(|t| t.is_available()) else {
        debug!("no share target available");
        return Ok(ShareOutcome::Unavailable);
    };
    let outcome = target.share(SHARE_TITLE, &result.summary).await?;
    if outcome == ShareOutcome::Cancelled {
        info!(scan_id = %result.scan_id, "share cancelled");
    }
    Ok(outcome)
}
