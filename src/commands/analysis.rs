use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::render;
use crate::analyze::{demo, split_ingredients, validate_ingredient_text};
use crate::api::AnalysisResult;
use crate::images::ImageUpload;
use crate::results::{copy_text, share, IngredientFilter, ShareOutcome, ShareTarget};
use crate::state::AppState;

/// How a fresh analysis is presented.
#[derive(Debug, Clone, Default)]
pub struct ResultOptions {
    pub query: String,
    pub category: Option<String>,
    /// Emit the plain-text report instead of the detailed view.
    pub copy: bool,
    pub share: bool,
    /// Where copied or shared text goes; stdout when unset.
    pub out: Option<PathBuf>,
}

impl ResultOptions {
    fn filter(&self) -> IngredientFilter {
        IngredientFilter::new(self.query.clone(), self.category.clone())
    }
}

#[instrument(skip(state, path, opts, out), fields(path = %path.display()))]
pub async fn scan(
    state: &AppState,
    path: &Path,
    opts: &ResultOptions,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let upload = ImageUpload::from_path(path).await?;
    let res = state.client.scan_image(upload).await?;
    info!(scan_id = %res.scan_id, ingredients = res.ingredients.len(), "scan complete");
    present(&res, opts, out).await
}

/// With `demo` set, a failed request falls back to the offline keyword result.
#[instrument(skip(state, text, opts, out))]
pub async fn analyze(
    state: &AppState,
    text: &str,
    demo_fallback: bool,
    opts: &ResultOptions,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let text = validate_ingredient_text(text)?;
    info!(detected = split_ingredients(text).len(), "analyzing ingredient list");

    let res = match state.client.analyze_text(text).await {
        Ok(res) => res,
        Err(e) if demo_fallback => {
            warn!(error = %e, "analysis failed, showing demo result");
            demo::mock_result(text, OffsetDateTime::now_utc())
        }
        Err(e) => return Err(e.into()),
    };
    present(&res, opts, out).await
}

async fn present(res: &AnalysisResult, opts: &ResultOptions, out: &mut dyn Write) -> anyhow::Result<()> {
    if opts.share {
        let target = TextShare {
            path: opts.out.clone(),
            pending: Mutex::new(String::new()),
        };
        let outcome = share(res, Some(&target)).await?;
        out.write_all(target.pending.into_inner().as_bytes())?;
        if outcome == ShareOutcome::Cancelled {
            writeln!(out, "Share cancelled")?;
        }
        return Ok(());
    }
    if opts.copy {
        let text = copy_text(res);
        return match &opts.out {
            Some(path) => write_file(path, &text).await,
            None => {
                writeln!(out, "{}", text)?;
                Ok(())
            }
        };
    }
    render::result(out, res, &opts.filter())?;
    Ok(())
}

async fn write_file(path: &Path, text: &str) -> anyhow::Result<()> {
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "written");
    Ok(())
}

/// Share target for a terminal: the title and text go to a file, or are
/// held for the command's writer.
struct TextShare {
    path: Option<PathBuf>,
    pending: Mutex<String>,
}

#[async_trait]
impl ShareTarget for TextShare {
    async fn share(&self, title: &str, text: &str) -> anyhow::Result<ShareOutcome> {
        let body = format!("{}\n\n{}\n", title, text);
        match &self.path {
            Some(path) => write_file(path, &body).await?,
            None => self.pending.lock().await.push_str(&body),
        }
        Ok(ShareOutcome::Shared)
    }
}

#[cfg(test)]
mod analysis_tests {
    use super::*;
    use crate::state::fakes::Routes;
    use serde_json::json;
    use std::sync::Arc;

    fn result_body() -> serde_json::Value {
        json!({
            "scanId": "scan-1",
            "summary": "One sweetener found.",
            "ingredients": [
                { "name": "Aspartame", "eNumber": "E951", "category": "Sweetener", "origin": "Synthetic" },
                { "name": "Water", "category": "Base", "origin": "Natural" }
            ]
        })
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fineprint-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn analyze_renders_the_server_result() {
        let routes = Arc::new(Routes::new().json("/analyze", result_body()));
        let state = AppState::fake(routes.clone());
        let mut out = Vec::new();
        analyze(&state, " Aspartame, Water ", false, &ResultOptions::default(), &mut out)
            .await
            .unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Scan scan-1"));
        assert!(s.contains("[S] Aspartame (E951)"));

        let seen = routes.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        match &seen[0].body {
            crate::api::Body::Json(b) => {
                let v: serde_json::Value = serde_json::from_slice(b).unwrap();
                assert_eq!(v, json!({ "ingredients": "Aspartame, Water" }));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_text_never_reaches_the_server() {
        let routes = Arc::new(Routes::new());
        let state = AppState::fake(routes.clone());
        let err = analyze(&state, "  ", true, &ResultOptions::default(), &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter some ingredients to analyze");
        assert!(routes.seen_paths().is_empty());
    }

    #[tokio::test]
    async fn demo_fallback_only_when_asked() {
        let state = AppState::fake(Arc::new(Routes::new().down("/analyze")));
        let err = analyze(&state, "Aspartame", false, &ResultOptions::default(), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("could not connect"));

        let mut out = Vec::new();
        analyze(&state, "Aspartame, Palm Oil", true, &ResultOptions::default(), &mut out)
            .await
            .unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Scan analyze-"));
        assert!(s.contains("Analysis of 2 ingredients."));
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let state = AppState::fake(Arc::new(Routes::new().status(
            "/analyze",
            400,
            r#"{"error":"No ingredients provided"}"#,
        )));
        let err = analyze(&state, "x", false, &ResultOptions::default(), &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), r#"{"error":"No ingredients provided"}"#);
    }

    #[tokio::test]
    async fn copy_goes_to_stdout_or_file() {
        let state = AppState::fake(Arc::new(Routes::new().json("/analyze", result_body())));
        let opts = ResultOptions {
            copy: true,
            ..ResultOptions::default()
        };
        let mut out = Vec::new();
        analyze(&state, "Aspartame, Water", false, &opts, &mut out)
            .await
            .unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("finePrint Analysis\n\nOne sweetener found.\n\nIngredients (2):\n"));

        let path = temp_path("copy.txt");
        let opts = ResultOptions {
            copy: true,
            out: Some(path.clone()),
            ..ResultOptions::default()
        };
        let mut out = Vec::new();
        analyze(&state, "Aspartame, Water", false, &opts, &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("• Water - Base"));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn share_writes_title_and_summary() {
        let state = AppState::fake(Arc::new(Routes::new().json("/analyze", result_body())));
        let path = temp_path("share.txt");
        let opts = ResultOptions {
            share: true,
            out: Some(path.clone()),
            ..ResultOptions::default()
        };
        analyze(&state, "Aspartame", false, &opts, &mut Vec::new())
            .await
            .unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "finePrint Scan Results\n\nOne sweetener found.\n");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn share_without_file_goes_to_the_writer() {
        let state = AppState::fake(Arc::new(Routes::new().json("/analyze", result_body())));
        let opts = ResultOptions {
            share: true,
            ..ResultOptions::default()
        };
        let mut out = Vec::new();
        analyze(&state, "Aspartame", false, &opts, &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "finePrint Scan Results\n\nOne sweetener found.\n"
        );
    }

    #[tokio::test]
    async fn scan_rejects_non_images_before_sending() {
        let routes = Arc::new(Routes::new());
        let state = AppState::fake(routes.clone());
        let path = temp_path("label.txt");
        tokio::fs::write(&path, b"not an image").await.unwrap();
        let err = scan(&state, &path, &ResultOptions::default(), &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file (JPG, PNG)");
        assert!(routes.seen_paths().is_empty());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn scan_uploads_and_filters() {
        let routes = Arc::new(Routes::new().json("/scan", result_body()));
        let state = AppState::fake(routes.clone());
        let path = temp_path("label.png");
        tokio::fs::write(&path, [0x89, b'P', b'N', b'G']).await.unwrap();
        let opts = ResultOptions {
            category: Some("Base".into()),
            ..ResultOptions::default()
        };
        let mut out = Vec::new();
        scan(&state, &path, &opts, &mut out).await.unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Showing 1 of 2"));
        assert!(s.contains("Water"));
        assert_eq!(routes.seen_paths(), vec!["POST http://api.test/api/scan"]);
        assert!(routes.seen.lock().unwrap()[0].body.is_multipart());
        let _ = tokio::fs::remove_file(&path).await;
    }
}
