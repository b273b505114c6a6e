use std::io::Write;

use tracing::instrument;

use crate::state::AppState;

#[instrument(skip(state, out))]
pub async fn health(state: &AppState, out: &mut dyn Write) -> anyhow::Result<()> {
    let body = state.client.check_health().await?;
    writeln!(out, "{}", body.trim())?;
    Ok(())
}

#[cfg(test)]
mod health_tests {
    use super::*;
    use crate::state::fakes::Routes;
    use std::sync::Arc;

    #[tokio::test]
    async fn prints_the_body() {
        let routes = Routes::new().status("/health", 200, "LabelSpy is running\n");
        let state = AppState::fake(Arc::new(routes));
        let mut out = Vec::new();
        health(&state, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "LabelSpy is running\n");
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let state = AppState::fake(Arc::new(Routes::new()));
        let err = health(&state, &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("could not connect"));
    }
}
