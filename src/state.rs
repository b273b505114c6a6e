use std::sync::Arc;

use anyhow::Context;

use crate::api::{ApiClient, HttpTransport, RetryPolicy, Transport};
use crate::auth::{self, FakeIdentity, IdentitySession};
use crate::config::AppConfig;

/// Shared handles for one CLI invocation.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: ApiClient,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config)
    }

    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let http = HttpTransport::build_client(config.timeout, config.connect_timeout)
            .context("building HTTP client")?;
        let session = auth::session_from_config(http.clone(), &config.identity);
        let client = ApiClient::from_config(&config, http, session);
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        transport: Arc<dyn Transport>,
        session: Arc<dyn IdentitySession>,
    ) -> Self {
        let client = ApiClient::new(config.api_base_url.clone(), transport, session)
            .with_retry(RetryPolicy::new(config.retry_delays.clone()));
        Self { config, client }
    }

    /// Signed-in fake user, a single attempt per request.
    pub fn fake(transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(AppConfig {
            api_base_url: "http://api.test/api".into(),
            retry_delays: Vec::new(),
            ..AppConfig::default()
        });
        let session = Arc::new(FakeIdentity::signed_in("uid-test", "test@example.com"));
        Self::from_parts(config, transport, session).with_retry(RetryPolicy::no_retry())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.client = self.client.with_retry(retry);
        self
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use async_trait::async_trait;

    use crate::api::{ApiRequest, ApiResponse, Transport};
    use crate::error::TransportError;
    use std::sync::Mutex;

    /// Answers by URL suffix so concurrent requests can arrive in any order.
    #[derive(Default)]
    pub(crate) struct Routes {
        routes: Vec<(String, Result<ApiResponse, TransportError>)>,
        pub seen: Mutex<Vec<ApiRequest>>,
    }

    impl Routes {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on(mut self, path: &str, outcome: Result<ApiResponse, TransportError>) -> Self {
            self.routes.push((path.to_string(), outcome));
            self
        }

        pub fn json(self, path: &str, body: serde_json::Value) -> Self {
            self.on(
                path,
                Ok(ApiResponse {
                    status: 200,
                    body: body.to_string(),
                }),
            )
        }

        pub fn status(self, path: &str, status: u16, body: &str) -> Self {
            self.on(
                path,
                Ok(ApiResponse {
                    status,
                    body: body.to_string(),
                }),
            )
        }

        pub fn down(self, path: &str) -> Self {
            self.on(path, Err(TransportError("connection reset".into())))
        }

        pub fn seen_paths(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|r| format!("{} {}", r.method, r.url))
                .collect()
        }
    }

    #[async_trait]
    impl Transport for Routes {
        async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
            self.seen.lock().unwrap().push(req.clone());
            self.routes
                .iter()
                .find(|(path, _)| req.url.ends_with(path.as_str()))
                .map(|(_, outcome)| outcome.clone())
                .unwrap_or_else(|| Err(TransportError(format!("no route for {}", req.url))))
        }
    }
}
