use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::dto::{
    AnalysisResult, AnalyzeRequest, ProfileUpdate, ScanSummary, TopIngredient, UserProfile,
};
use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use super::transport::{ApiRequest, ApiResponse, Body, HttpTransport, Transport};
use crate::auth::IdentitySession;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::images::ImageUpload;

/// Typed client for the ingredient-analysis service.
///
/// Every call except [`ApiClient::check_health`] asks the session for a fresh
/// bearer token and retries transport failures per the configured policy.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn IdentitySession>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<dyn IdentitySession>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn from_config(
        cfg: &AppConfig,
        http: reqwest::Client,
        session: Arc<dyn IdentitySession>,
    ) -> Self {
        Self::new(
            cfg.api_base_url.clone(),
            Arc::new(HttpTransport::new(http)),
            session,
        )
        .with_retry(RetryPolicy::new(cfg.retry_delays.clone()))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn session(&self) -> &Arc<dyn IdentitySession> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Caller headers, then the bearer token, then the JSON content type
    /// (left out for multipart so the transport can add its boundary).
    async fn build_headers(&self, extra: &HeaderMap, body: &Body) -> HeaderMap {
        let mut headers = extra.clone();

        match self.session.id_token().await {
            Ok(Some(token)) => match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(v) => {
                    headers.insert(AUTHORIZATION, v);
                }
                Err(e) => error!(error = %e, "token is not a valid header value"),
            },
            Ok(None) => warn!("no user logged in - request will be unauthenticated"),
            Err(e) => error!(error = %e, "error getting auth token"),
        }

        if !body.is_multipart() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers
    }

    /// Sends an arbitrary request with the shared auth, header and retry handling.
    /// Non-success statuses are returned as responses, not errors.
    #[instrument(skip(self, method, extra, body), fields(method = %method))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        extra: HeaderMap,
        body: Body,
    ) -> ApiResult<ApiResponse> {
        let url = self.url(path);
        let res = self
            .retry
            .run(self.sleeper.as_ref(), |attempt| {
                let (method, url, extra, body) =
                    (method.clone(), url.clone(), extra.clone(), body.clone());
                async move {
                    let headers = self.build_headers(&extra, &body).await;
                    debug!(attempt = attempt + 1, %url, "sending request");
                    let req = ApiRequest {
                        method,
                        url,
                        headers,
                        body,
                    };
                    self.transport.send(&req).await
                }
            })
            .await?;
        info!(status = res.status, "response");
        Ok(res)
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Body,
        fallback: &str,
    ) -> ApiResult<ApiResponse> {
        let res = self.request(method, path, HeaderMap::new(), body).await?;
        ensure_success(res, fallback)
    }

    #[instrument(skip(self, upload), fields(file = %upload.file_name, bytes = upload.body.len()))]
    pub async fn scan_image(&self, upload: ImageUpload) -> ApiResult<AnalysisResult> {
        let body = Body::Multipart(upload.into_part("file")?);
        let res = self
            .call(Method::POST, "/scan", body, "Failed to analyze image")
            .await?;
        decode(&res)
    }

    #[instrument(skip(self, ingredients))]
    pub async fn analyze_text(&self, ingredients: &str) -> ApiResult<AnalysisResult> {
        let body = json_body(&AnalyzeRequest {
            ingredients: ingredients.trim(),
        })?;
        let res = self
            .call(Method::POST, "/analyze", body, "Failed to analyze ingredients")
            .await?;
        decode(&res)
    }

    #[instrument(skip(self))]
    pub async fn get_user_profile(&self) -> ApiResult<UserProfile> {
        let res = self
            .call(Method::GET, "/user/profile", Body::Empty, "Failed to get user profile")
            .await?;
        decode(&res)
    }

    #[instrument(skip(self))]
    pub async fn update_user_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        let res = self
            .call(
                Method::POST,
                "/user/profile",
                json_body(update)?,
                "Failed to update user profile",
            )
            .await?;
        decode(&res)
    }

    #[instrument(skip(self))]
    pub async fn delete_user_profile(&self) -> ApiResult<()> {
        self.call(
            Method::DELETE,
            "/user/profile",
            Body::Empty,
            "Failed to delete user profile",
        )
        .await?;
        Ok(())
    }

    /// Server order, which is not guaranteed; sort before relying on it.
    #[instrument(skip(self))]
    pub async fn get_scan_history(&self) -> ApiResult<Vec<ScanSummary>> {
        let res = self
            .call(
                Method::GET,
                "/user/scan-history",
                Body::Empty,
                "Failed to get scan history",
            )
            .await?;
        decode_list(&res)
    }

    #[instrument(skip(self))]
    pub async fn get_top_ingredients(&self) -> ApiResult<Vec<TopIngredient>> {
        let res = self
            .call(
                Method::GET,
                "/user/top-ingredients",
                Body::Empty,
                "Failed to get top ingredients",
            )
            .await?;
        decode_list(&res)
    }

    /// Unauthenticated, single attempt; returns the body whatever the status.
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> ApiResult<String> {
        let req = ApiRequest {
            method: Method::GET,
            url: self.url("/health"),
            headers: HeaderMap::new(),
            body: Body::Empty,
        };
        match self.transport.send(&req).await {
            Ok(res) => Ok(res.body),
            Err(last) => Err(ApiError::Unreachable { attempts: 1, last }),
        }
    }
}

fn json_body<T: serde::Serialize>(value: &T) -> ApiResult<Body> {
    let bytes = serde_json::to_vec(value).map_err(|e| ApiError::Request(e.to_string()))?;
    Ok(Body::Json(Bytes::from(bytes)))
}

fn ensure_success(res: ApiResponse, fallback: &str) -> ApiResult<ApiResponse> {
    if res.is_success() {
        return Ok(res);
    }
    let message = if res.body.trim().is_empty() {
        fallback.to_string()
    } else {
        res.body
    };
    warn!(status = res.status, %message, "request rejected");
    Err(ApiError::Server {
        status: res.status,
        message,
    })
}

fn decode<T: DeserializeOwned>(res: &ApiResponse) -> ApiResult<T> {
    serde_json::from_str(&res.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Empty or `null` bodies count as an empty list.
fn decode_list<T: DeserializeOwned>(res: &ApiResponse) -> ApiResult<Vec<T>> {
    if res.body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let list: Option<Vec<T>> = decode(res)?;
    Ok(list.unwrap_or_default())
}
