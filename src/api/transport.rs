use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{debug, warn};

use crate::error::TransportError;

/// A single file field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Json(Bytes),
    Multipart(FilePart),
}

impl Body {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Multipart(_))
    }
}

/// A fully built request. Cloneable so it can be replayed on retry.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Body,
}

/// Any HTTP response, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests. `Err` means no HTTP response was obtained at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn build_client(
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!("fineprint/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut rb = self
            .client
            .request(req.method.clone(), &req.url)
            .headers(req.headers.clone());

        rb = match &req.body {
            Body::Empty => rb,
            Body::Json(bytes) => rb.body(bytes.clone()),
            Body::Multipart(file) => {
                let new_part = || {
                    Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone())
                };
                // `ImageUpload::into_part` already rejects malformed content types
                let part = new_part().mime_str(&file.content_type).unwrap_or_else(|e| {
                    warn!(error = %e, content_type = %file.content_type, "invalid part content type");
                    new_part()
                });
                // reqwest sets the boundary-bearing content type itself
                rb.multipart(Form::new().part(file.field.clone(), part))
            }
        };

        let res = rb.send().await?;
        let status = res.status().as_u16();
        // A status line was received, so this is a response and is never retried.
        let body = match res.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status, error = %e, url = %req.url, "response body could not be read");
                String::new()
            }
        };
        debug!(status, bytes = body.len(), url = %req.url, "response received");
        Ok(ApiResponse { status, body })
    }
}
