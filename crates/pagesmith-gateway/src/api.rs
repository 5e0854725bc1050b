//! Remote content API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, Url};
use serde::Deserialize;

use pagesmith_model::{Blob, ContentDocument, ImageRef};

use crate::error::{GatewayError, GatewayResult};

/// Default API base, matching the reference server's defaults.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// An image to upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

impl ImageUpload {
    pub fn from_blob(blob: &Blob, file_name: impl Into<String>) -> Self {
        Self {
            bytes: blob.bytes.to_vec(),
            file_name: file_name.into(),
            mime: blob.mime.clone(),
        }
    }
}

/// The remote operations the persistence gateway relies on.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// `GET /content`
    async fn fetch_content(&self) -> GatewayResult<ContentDocument>;

    /// `PUT /content`, returning the document as stored by the server.
    async fn put_content(&self, doc: &ContentDocument) -> GatewayResult<ContentDocument>;

    /// `POST /images`, returning the URL of the stored image.
    async fn upload_image(&self, upload: ImageUpload) -> GatewayResult<ImageRef>;
}

/// Settings for [`HttpContentApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Bearer token sent with every request when present.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            token: None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// [`ContentApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContentApi {
    client: Client,
    config: ApiConfig,
}

impl HttpContentApi {
    pub fn new(config: ApiConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Replace the bearer token, e.g. after signing in or out.
    pub fn set_token(&mut self, token: Option<String>) {
        self.config.token = token;
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Turn a relative URL returned by the server into an absolute one.
    fn absolute_url(&self, url: &str) -> String {
        match Url::parse(url) {
            Ok(_) => url.to_string(),
            Err(_) => Url::parse(&self.config.base_url)
                .and_then(|base| base.join(url))
                .map(|u| u.to_string())
                .unwrap_or_else(|_| url.to_string()),
        }
    }
}

/// Map a non-2xx response to an error carrying the body's `message`.
async fn check_status(response: Response, fallback: &str) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| fallback.to_string());

    Err(GatewayError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn fetch_content(&self) -> GatewayResult<ContentDocument> {
        let response = self
            .authorize(self.client.get(self.endpoint("/content")))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        check_status(response, "Request failed")
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn put_content(&self, doc: &ContentDocument) -> GatewayResult<ContentDocument> {
        let response = self
            .authorize(self.client.put(self.endpoint("/content")))
            .json(doc)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        check_status(response, "Request failed")
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn upload_image(&self, upload: ImageUpload) -> GatewayResult<ImageRef> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .authorize(self.client.post(self.endpoint("/images")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let body: UploadResponse = check_status(response, "Image upload failed")
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(ImageRef::parse(self.absolute_url(&body.url)))
    }
}
