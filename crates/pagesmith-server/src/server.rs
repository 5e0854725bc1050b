//! Content API server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use pagesmith_model::{next_id, ContentDocument};

/// Largest request body accepted; documents may carry embedded images.
const BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Configuration for the content server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding `content.json` and the `images/` folder
    pub data_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Bearer token required for writes; `None` accepts anyone
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: 3001,
            host: "127.0.0.1".to_string(),
            token: None,
        }
    }
}

impl ServerConfig {
    fn content_path(&self) -> PathBuf {
        self.data_dir.join("content.json")
    }

    fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Failed to prepare data directory {0}: {1}")]
    DataDir(String, String),
}

/// An API failure, answered as `{ "message": ... }`.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct UploadBody {
    url: String,
}

/// Shared server state.
struct ServerState {
    config: ServerConfig,
    content: RwLock<ContentDocument>,
}

/// Content API server.
pub struct ContentServer {
    state: Arc<ServerState>,
}

impl ContentServer {
    /// Create a server, reading any previously stored content.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        tokio::fs::create_dir_all(config.images_dir())
            .await
            .map_err(|e| ServerError::DataDir(config.data_dir.display().to_string(), e.to_string()))?;

        let content = read_content(&config.content_path()).await;

        Ok(Self {
            state: Arc::new(ServerState {
                config,
                content: RwLock::new(content),
            }),
        })
    }

    /// The API routes, ready to be served.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/content", get(get_content).put(put_content))
            .route("/api/images", post(upload_image))
            .nest_service("/uploads", ServeDir::new(self.state.config.images_dir()))
            .layer(DefaultBodyLimit::max(BODY_LIMIT))
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.state))
    }

    /// Bind the configured address and serve until the process ends.
    pub async fn start(self) -> Result<(), ServerError> {
        let config = &self.state.config;
        let raw = format!("{}:{}", config.host, config.port);
        let addr: SocketAddr = raw.parse().map_err(|_| ServerError::InvalidAddress(raw))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Content API listening at http://{}/api", addr);

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> Result<(), ServerError> {
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::InvalidAddress(e.to_string()))?;

        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))
    }
}

/// Read stored content, falling back to the default page.
async fn read_content(path: &Path) -> ContentDocument {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            ContentDocument::default()
        }),
        Err(_) => ContentDocument::default(),
    }
}

fn authorize(state: &ServerState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = &state.config.token else {
        return Ok(());
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Keep only characters that are safe in a file name.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

async fn get_content(State(state): State<Arc<ServerState>>) -> Json<ContentDocument> {
    Json(state.content.read().await.clone())
}

async fn put_content(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(doc): Json<ContentDocument>,
) -> Result<Json<ContentDocument>, ApiError> {
    authorize(&state, &headers)?;

    let text = serde_json::to_string_pretty(&doc)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut content = state.content.write().await;
    tokio::fs::write(state.config.content_path(), text)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    *content = doc.clone();

    tracing::info!("Stored content with {} sections", doc.sections.len());

    Ok(Json(doc))
}

async fn upload_image(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadBody>, ApiError> {
    authorize(&state, &headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original = field.file_name().unwrap_or("image").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

        let name = format!("{}-{}", next_id(), sanitize_file_name(&original));
        tokio::fs::write(state.config.images_dir().join(&name), &bytes)
            .await
            .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

        tracing::info!("Stored image {} ({} bytes)", name, bytes.len());

        return Ok(Json(UploadBody {
            url: format!("/uploads/{name}"),
        }));
    }

    Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing image field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn spawn(config: ServerConfig) -> String {
        let server = ContentServer::new(config).await.unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server.serve(listener));
        format!("http://{addr}")
    }

    #[test]
    fn creates_server_with_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.content_path(), PathBuf::from("data/content.json"));
    }

    #[test]
    fn sanitizes_uploaded_file_names() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_file_name("my photo.png"), "myphoto.png");
        assert_eq!(sanitize_file_name("..."), "image");
    }

    #[tokio::test]
    async fn serves_default_content_when_empty() {
        let temp = tempdir().unwrap();
        let base = spawn(ServerConfig {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        })
        .await;

        let doc: ContentDocument = reqwest::get(format!("{base}/api/content"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(doc, ContentDocument::default());
    }

    #[tokio::test]
    async fn stores_content_on_disk() {
        let temp = tempdir().unwrap();
        let base = spawn(ServerConfig {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        })
        .await;

        let mut doc = ContentDocument::default();
        doc = doc.with_section_added(pagesmith_model::Section::new(
            1,
            pagesmith_model::SectionKind::Text,
            "Stored",
        ));

        let response = reqwest::Client::new()
            .put(format!("{base}/api/content"))
            .json(&doc)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let on_disk = std::fs::read_to_string(temp.path().join("content.json")).unwrap();
        let stored: ContentDocument = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(stored, doc);
    }

    #[tokio::test]
    async fn uploaded_images_are_served_from_uploads() {
        let temp = tempdir().unwrap();
        let base = spawn(ServerConfig {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        })
        .await;

        let part = reqwest::multipart::Part::bytes(b"PNGDATA".to_vec())
            .file_name("logo.png")
            .mime_str("image/png")
            .unwrap();
        let form = reqwest::multipart::Form::new().part("image", part);
        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{base}/api/images"))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-logo.png"));

        let served = reqwest::get(format!("{base}{url}")).await.unwrap();
        assert!(served.status().is_success());
        assert_eq!(&served.bytes().await.unwrap()[..], b"PNGDATA");
    }

    #[tokio::test]
    async fn rejects_writes_without_token() {
        let temp = tempdir().unwrap();
        let base = spawn(ServerConfig {
            data_dir: temp.path().to_path_buf(),
            token: Some("secret".into()),
            ..Default::default()
        })
        .await;

        let response = reqwest::Client::new()
            .put(format!("{base}/api/content"))
            .json(&ContentDocument::default())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 401);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Unauthorized");
    }
}
