//! HTTP surface of the dashboard backend.
//!
//! Two JSON endpoints back the browser client, plus an optional static file
//! fallback that serves the client bundle from the configured web root.

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use mime_guess::MimeGuess;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, task};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

use crate::categories::{fetch_categories, with_all_option};
use crate::config::{FetchLimits, RuntimeConfig};
use crate::dashboard::trending_videos;
use crate::metadata::{
    CategoryOption, VideoQuery, VideoRecord, normalize_category, normalize_region,
};
use crate::ranking::{ShortsFilter, SortKey};
use crate::youtube::{UpstreamError, VideoPlatform, YoutubeClient};

pub const MISSING_CREDENTIAL: &str = "Missing YOUTUBE_API_KEY";

#[derive(Clone)]
pub struct AppState {
    platform: Option<Arc<dyn VideoPlatform>>,
    settings: Arc<Settings>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub default_region: String,
    pub limits: FetchLimits,
    pub www_root: Option<PathBuf>,
}

impl AppState {
    pub fn new(platform: Option<Arc<dyn VideoPlatform>>, settings: Settings) -> Self {
        Self {
            platform,
            settings: Arc::new(settings),
        }
    }

    /// Wires the real upstream client when a credential is configured.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let platform = config.youtube_api_key.as_ref().map(|key| {
            Arc::new(YoutubeClient::new(
                key.clone(),
                config.youtube_api_base.clone(),
                config.upstream_timeout,
            )) as Arc<dyn VideoPlatform>
        });

        Self::new(
            platform,
            Settings {
                default_region: config.default_region.clone(),
                limits: config.limits,
                www_root: config.www_root.clone(),
            },
        )
    }

    fn platform(&self) -> ApiResult<Arc<dyn VideoPlatform>> {
        self.platform
            .clone()
            .ok_or_else(|| ApiError::internal(MISSING_CREDENTIAL))
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "method not allowed".into(),
            details: None,
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    /// Forwards the upstream status and body; transport problems and
    /// out-of-range statuses become 502.
    fn upstream(message: impl Into<String>, err: UpstreamError) -> Self {
        let status = match &err {
            UpstreamError::Status { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            UpstreamError::Transport(_) | UpstreamError::Decode(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: message.into(),
            details: Some(err.details()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => serde_json::json!({ "error": self.message, "details": details }),
            None => serde_json::json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/categories", get(list_categories))
        .route("/api/videos", get(list_videos))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(serve_asset)
        .with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Runs a blocking upstream job off the async workers.
async fn run_upstream<T, F>(context: &'static str, job: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, UpstreamError> + Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(|err| ApiError::internal(format!("task join error: {err}")))?
        .map_err(|err| {
            error!(error = %err, details = %err.details(), "{context}");
            ApiError::upstream(context, err)
        })
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    credential: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthPayload> {
    Json(HealthPayload {
        status: "ok",
        credential: state.platform.is_some(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct CategoriesParams {
    region: Option<String>,
}

#[derive(Serialize)]
struct CategoriesPayload {
    categories: Vec<CategoryOption>,
}

async fn list_categories(
    State(state): State<AppState>,
    params: Result<Query<CategoriesParams>, QueryRejection>,
) -> ApiResult<Json<CategoriesPayload>> {
    let Query(params) = params?;
    let platform = state.platform()?;
    let region = normalize_region(params.region.as_deref(), &state.settings.default_region);

    let categories = run_upstream("Failed to fetch categories", move || {
        fetch_categories(platform.as_ref(), &region)
    })
    .await?;

    Ok(Json(CategoriesPayload {
        categories: with_all_option(categories),
    }))
}

#[derive(Debug, Default, Deserialize)]
struct VideosParams {
    category: Option<String>,
    region: Option<String>,
    sort: Option<String>,
    shorts: Option<String>,
    // Collected by the client but not applied to retrieval yet.
    period: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideosPayload {
    items: Vec<VideoRecord>,
    fetched_at: DateTime<Utc>,
    region: String,
    category: String,
    sort: SortKey,
    shorts: ShortsFilter,
}

async fn list_videos(
    State(state): State<AppState>,
    params: Result<Query<VideosParams>, QueryRejection>,
) -> ApiResult<Json<VideosPayload>> {
    let Query(params) = params?;
    let platform = state.platform()?;
    let query = VideoQuery {
        region: normalize_region(params.region.as_deref(), &state.settings.default_region),
        category: normalize_category(params.category.as_deref()),
        sort: SortKey::parse(params.sort.as_deref()),
        shorts: ShortsFilter::parse(params.shorts.as_deref()),
    };
    if let Some(period) = params.period.as_deref() {
        debug!(period, "ignoring period filter");
    }

    let limits = state.settings.limits;
    let job_query = query.clone();
    let items = run_upstream("Failed to fetch videos", move || {
        trending_videos(platform.as_ref(), &job_query, limits)
    })
    .await?;

    info!(
        region = %query.region,
        category = %query.category,
        sort = query.sort.as_str(),
        shorts = query.shorts.as_str(),
        count = items.len(),
        "served trending videos"
    );

    Ok(Json(VideosPayload {
        items,
        fetched_at: Utc::now(),
        region: query.region,
        category: query.category,
        sort: query.sort,
        shorts: query.shorts,
    }))
}

async fn serve_asset(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> ApiResult<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ApiError::method_not_allowed());
    }
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return Err(ApiError::not_found("unknown endpoint"));
    }

    let root = state
        .settings
        .www_root
        .as_deref()
        .ok_or_else(|| ApiError::not_found("file not found"))?;
    let relative = sanitize_asset_path(path).ok_or_else(|| ApiError::not_found("file not found"))?;

    let mut target = root.join(relative);
    if tokio::fs::metadata(&target)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
    {
        target.push("index.html");
    }

    stream_file(target).await
}

/// Maps a request path onto a relative file path, rejecting anything that
/// could leave the web root. Components are checked after percent-decoding.
fn sanitize_asset_path(path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(path).ok()?;
    let mut relative = PathBuf::new();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.as_os_str().is_empty() {
        relative.push("index.html");
    }
    Some(relative)
}

async fn stream_file(path: PathBuf) -> ApiResult<Response> {
    let file = File::open(&path)
        .await
        .map_err(|_| ApiError::not_found("file not found"))?;

    let mut headers = HeaderMap::new();
    if let Some(mime) = MimeGuess::from_path(&path).first() {
        if let Ok(value) = mime.to_string().parse() {
            headers.insert(header::CONTENT_TYPE, value);
        }
    }

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((headers, body).into_response())
}
