use crate::app::catalog_use_case::{CatalogService, StoreInfoListing};
use crate::app::filter::CatalogQuery;
use crate::app::registry::{AppStoreRegistry, Registration};
use crate::constants::{
    app_store_not_found_message, registration_initiated_message, MSG_APPSTORE_ALREADY_REGISTERED,
    MSG_APPSTORE_UNREGISTERED, MSG_APPSTORE_URL_REQUIRED,
};
use crate::error::CatalogError;
use crate::types::{AppStoreSource, CategoryInfo, StoreInfo};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

pub const API_PREFIX: &str = "/v2/app_management";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AppStoreRegistry>,
    pub catalog: Arc<CatalogService>,
    /// Where background registration failures end up
    pub log_file: String,
    pub metrics: Option<PrometheusHandle>,
}

/// Body of every JSON response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            message: None,
            data: Some(data),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: None,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        debug!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(ApiResponse::<()>::message(self.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, CatalogError>;

// Extractor rejections answer with the same `{ message }` body as every other error.
impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        CatalogError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for CatalogError {
    fn from(rejection: QueryRejection) -> Self {
        CatalogError::InvalidInput(rejection.body_text())
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "appstore-catalog",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics are disabled").into_response(),
    }
}

async fn list_app_stores(State(state): State<AppState>) -> ApiResult<Vec<AppStoreSource>> {
    Ok(Json(ApiResponse::data(state.registry.list().await)))
}

#[derive(Debug, Deserialize)]
struct RegisterParams {
    url: Option<String>,
}

async fn register_app_store(
    State(state): State<AppState>,
    params: Result<Query<RegisterParams>, QueryRejection>,
) -> ApiResult<()> {
    let Query(params) = params?;
    let url = match params.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => {
            return Err(CatalogError::InvalidInput(
                MSG_APPSTORE_URL_REQUIRED.to_string(),
            ))
        }
    };

    match state.registry.register(url).await? {
        Registration::AlreadyRegistered => {
            Ok(Json(ApiResponse::message(MSG_APPSTORE_ALREADY_REGISTERED)))
        }
        Registration::Initiated(handle) => {
            info!(attempt_id = %handle.attempt_id(), url = handle.url(), "registration accepted");
            Ok(Json(ApiResponse::message(registration_initiated_message(
                &state.log_file,
            ))))
        }
    }
}

async fn unregister_app_store(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    let index = usize::try_from(id).unwrap_or(usize::MAX);
    match state.registry.unregister(index).await {
        Ok(_) => Ok(Json(ApiResponse::message(MSG_APPSTORE_UNREGISTERED))),
        Err(CatalogError::NotFound(_)) => {
            Err(CatalogError::NotFound(app_store_not_found_message(id)))
        }
        Err(e) => Err(e),
    }
}

async fn list_apps(
    State(state): State<AppState>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<StoreInfoListing> {
    let Query(query) = query?;
    let listing = state.catalog.store_info_list(&query).await?;
    Ok(Json(ApiResponse {
        message: listing.message.clone(),
        data: Some(listing),
    }))
}

async fn get_store_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StoreInfo> {
    Ok(Json(ApiResponse::data(state.catalog.store_info(&id).await?)))
}

async fn get_compose_app(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, CatalogError> {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());

    let representation = state.catalog.compose_app_representation(&id, accept).await?;
    let content_type = representation.content_type();
    let body = representation.into_bytes()?;

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryInfo>> {
    Ok(Json(ApiResponse::data(state.catalog.categories().await?)))
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api = Router::new()
        .route("/appstore", get(list_app_stores).post(register_app_store))
        .route("/appstore/:id", delete(unregister_app_store))
        .route("/apps", get(list_apps))
        .route("/apps/:id", get(get_store_info))
        .route("/apps/:id/compose", get(get_compose_app))
        .route("/categories", get(list_categories));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        .nest(API_PREFIX, api)
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Start the HTTP server on the specified port. On Ctrl-C the server drains
/// and pending registrations are cancelled.
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let registry = state.registry.clone();
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);
    info!("Catalog API:  http://{}{}/apps", addr, API_PREFIX);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;

    registry.shutdown();
    Ok(())
}
