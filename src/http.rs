//! HTTP transport for the epic-consult service
//!
//! Axum router with plain JSON health/info/metrics, the consultation API,
//! the HTML report, function-calling descriptors, and MCP over Streamable
//! HTTP mounted at the configured path. API routes run under a request
//! timeout; CORS is permissive.

use crate::engine::RawBusinessContext;
use crate::error::{EpicConsultError, Result};
use crate::report::render_html;
use crate::schemas::function_descriptor;
use crate::server::EpicConsultServer;
use crate::store::{ConsultOptions, consult_with_cache};
use crate::tools::consultation::{ConsultationFlags, outcome_json, score_summary};
use axum::{
    BoxError, Json, Router,
    body::{Body, Bytes},
    error_handling::HandleErrorLayer,
    extract::{MatchedPath, Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager,
    tower::{StreamableHttpServerConfig, StreamableHttpService},
};
use serde_json::{Value, json};
use std::{cmp::Ordering, collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// Latency samples kept for the p95 estimate.
const LATENCY_WINDOW: usize = 256;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub server: EpicConsultServer,
    pub metrics: Arc<Mutex<HttpMetrics>>,
    pub session_mgr: Arc<LocalSessionManager>,
}

/// Metrics for HTTP server
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub total_requests: u64,
    pub last_request_unix: u64,
    pub errors_total: u64,
    pub latencies: Vec<f64>, // ring buffer for p95
    pub endpoints_count: HashMap<String, u64>,
}

impl HttpMetrics {
    fn new() -> Self {
        Self {
            total_requests: 0,
            last_request_unix: unix_now(),
            errors_total: 0,
            latencies: Vec::with_capacity(LATENCY_WINDOW),
            endpoints_count: HashMap::new(),
        }
    }

    fn record(&mut self, endpoint: String, latency_ms: f64, success: bool) {
        self.latencies.push(latency_ms);
        if self.latencies.len() > LATENCY_WINDOW {
            self.latencies.remove(0);
        }
        if !success {
            self.errors_total = self.errors_total.saturating_add(1);
        }
        self.total_requests = self.total_requests.saturating_add(1);
        self.last_request_unix = unix_now();
        *self.endpoints_count.entry(endpoint).or_insert(0) += 1;
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl IntoResponse for EpicConsultError {
    fn into_response(self) -> Response {
        let status = match &self {
            EpicConsultError::Validation { .. }
            | EpicConsultError::InvalidParams { .. }
            | EpicConsultError::Mcp { .. } => StatusCode::BAD_REQUEST,
            EpicConsultError::NotFound { .. } => StatusCode::NOT_FOUND,
            EpicConsultError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        (
            status,
            Json(json!({"error": {"code": status.as_u16(), "message": self.to_string()}})),
        )
            .into_response()
    }
}

/// Parse a request body into a JSON object. An empty body is `{}`.
fn parse_body(body: &Bytes) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| EpicConsultError::InvalidParams {
            message: format!("malformed JSON body: {}", e),
        })?;
    if !value.is_object() {
        return Err(EpicConsultError::InvalidParams {
            message: "request body must be a JSON object".into(),
        });
    }
    Ok(value)
}

fn parse_context(value: &Value) -> Result<RawBusinessContext> {
    serde_json::from_value(value.clone()).map_err(|e| EpicConsultError::InvalidParams {
        message: e.to_string(),
    })
}

fn parse_flags(value: &Value) -> Result<ConsultationFlags> {
    serde_json::from_value(value.clone()).map_err(|e| EpicConsultError::InvalidParams {
        message: e.to_string(),
    })
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let config = &state.server.config;
    Json(json!({
        "service": {
            "name": config.system.service_name,
            "version": env!("CARGO_PKG_VERSION")
        },
        "cache": {
            "backend": state.server.store.backend(),
            "ttl_days": config.system.cache_ttl_days,
            "max_entries": config.system.cache_max,
            "entries": state.server.store.len().await
        },
        "server": {
            "transport": config.runtime.transport,
            "bind": config.runtime.http_bind.to_string(),
            "mcp_path": config.runtime.http_path
        }
    }))
}

/// Metrics endpoint
pub async fn metrics_handler(State(state): State<HttpState>) -> impl IntoResponse {
    let metrics = state.metrics.lock().await.clone();
    // Read active sessions from session manager
    let active_sessions = state.session_mgr.sessions.read().await.len();

    // Compute latency stats
    let (avg_latency_ms, p95_latency_ms) = if metrics.latencies.is_empty() {
        (None, None)
    } else {
        let sum: f64 = metrics.latencies.iter().sum();
        let avg = sum / metrics.latencies.len() as f64;
        let mut sorted = metrics.latencies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let p95_idx = ((sorted.len() as f64 * 0.95) as usize).min(sorted.len() - 1);
        let p95 = sorted.get(p95_idx).copied();
        (Some(avg), p95)
    };

    // Top 5 endpoints
    let mut endpoints: Vec<_> = metrics.endpoints_count.iter().collect();
    endpoints.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let endpoints_top_5: Vec<_> = endpoints
        .into_iter()
        .take(5)
        .map(|(k, v)| json!({ "endpoint": k, "count": v }))
        .collect();

    Json(json!({
        "metrics_version": "1",
        "total_requests": metrics.total_requests,
        "last_request_unix": metrics.last_request_unix,
        "http_active_sessions": active_sessions,
        "errors_total": metrics.errors_total,
        "avg_latency_ms": avg_latency_ms,
        "p95_latency_ms": p95_latency_ms,
        "endpoints_top_5": endpoints_top_5
    }))
}

/// `POST /api/consultation`
pub async fn consultation_handler(
    State(state): State<HttpState>,
    body: Bytes,
) -> Result<Json<Value>> {
    let value = parse_body(&body)?;
    let raw = parse_context(&value)?;
    let flags = parse_flags(&value)?;
    let outcome = consult_with_cache(
        state.server.store.as_ref(),
        &raw,
        ConsultOptions {
            refresh: flags.refresh,
        },
    )
    .await?;
    Ok(Json(outcome_json(&outcome, flags.format)?))
}

/// `POST /api/score`
pub async fn score_handler(body: Bytes) -> Result<Json<Value>> {
    let value = parse_body(&body)?;
    let raw = parse_context(&value)?;
    Ok(Json(serde_json::to_value(score_summary(&raw))?))
}

/// `POST /api/report`
pub async fn report_handler(State(state): State<HttpState>, body: Bytes) -> Result<Html<String>> {
    let value = parse_body(&body)?;
    let raw = parse_context(&value)?;
    let flags = parse_flags(&value)?;
    let outcome = consult_with_cache(
        state.server.store.as_ref(),
        &raw,
        ConsultOptions {
            refresh: flags.refresh,
        },
    )
    .await?;
    Ok(Html(render_html(&outcome.context, &outcome.consultation)))
}

/// `GET /api/schemas/:platform`
pub async fn schema_handler(Path(platform): Path<String>) -> Result<Json<Value>> {
    function_descriptor(&platform)
        .map(Json)
        .ok_or_else(|| EpicConsultError::NotFound {
            message: format!("unknown platform '{}'", platform),
        })
}

async fn handle_timeout_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({"error": {"code": 408, "message": "request timed out"}})),
        )
            .into_response()
    } else {
        EpicConsultError::Internal {
            message: err.to_string(),
        }
        .into_response()
    }
}

async fn track_metrics(
    State((metrics, mcp_base)): State<(Arc<Mutex<HttpMetrics>>, String)>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let endpoint = if req.uri().path().starts_with(&mcp_base) {
        mcp_base.clone()
    } else {
        req.extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "unmatched".to_string())
    };
    let start = std::time::Instant::now();
    let resp = next.run(req).await;
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    metrics
        .lock()
        .await
        .record(endpoint, latency_ms, resp.status().is_success());
    resp
}

/// Build the full application router around `server`.
pub fn build_router(server: EpicConsultServer) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let state = HttpState {
        server: server.clone(),
        metrics: Arc::new(Mutex::new(HttpMetrics::new())),
        session_mgr: session_mgr.clone(),
    };

    // Build MCP streamable HTTP service mounted at configured path
    let path = server.config.runtime.http_path.clone();
    let keepalive = Duration::from_secs(server.config.runtime.http_sse_keepalive_sec);
    let request_timeout = Duration::from_millis(server.config.runtime.http_request_timeout_ms);
    let server_factory = server.clone();
    let mcp_service: StreamableHttpService<EpicConsultServer, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(server_factory.clone()),
            session_mgr,
            StreamableHttpServerConfig {
                stateful_mode: true,
                sse_keep_alive: Some(keepalive),
                ..Default::default()
            },
        );

    let api = Router::new()
        .route("/api/consultation", post(consultation_handler))
        .route("/api/score", post(score_handler))
        .route("/api/report", post(report_handler))
        .route("/api/schemas/:platform", get(schema_handler))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        );

    Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/metrics", get(metrics_handler))
        .merge(api)
        .nest_service(path.as_str(), mcp_service)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn_with_state(
            (state.metrics.clone(), path),
            track_metrics,
        ))
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(server: EpicConsultServer) -> Result<()> {
    let bind = server.config.runtime.http_bind;
    let mcp_path = server.config.runtime.http_path.clone();
    let app = build_router(server);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {} (MCP at {})", bind, mcp_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_accepts_empty() {
        assert_eq!(parse_body(&Bytes::from_static(b"  ")).ok(), Some(json!({})));
    }

    #[test]
    fn test_parse_body_rejects_non_objects() {
        assert!(parse_body(&Bytes::from_static(b"[1,2]")).is_err());
        assert!(parse_body(&Bytes::from_static(b"{not json")).is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        let resp = EpicConsultError::NotFound {
            message: "x".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = EpicConsultError::Timeout {
            operation: "x".into(),
            timeout_ms: 1,
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        let resp = EpicConsultError::Store {
            message: "x".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_metrics_window_is_bounded() {
        let mut m = HttpMetrics::new();
        for i in 0..(LATENCY_WINDOW + 10) {
            m.record("/health".into(), i as f64, i % 2 == 0);
        }
        assert_eq!(m.latencies.len(), LATENCY_WINDOW);
        assert_eq!(m.total_requests, (LATENCY_WINDOW + 10) as u64);
        assert_eq!(m.endpoints_count["/health"], (LATENCY_WINDOW + 10) as u64);
    }
}
