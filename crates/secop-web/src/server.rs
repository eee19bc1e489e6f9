//! Web服务器

use axum::{
    routing::{get, post, put},
    Router,
};
use secop_core::Result;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    api_root, create_temp, get_temp, health, legacy_upload_request, register, submit_case,
    update_case_status, update_temp, validate_submission,
};
use crate::state::AppState;

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        let app = create_app(state);

        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| secop_core::SecopError::Internal(format!("Failed to bind: {}", e)))?;
        axum::serve(listener, self.app)
            .await
            .map_err(|e| secop_core::SecopError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 构建完整路由
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        // API路由
        .nest("/api/v1", api_routes())
        // 旧版提交入口
        .route("/api/upload-request", post(legacy_upload_request))
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// API v1 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/funnel/temp", post(create_temp).get(get_temp).put(update_temp))
        .route(
            "/customer/case-submission/validate",
            get(validate_submission),
        )
        .route("/customer/case-submission/submit", post(submit_case))
        .route("/auth/register", post(register))
        .route("/cases/:case_id/status", put(update_case_status))
}
