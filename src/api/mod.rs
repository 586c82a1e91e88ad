pub mod handlers;

pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/reconcile", post(reconcile_batch))
        .route("/api/reconcile/labels", post(reconcile_labels))
        .with_state(state)
        .layer(ServiceBuilder::new())
}
