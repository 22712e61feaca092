//! API 라우트.

pub mod company;
pub mod finance;
pub mod health;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health::health_router())
        .nest("/company", company::company_router())
        .nest("/finance", finance::finance_router())
}
