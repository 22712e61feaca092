//! 배당 이력 조회 API 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /finance/dividend/{company_name}` - 회사명으로 배당 이력 조회

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use dividend_core::CompanyDividends;
use tracing::debug;

use crate::error::{error_response, ApiResult};
use crate::state::AppState;

/// GET /finance/dividend/{company_name} - 배당 이력 조회.
///
/// read-through 캐시를 경유하므로 반복 조회는 저장소를 건드리지 않습니다.
async fn get_dividend(
    State(state): State<Arc<AppState>>,
    Path(company_name): Path<String>,
) -> ApiResult<Json<CompanyDividends>> {
    debug!(name = %company_name, "배당 이력 조회");

    let aggregate = state
        .finance_cache
        .get_aggregate(&state.db_pool, &company_name)
        .await
        .map_err(error_response)?;

    Ok(Json(aggregate))
}

/// Finance 라우터 생성.
pub fn finance_router() -> Router<Arc<AppState>> {
    Router::new().route("/dividend/{company_name}", get(get_dividend))
}
