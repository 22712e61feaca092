//! 회사 관리 API 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /company` - 추적 중인 회사 목록 (페이지 단위)
//! - `POST /company` - 회사 등록 (ticker로 식별, 등록 즉시 전체 이력 수집)
//! - `DELETE /company/{ticker}` - 회사 삭제 (배당 이력/인덱스/캐시 cascade)
//! - `GET /company/autocomplete?keyword=` - 회사명 prefix 자동완성

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use dividend_core::{DividendError, DividendResult};
use dividend_data::storage::{CompanyRecord, CompanyRepository, DividendRepository};
use dividend_data::DataError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{error_response, ApiResult};
use crate::services::company::{delete_company_cascade, PgCompanyStore};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 회사 목록 쿼리.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 페이지 번호 (0부터 시작)
    #[serde(default)]
    pub page: i64,
    /// 페이지 크기
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    20
}

const MAX_PAGE_SIZE: i64 = 100;

impl ListQuery {
    /// 페이지 파라미터를 검증합니다.
    ///
    /// 음수는 Postgres의 OFFSET/LIMIT까지 내려가면 실행 에러가 되므로
    /// 여기서 입력 오류로 걸러냅니다.
    fn validate(&self) -> DividendResult<()> {
        if self.page < 0 {
            return Err(DividendError::Validation(format!(
                "page는 0 이상이어야 합니다: {}",
                self.page
            )));
        }
        if self.size < 1 || self.size > MAX_PAGE_SIZE {
            return Err(DividendError::Validation(format!(
                "size는 1 이상 {} 이하여야 합니다: {}",
                MAX_PAGE_SIZE, self.size
            )));
        }
        Ok(())
    }
}

/// 회사 목록 응답.
#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanyRecord>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

/// 자동완성 쿼리.
#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub keyword: String,
}

/// 자동완성 응답.
#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub keyword: String,
    pub names: Vec<String>,
}

/// 회사 등록 요청.
#[derive(Debug, Deserialize)]
pub struct AddCompanyRequest {
    pub ticker: String,
}

/// 회사 등록 응답.
#[derive(Debug, Serialize)]
pub struct AddCompanyResponse {
    pub ticker: String,
    pub name: String,
    /// 등록과 함께 수집된 배당금 엔트리 수
    pub dividends: usize,
}

/// 회사 삭제 응답.
#[derive(Debug, Serialize)]
pub struct DeleteCompanyResponse {
    pub ticker: String,
    pub name: String,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /company - 추적 중인 회사 목록 조회.
async fn list_companies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<CompanyListResponse>> {
    debug!(page = query.page, size = query.size, "회사 목록 조회");

    query.validate().map_err(error_response)?;

    let companies = CompanyRepository::list(&state.db_pool, query.page, query.size)
        .await
        .map_err(|e| error_response(DividendError::Database(e.to_string())))?;

    if companies.is_empty() {
        return Err(error_response(DividendError::EmptyResult(format!(
            "page={}",
            query.page
        ))));
    }

    let total = CompanyRepository::count(&state.db_pool)
        .await
        .map_err(|e| error_response(DividendError::Database(e.to_string())))?;

    Ok(Json(CompanyListResponse {
        companies,
        total,
        page: query.page,
        size: query.size,
    }))
}

/// GET /company/autocomplete?keyword= - 회사명 자동완성.
///
/// 저장소가 아니라 인메모리 trie가 serving 경로입니다.
async fn autocomplete(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AutocompleteQuery>,
) -> ApiResult<Json<AutocompleteResponse>> {
    let keyword = query.keyword.trim();
    if keyword.is_empty() {
        return Err(error_response(DividendError::Validation(
            "keyword가 비어 있습니다".to_string(),
        )));
    }

    let names = state.trie.read().await.prefix_search(keyword);
    debug!(keyword, matches = names.len(), "자동완성 조회");

    if names.is_empty() {
        return Err(error_response(DividendError::EmptyResult(
            keyword.to_string(),
        )));
    }

    Ok(Json(AutocompleteResponse {
        keyword: keyword.to_string(),
        names,
    }))
}

/// POST /company - 회사 등록.
///
/// ticker로 외부 소스에서 회사명을 해석하고, 전체 배당 이력을 수집해
/// 회사와 함께 저장한 뒤 자동완성 인덱스에 등록합니다.
async fn add_company(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddCompanyRequest>,
) -> ApiResult<Json<AddCompanyResponse>> {
    let ticker = request.ticker.trim();
    if ticker.is_empty() {
        return Err(error_response(DividendError::Validation(
            "ticker가 비어 있습니다".to_string(),
        )));
    }

    info!(ticker, "회사 등록 요청");

    let exists = CompanyRepository::exists_by_ticker(&state.db_pool, ticker)
        .await
        .map_err(|e| error_response(DividendError::Database(e.to_string())))?;
    if exists {
        return Err(error_response(DividendError::AlreadyExists(
            ticker.to_string(),
        )));
    }

    // 요약 페이지와 이력 페이지 두 번의 요청 사이에도 rate limit 간격을 지킵니다
    let company = state
        .scraper
        .scrape_company_by_ticker(ticker)
        .await
        .map_err(|e| error_response(e.into()))?;

    tokio::time::sleep(state.scraper.request_delay()).await;

    let dividends = state
        .scraper
        .scrape_dividends(&company)
        .await
        .map_err(|e| error_response(e.into()))?;

    // 존재 확인과 insert 사이의 경합은 유니크 제약 위반(23505)으로 드러나며
    // 이때도 ALREADY_EXISTS(409)로 보고되어야 합니다
    let record = CompanyRepository::insert(&state.db_pool, &company)
        .await
        .map_err(|e| error_response(DividendError::from(DataError::from(e))))?;

    let inserted = DividendRepository::insert_many(&state.db_pool, record.id, &dividends)
        .await
        .map_err(|e| error_response(DividendError::Database(e.to_string())))?;

    state.trie.write().await.insert(&record.name);

    info!(
        ticker = %record.ticker,
        name = %record.name,
        dividends = inserted,
        "회사 등록 완료"
    );

    Ok(Json(AddCompanyResponse {
        ticker: record.ticker,
        name: record.name,
        dividends: inserted,
    }))
}

/// DELETE /company/{ticker} - 회사 삭제.
///
/// 배당 이력, 회사, 자동완성 인덱스 항목, 캐시 항목을 함께 제거합니다.
async fn delete_company(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<DeleteCompanyResponse>> {
    info!(ticker = %ticker, "회사 삭제 요청");

    let record = delete_company_cascade(
        &PgCompanyStore::new(&state.db_pool),
        &state.trie,
        &state.finance_cache,
        &ticker,
    )
    .await
    .map_err(error_response)?;

    info!(ticker = %record.ticker, name = %record.name, "회사 삭제 완료");

    Ok(Json(DeleteCompanyResponse {
        ticker: record.ticker,
        name: record.name,
    }))
}

// ================================================================================================
// Router
// ================================================================================================

/// Company 라우터 생성.
pub fn company_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_companies).post(add_company))
        .route("/autocomplete", get(autocomplete))
        .route("/{ticker}", delete(delete_company))
}
