//! 회사 삭제 cascade.
//!
//! 회사를 삭제하면 세 곳의 파생 상태가 함께 정리되어야 합니다:
//! 저장소의 배당 이력과 회사 레코드, 자동완성 trie의 회사명, 캐시의 aggregate.
//! 이 순서가 깨지면 삭제된 회사가 자동완성이나 배당 조회에 계속 나타납니다.

use async_trait::async_trait;
use dividend_core::{CompanyNameTrie, DividendError, DividendResult};
use dividend_data::storage::{CompanyRecord, CompanyRepository, DividendRepository};
use dividend_data::{DataError, FinanceCache};
use sqlx::PgPool;
use tokio::sync::RwLock;

/// 삭제 cascade가 필요로 하는 저장소 측 계약.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// ticker로 회사를 조회합니다.
    async fn find_by_ticker(&self, ticker: &str) -> DividendResult<Option<CompanyRecord>>;

    /// 회사와 그 배당 이력을 저장소에서 제거합니다.
    async fn remove(&self, company_id: i64) -> DividendResult<()>;
}

/// PostgreSQL 기반 `CompanyStore`.
pub struct PgCompanyStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgCompanyStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore<'_> {
    async fn find_by_ticker(&self, ticker: &str) -> DividendResult<Option<CompanyRecord>> {
        CompanyRepository::find_by_ticker(self.pool, ticker)
            .await
            .map_err(|e| DividendError::from(DataError::from(e)))
    }

    async fn remove(&self, company_id: i64) -> DividendResult<()> {
        DividendRepository::delete_all_by_company_id(self.pool, company_id)
            .await
            .map_err(|e| DividendError::from(DataError::from(e)))?;
        CompanyRepository::delete(self.pool, company_id)
            .await
            .map_err(|e| DividendError::from(DataError::from(e)))?;
        Ok(())
    }
}

/// 회사 삭제 cascade를 수행합니다.
///
/// 저장소에서 배당 이력과 회사를 지우고, trie의 회사명과 캐시의 aggregate를
/// 순서대로 제거합니다. 캐시 무효화 실패는 stale 데이터를 남기므로 에러로
/// 전파합니다. 삭제된 회사 레코드를 반환합니다.
pub async fn delete_company_cascade(
    store: &dyn CompanyStore,
    trie: &RwLock<CompanyNameTrie>,
    cache: &FinanceCache,
    ticker: &str,
) -> DividendResult<CompanyRecord> {
    let record = store
        .find_by_ticker(ticker)
        .await?
        .ok_or_else(|| DividendError::NotFound(ticker.to_string()))?;

    store.remove(record.id).await?;
    trie.write().await.remove(&record.name);
    cache.evict(&record.name).await?;

    Ok(record)
}
