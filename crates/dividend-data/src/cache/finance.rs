//! 배당 이력 read-through 캐시.
//!
//! 회사명을 키로 `CompanyDividends` aggregate를 보관합니다. 조회 시 lazy하게
//! 채워지고, 해당 키의 데이터가 바뀔 수 있는 쓰기 뒤에 명시적으로 무효화됩니다.
//!
//! 캐시는 파생 구조이므로 substrate 장애는 조회 실패로 만들지 않습니다.
//! get/set 실패는 경고 로그 후 miss로 취급하고 저장소에서 직접 읽습니다.
//! 반면 evict 실패는 stale 데이터를 남길 수 있으므로 에러로 전파합니다.

use std::sync::Arc;

use async_trait::async_trait;
use dividend_core::{CompanyDividends, DividendError, DividendResult};
use sqlx::PgPool;
use tracing::{debug, warn};

use super::{KeyValueStore, RedisCache};
use crate::storage::{CompanyRepository, DividendRepository};

const KEY_PREFIX: &str = "finance";

/// 캐시 miss 시 aggregate를 조립해 주는 저장소 측 계약.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    /// 회사명으로 aggregate를 조립합니다. 추적하지 않는 이름이면 `NotFound`.
    async fn load(&self, name: &str) -> DividendResult<CompanyDividends>;
}

/// PostgreSQL 기반 `AggregateSource`.
pub struct PgAggregateSource<'a> {
    pool: &'a PgPool,
}

impl<'a> PgAggregateSource<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateSource for PgAggregateSource<'_> {
    async fn load(&self, name: &str) -> DividendResult<CompanyDividends> {
        let company = CompanyRepository::find_by_name(self.pool, name)
            .await
            .map_err(|e| DividendError::Database(e.to_string()))?
            .ok_or_else(|| DividendError::NotFound(name.to_string()))?;

        let dividends = DividendRepository::find_all_by_company_id(self.pool, company.id)
            .await
            .map_err(|e| DividendError::Database(e.to_string()))?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(CompanyDividends::new(company.into(), dividends))
    }
}

/// 배당 이력 aggregate 캐시.
#[derive(Clone)]
pub struct FinanceCache {
    store: Arc<dyn KeyValueStore>,
}

impl FinanceCache {
    pub fn new(redis: RedisCache) -> Self {
        Self::with_store(Arc::new(redis))
    }

    /// 임의의 substrate 위에 캐시를 생성합니다 (인메모리 구현 포함).
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(name: &str) -> String {
        format!("{}:{}", KEY_PREFIX, name)
    }

    /// 회사명으로 aggregate를 조회합니다 (read-through).
    pub async fn get_aggregate(
        &self,
        pool: &PgPool,
        name: &str,
    ) -> DividendResult<CompanyDividends> {
        self.get_aggregate_from(&PgAggregateSource::new(pool), name)
            .await
    }

    /// 주어진 소스로 aggregate를 조회합니다 (read-through).
    ///
    /// 캐시에 있으면 소스를 건드리지 않고 반환합니다. 없으면 소스에서 조립해
    /// 캐시에 채운 뒤 반환합니다. 실패한 조회(`NotFound`)는 캐시하지 않습니다.
    pub async fn get_aggregate_from(
        &self,
        source: &dyn AggregateSource,
        name: &str,
    ) -> DividendResult<CompanyDividends> {
        let key = Self::key(name);

        match self.store.get_raw(&key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(cached) => {
                    debug!(name, "캐시 적중");
                    return Ok(cached);
                }
                Err(e) => warn!(name, error = %e, "캐시 항목 역직렬화 실패, 저장소에서 직접 조회"),
            },
            Ok(None) => {}
            Err(e) => warn!(name, error = %e, "캐시 조회 실패, 저장소에서 직접 조회"),
        }

        let aggregate = source.load(name).await?;

        match serde_json::to_string(&aggregate) {
            Ok(json) => {
                if let Err(e) = self.store.set_raw(&key, &json).await {
                    warn!(name, error = %e, "캐시 저장 실패");
                }
            }
            Err(e) => warn!(name, error = %e, "캐시 직렬화 실패"),
        }

        Ok(aggregate)
    }

    /// 단일 회사의 캐시 항목을 무효화합니다.
    ///
    /// 해당 키의 데이터를 바꾸는 쓰기(회사 삭제) 직후 동기적으로 호출됩니다.
    pub async fn evict(&self, name: &str) -> DividendResult<()> {
        self.store
            .delete(&Self::key(name))
            .await
            .map_err(|e| DividendError::Cache(e.to_string()))?;
        Ok(())
    }

    /// 전체 캐시를 무효화합니다.
    ///
    /// 매 동기화 주기 시작 시, 어떤 fetch보다도 먼저 호출됩니다.
    pub async fn evict_all(&self) -> DividendResult<usize> {
        let evicted = self
            .store
            .delete_pattern(&format!("{}:*", KEY_PREFIX))
            .await
            .map_err(|e| DividendError::Cache(e.to_string()))?;

        debug!(evicted, "배당 이력 캐시 전체 무효화");
        Ok(evicted)
    }
}

/// 테스트용 인메모리 substrate/소스 구현.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Mutex;

    use super::*;
    use crate::error::Result as DataResult;

    /// Redis 없이 쓰는 인메모리 `KeyValueStore`.
    #[derive(Debug, Default)]
    pub struct MemoryKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// 키 존재 여부.
        pub async fn contains(&self, key: &str) -> bool {
            self.entries.lock().await.contains_key(key)
        }

        /// 보관 중인 키 수.
        pub async fn len(&self) -> usize {
            self.entries.lock().await.len()
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryKeyValueStore {
        async fn get_raw(&self, key: &str) -> DataResult<Option<String>> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set_raw(&self, key: &str, value: &str) -> DataResult<()> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> DataResult<bool> {
            Ok(self.entries.lock().await.remove(key).is_some())
        }

        async fn delete_pattern(&self, pattern: &str) -> DataResult<usize> {
            let prefix = pattern.trim_end_matches('*');
            let mut entries = self.entries.lock().await;
            let keys: Vec<String> = entries
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect();
            for key in &keys {
                entries.remove(key);
            }
            Ok(keys.len())
        }
    }

    /// 이름별 aggregate를 보관하는 인메모리 `AggregateSource`.
    ///
    /// 소스 조회 횟수를 기록해 read-through 경로를 검증할 수 있습니다.
    #[derive(Debug, Default)]
    pub struct MemoryAggregateSource {
        aggregates: Mutex<HashMap<String, CompanyDividends>>,
        loads: AtomicUsize,
    }

    impl MemoryAggregateSource {
        pub fn new() -> Self {
            Self::default()
        }

        /// aggregate를 등록/교체합니다 (회사명이 키).
        pub async fn insert(&self, aggregate: CompanyDividends) {
            self.aggregates
                .lock()
                .await
                .insert(aggregate.company.name.clone(), aggregate);
        }

        /// 회사명을 제거합니다.
        pub async fn remove(&self, name: &str) {
            self.aggregates.lock().await.remove(name);
        }

        /// 지금까지의 소스 조회 횟수.
        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AggregateSource for MemoryAggregateSource {
        async fn load(&self, name: &str) -> DividendResult<CompanyDividends> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.aggregates
                .lock()
                .await
                .get(name)
                .cloned()
                .ok_or_else(|| DividendError::NotFound(name.to_string()))
        }
    }
}
