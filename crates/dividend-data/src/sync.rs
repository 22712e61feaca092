//! 멱등 병합 엔진.
//!
//! 새로 수집한 배당금 엔트리 중 저장소에 없는 것만 골라 저장합니다.
//! `(company_id, date)` 기준으로 존재를 확인하므로, 변하지 않은 원격 데이터에
//! 대해 주기를 반복해도 no-op이며, 장애 후 재실행해도 안전합니다
//! (fetch는 at-least-once, 실제 삽입은 exactly-once).

use async_trait::async_trait;
use chrono::NaiveDate;
use dividend_core::Dividend;
use sqlx::PgPool;

use crate::error::Result;
use crate::storage::DividendRepository;

/// 병합 엔진이 저장소에 요구하는 계약.
#[async_trait]
pub trait DividendStore: Send + Sync {
    /// `(company_id, date)` 엔트리가 이미 있는지 확인합니다.
    async fn exists(&self, company_id: i64, date: NaiveDate) -> Result<bool>;

    /// 엔트리를 저장합니다.
    async fn insert(&self, company_id: i64, dividend: &Dividend) -> Result<()>;
}

/// 수집된 엔트리를 저장소와 병합합니다. 실제 삽입된 수를 반환합니다.
///
/// 엔트리는 수집된 순서대로 처리합니다. 유일성이 날짜 기준이므로 재정렬은
/// 필요 없습니다. 이미 저장된 엔트리는 원격 금액이 바뀌어도 갱신하지 않습니다
/// (엔트리는 생성 후 불변).
pub async fn sync_dividends(
    store: &dyn DividendStore,
    company_id: i64,
    fetched: &[Dividend],
) -> Result<usize> {
    let mut inserted = 0;

    for dividend in fetched {
        let exists = store.exists(company_id, dividend.date).await?;
        if !exists {
            store.insert(company_id, dividend).await?;
            inserted += 1;
            tracing::info!(
                company_id,
                date = %dividend.date,
                amount = %dividend.amount,
                "신규 배당금 저장"
            );
        }
    }

    Ok(inserted)
}

/// PostgreSQL 기반 `DividendStore`.
pub struct PgDividendStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgDividendStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DividendStore for PgDividendStore<'_> {
    async fn exists(&self, company_id: i64, date: NaiveDate) -> Result<bool> {
        let exists =
            DividendRepository::exists_by_company_id_and_date(self.pool, company_id, date).await?;
        Ok(exists)
    }

    async fn insert(&self, company_id: i64, dividend: &Dividend) -> Result<()> {
        DividendRepository::insert(self.pool, company_id, dividend).await?;
        Ok(())
    }
}

/// 테스트용 인메모리 `DividendStore`.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::collections::{BTreeMap, HashMap};

    use tokio::sync::Mutex;

    use super::*;

    /// 병합/주기 테스트에서 DB 없이 쓰는 인메모리 저장소.
    #[derive(Debug, Default)]
    pub struct MemoryDividendStore {
        entries: Mutex<HashMap<i64, BTreeMap<NaiveDate, String>>>,
    }

    impl MemoryDividendStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// 회사의 엔트리 수.
        pub async fn count(&self, company_id: i64) -> usize {
            self.entries
                .lock()
                .await
                .get(&company_id)
                .map_or(0, |m| m.len())
        }

        /// 회사의 엔트리를 날짜순으로 반환합니다.
        pub async fn entries_for(&self, company_id: i64) -> Vec<Dividend> {
            self.entries
                .lock()
                .await
                .get(&company_id)
                .map(|m| {
                    m.iter()
                        .map(|(date, amount)| Dividend::new(*date, amount.clone()))
                        .collect()
                })
                .unwrap_or_default()
        }

        /// 회사의 엔트리 전체 삭제.
        pub async fn delete_all(&self, company_id: i64) {
            self.entries.lock().await.remove(&company_id);
        }
    }

    #[async_trait]
    impl DividendStore for MemoryDividendStore {
        async fn exists(&self, company_id: i64, date: NaiveDate) -> Result<bool> {
            Ok(self
                .entries
                .lock()
                .await
                .get(&company_id)
                .is_some_and(|m| m.contains_key(&date)))
        }

        async fn insert(&self, company_id: i64, dividend: &Dividend) -> Result<()> {
            self.entries
                .lock()
                .await
                .entry(company_id)
                .or_default()
                .insert(dividend.date, dividend.amount.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryDividendStore;
    use super::*;

    fn d(y: i32, m: u32, day: u32, amount: &str) -> Dividend {
        Dividend::new(NaiveDate::from_ymd_opt(y, m, day).unwrap(), amount)
    }

    fn five_entries() -> Vec<Dividend> {
        vec![
            d(2023, 3, 9, "1.50"),
            d(2023, 6, 8, "1.50"),
            d(2023, 9, 7, "1.50"),
            d(2023, 12, 7, "1.51"),
            d(2024, 3, 7, "1.51"),
        ]
    }

    #[tokio::test]
    async fn test_sync_inserts_all_new_entries() {
        let store = MemoryDividendStore::new();

        // "MMM" / "3M Company", 기존 엔트리 없음
        let inserted = sync_dividends(&store, 1, &five_entries()).await.unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(store.count(1).await, 5);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let store = MemoryDividendStore::new();
        let fetched = five_entries();

        let first = sync_dividends(&store, 1, &fetched).await.unwrap();
        let second = sync_dividends(&store, 1, &fetched).await.unwrap();

        assert_eq!(first, 5);
        assert_eq!(second, 0);
        assert_eq!(store.count(1).await, 5);
    }

    #[tokio::test]
    async fn test_sync_inserts_only_missing_entries() {
        let store = MemoryDividendStore::new();
        let fetched = five_entries();

        sync_dividends(&store, 1, &fetched[..3]).await.unwrap();
        let inserted = sync_dividends(&store, 1, &fetched).await.unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.count(1).await, 5);
    }

    #[tokio::test]
    async fn test_sync_does_not_revise_stored_amounts() {
        let store = MemoryDividendStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        sync_dividends(&store, 1, &[Dividend::new(date, "1.51")]).await.unwrap();
        // 원격에서 과거 금액이 수정되어도 반영하지 않음 (문서화된 제한)
        sync_dividends(&store, 1, &[Dividend::new(date, "9.99")]).await.unwrap();

        let entries = store.entries_for(1).await;
        assert_eq!(entries, vec![Dividend::new(date, "1.51")]);
    }

    #[tokio::test]
    async fn test_sync_isolates_companies() {
        let store = MemoryDividendStore::new();

        sync_dividends(&store, 1, &five_entries()).await.unwrap();
        let inserted = sync_dividends(&store, 2, &five_entries()).await.unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(store.count(1).await, 5);
        assert_eq!(store.count(2).await, 5);
    }
}
