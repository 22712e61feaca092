//! 배당금 동기화 주기 모듈.
//!
//! 주기 하나는 다음 순서로 진행됩니다:
//! 1. aggregate 캐시 전체 무효화 (어떤 fetch보다도 먼저)
//! 2. 추적 중인 전체 회사를 순차 순회
//! 3. 회사별로 스크래핑 → 멱등 병합, 실패는 항목 단위로 격리
//! 4. 항목 사이에 스크래퍼의 rate limit 간격만큼 대기 (마지막 항목 뒤는 생략)
//!
//! 실패한 회사는 같은 주기 안에서 재시도하지 않으며, 다음 주기에 자연스럽게
//! 다시 시도됩니다.

use std::time::Instant;

use async_trait::async_trait;
use dividend_core::{Company, Dividend};
use dividend_data::provider::Scraper;
use dividend_data::storage::{CompanyRecord, CompanyRepository};
use dividend_data::sync::{sync_dividends, PgDividendStore};
use dividend_data::FinanceCache;
use sqlx::PgPool;

use crate::error::CollectorError;
use crate::{Result, SyncStats};

/// 주기 실행이 저장소/캐시에 요구하는 계약.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// 추적 중인 전체 회사를 반환합니다.
    async fn list_companies(&self) -> Result<Vec<CompanyRecord>>;

    /// 수집된 엔트리를 병합하고 실제 삽입된 수를 반환합니다.
    async fn merge_dividends(&self, company_id: i64, fetched: &[Dividend]) -> Result<usize>;

    /// aggregate 캐시를 전체 무효화합니다.
    async fn evict_all_aggregates(&self) -> Result<usize>;
}

/// PostgreSQL + Redis 기반 `SyncBackend`.
pub struct PgSyncBackend {
    pool: PgPool,
    cache: FinanceCache,
}

impl PgSyncBackend {
    pub fn new(pool: PgPool, cache: FinanceCache) -> Self {
        Self { pool, cache }
    }
}

#[async_trait]
impl SyncBackend for PgSyncBackend {
    async fn list_companies(&self) -> Result<Vec<CompanyRecord>> {
        Ok(CompanyRepository::list_all(&self.pool).await?)
    }

    async fn merge_dividends(&self, company_id: i64, fetched: &[Dividend]) -> Result<usize> {
        let store = PgDividendStore::new(&self.pool);
        Ok(sync_dividends(&store, company_id, fetched).await?)
    }

    async fn evict_all_aggregates(&self) -> Result<usize> {
        Ok(self.cache.evict_all().await?)
    }
}

/// 동기화 주기 한 번을 실행합니다.
///
/// 한 회사의 실패가 주기를 중단시키지 않습니다. 주기 전체가 중단되는 경우는
/// 회사 목록 조회나 캐시 전체 무효화가 실패했을 때뿐입니다 (무효화가 실패하면
/// 주기 동안 stale 데이터가 읽힐 수 있으므로 진행하지 않습니다).
pub async fn run_cycle<B>(backend: &B, scraper: &dyn Scraper) -> Result<SyncStats>
where
    B: SyncBackend + ?Sized,
{
    let start = Instant::now();
    let mut stats = SyncStats::new();

    tracing::info!("배당금 동기화 주기 시작");

    // 무효화는 주기 전체에 대해 한 번, 모든 fetch에 선행
    let evicted = backend.evict_all_aggregates().await?;
    tracing::debug!(evicted, "캐시 무효화 완료");

    let companies = backend.list_companies().await?;
    stats.total = companies.len();
    let last_index = companies.len().saturating_sub(1);

    for (i, company) in companies.iter().enumerate() {
        tracing::info!(ticker = %company.ticker, name = %company.name, "회사 동기화 시작");

        match sync_company(backend, scraper, company).await {
            Ok(inserted) => {
                stats.success += 1;
                stats.inserted += inserted;
                tracing::info!(ticker = %company.ticker, inserted, "회사 동기화 완료");
            }
            Err(e) => {
                stats.errors += 1;
                tracing::error!(
                    ticker = %company.ticker,
                    error = %e,
                    "회사 동기화 실패, 다음 회사로 진행"
                );
            }
        }

        // 연속 요청으로 외부 소스의 rate limit을 건드리지 않도록 대기
        if i < last_index {
            tokio::time::sleep(scraper.request_delay()).await;
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// 회사 하나를 스크래핑하고 병합합니다.
async fn sync_company<B>(
    backend: &B,
    scraper: &dyn Scraper,
    company: &CompanyRecord,
) -> Result<usize>
where
    B: SyncBackend + ?Sized,
{
    let fetched = scraper
        .scrape_dividends(&Company::new(&company.ticker, &company.name))
        .await
        .map_err(|e| CollectorError::DataSource(e.to_string()))?;

    backend.merge_dividends(company.id, &fetched).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::NaiveDate;
    use dividend_data::sync::testing::MemoryDividendStore;
    use dividend_data::ScrapeError;

    use super::*;

    /// 호출 순서를 기록하는 인메모리 backend.
    struct MemoryBackend {
        companies: Vec<CompanyRecord>,
        store: MemoryDividendStore,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryBackend {
        fn new(companies: Vec<CompanyRecord>, events: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                companies,
                store: MemoryDividendStore::new(),
                events,
            }
        }
    }

    #[async_trait]
    impl SyncBackend for MemoryBackend {
        async fn list_companies(&self) -> Result<Vec<CompanyRecord>> {
            Ok(self.companies.clone())
        }

        async fn merge_dividends(&self, company_id: i64, fetched: &[Dividend]) -> Result<usize> {
            self.events
                .lock()
                .unwrap()
                .push(format!("merge:{}", company_id));
            Ok(sync_dividends(&self.store, company_id, fetched).await?)
        }

        async fn evict_all_aggregates(&self) -> Result<usize> {
            self.events.lock().unwrap().push("evict_all".to_string());
            Ok(0)
        }
    }

    /// ticker별로 정해진 결과를 돌려주는 가짜 스크래퍼.
    struct FakeScraper {
        responses: HashMap<String, Vec<Dividend>>,
        failing: Vec<String>,
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Scraper for FakeScraper {
        async fn scrape_company_by_ticker(&self, ticker: &str) -> Result2<Company> {
            Ok(Company::new(ticker, format!("{} Inc.", ticker)))
        }

        async fn scrape_dividends(&self, company: &Company) -> Result2<Vec<Dividend>> {
            self.events
                .lock()
                .unwrap()
                .push(format!("fetch:{}", company.ticker));

            if self.failing.contains(&company.ticker) {
                return Err(ScrapeError::TickerNotFound {
                    ticker: company.ticker.clone(),
                });
            }

            Ok(self.responses.get(&company.ticker).cloned().unwrap_or_default())
        }

        fn request_delay(&self) -> Duration {
            Duration::ZERO
        }
    }

    type Result2<T> = std::result::Result<T, ScrapeError>;

    fn record(id: i64, ticker: &str, name: &str) -> CompanyRecord {
        CompanyRecord {
            id,
            ticker: ticker.to_string(),
            name: name.to_string(),
        }
    }

    fn entries(n: usize) -> Vec<Dividend> {
        (0..n)
            .map(|i| {
                Dividend::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64 * 90),
                    "0.26",
                )
            })
            .collect()
    }

    fn setup(failing: &[&str]) -> (MemoryBackend, FakeScraper, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));

        let backend = MemoryBackend::new(
            vec![
                record(1, "A", "Alpha Inc."),
                record(2, "B", "Bravo Inc."),
                record(3, "C", "Charlie Inc."),
            ],
            events.clone(),
        );

        let mut responses = HashMap::new();
        responses.insert("A".to_string(), entries(5));
        responses.insert("B".to_string(), entries(4));
        responses.insert("C".to_string(), entries(3));

        let scraper = FakeScraper {
            responses,
            failing: failing.iter().map(|s| s.to_string()).collect(),
            events: events.clone(),
        };

        (backend, scraper, events)
    }

    #[tokio::test]
    async fn test_cycle_syncs_all_companies() {
        let (backend, scraper, _) = setup(&[]);

        let stats = run_cycle(&backend, &scraper).await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 3);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.inserted, 12);
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        // B의 fetch가 실패해도 A와 C의 병합은 수행되고 커밋됩니다
        let (backend, scraper, _) = setup(&["B"]);

        let stats = run_cycle(&backend, &scraper).await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(backend.store.count(1).await, 5);
        assert_eq!(backend.store.count(2).await, 0);
        assert_eq!(backend.store.count(3).await, 3);
    }

    #[tokio::test]
    async fn test_evict_all_happens_before_any_fetch() {
        let (backend, scraper, events) = setup(&[]);

        run_cycle(&backend, &scraper).await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events[0], "evict_all");
        let first_fetch = events.iter().position(|e| e.starts_with("fetch:")).unwrap();
        assert!(first_fetch > 0);
    }

    #[tokio::test]
    async fn test_repeated_cycles_are_idempotent() {
        let (backend, scraper, _) = setup(&[]);

        let first = run_cycle(&backend, &scraper).await.unwrap();
        let second = run_cycle(&backend, &scraper).await.unwrap();

        assert_eq!(first.inserted, 12);
        assert_eq!(second.inserted, 0);
        assert_eq!(backend.store.count(1).await, 5);
    }

    #[tokio::test]
    async fn test_failed_company_recovers_on_next_cycle() {
        let (backend, scraper, events) = setup(&["B"]);
        run_cycle(&backend, &scraper).await.unwrap();
        assert_eq!(backend.store.count(2).await, 0);

        // 다음 주기에 원격이 복구된 상황
        let scraper = FakeScraper {
            responses: HashMap::from([
                ("A".to_string(), entries(5)),
                ("B".to_string(), entries(4)),
                ("C".to_string(), entries(3)),
            ]),
            failing: Vec::new(),
            events,
        };

        let stats = run_cycle(&backend, &scraper).await.unwrap();
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.inserted, 4);
        assert_eq!(backend.store.count(2).await, 4);
    }
}
