//! 배당금 서비스의 데이터 계층.
//!
//! 외부 세계와 닿는 모든 구성 요소를 담습니다:
//! - `provider` — Yahoo Finance 스크래핑 (Fetch/Parse 클라이언트)
//! - `storage` — PostgreSQL 저장소 (회사/배당금 repository)
//! - `sync` — 멱등 병합 엔진 (신규 배당금만 저장)
//! - `cache` — Redis 기반 read-through 캐시

pub mod cache;
pub mod error;
pub mod provider;
pub mod storage;
pub mod sync;

pub use cache::{
    AggregateSource, FinanceCache, KeyValueStore, PgAggregateSource, RedisCache, RedisConfig,
};
pub use error::{DataError, Result};
pub use provider::{ScrapeError, Scraper, YahooFinanceScraper};
pub use storage::{CompanyRecord, CompanyRepository, DividendRecord, DividendRepository};
pub use sync::{sync_dividends, DividendStore, PgDividendStore};
