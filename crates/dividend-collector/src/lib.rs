//! Standalone dividend collector.
//!
//! 이 crate는 API 서버와 독립적으로 배당 이력을 수집하는 바이너리를 제공합니다:
//! - 추적 중인 전체 회사 순회 (고정 주기)
//! - 회사별 스크래핑 + 멱등 병합 (항목 단위 실패 격리)
//! - 주기 시작 시 캐시 전체 무효화

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::{redact_credentials, CollectorConfig};
pub use error::{CollectorError, Result};
pub use stats::SyncStats;
