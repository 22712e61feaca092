//! Redis 기반 캐시 계층.

mod finance;
mod redis;

use async_trait::async_trait;

use crate::error::Result;

/// 캐시 substrate가 제공해야 하는 키-값 계약.
///
/// `FinanceCache`는 이 seam 위에서 동작하므로 Redis 없이도 인메모리 구현으로
/// 캐시 일관성을 검증할 수 있습니다.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 키의 값을 가져옵니다.
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// 키에 값을 설정합니다 (TTL 없음).
    async fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// 키를 삭제합니다. 실제로 있었으면 true를 반환합니다.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// 패턴과 일치하는 키들을 삭제하고 삭제된 수를 반환합니다.
    async fn delete_pattern(&self, pattern: &str) -> Result<usize>;
}

pub use finance::{AggregateSource, FinanceCache, PgAggregateSource};
pub use redis::{RedisCache, RedisConfig};

#[cfg(any(test, feature = "test-utils"))]
pub use finance::testing;
