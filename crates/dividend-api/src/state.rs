//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 Axum의 State extractor를 통해 핸들러에 주입됩니다.

use std::sync::Arc;

use dividend_core::CompanyNameTrie;
use dividend_data::provider::Scraper;
use dividend_data::storage::CompanyRepository;
use dividend_data::{FinanceCache, RedisCache};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀
    pub db_pool: PgPool,

    /// Redis 연결 (헬스 체크용)
    pub redis: RedisCache,

    /// 배당 이력 read-through 캐시
    pub finance_cache: FinanceCache,

    /// 회사명 자동완성 인덱스.
    ///
    /// 저장소가 아니라 이 인메모리 인덱스가 자동완성의 serving 경로입니다.
    /// 회사 등록/삭제 시 같은 요청 안에서 함께 갱신됩니다.
    pub trie: Arc<RwLock<CompanyNameTrie>>,

    /// 외부 소스 스크래퍼 (회사 등록 시 사용)
    pub scraper: Arc<dyn Scraper>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(pool: PgPool, redis: RedisCache, scraper: Arc<dyn Scraper>) -> Self {
        Self {
            db_pool: pool,
            finance_cache: FinanceCache::new(redis.clone()),
            redis,
            trie: Arc::new(RwLock::new(CompanyNameTrie::new())),
            scraper,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 저장소의 전체 회사명으로 trie를 초기 적재합니다.
    ///
    /// 재시작 후에도 자동완성이 저장소와 일치하도록 서버 시작 시 호출됩니다.
    pub async fn load_trie(&self) -> Result<usize, sqlx::Error> {
        let names = CompanyRepository::list_all_names(&self.db_pool).await?;
        let count = names.len();

        let mut trie = self.trie.write().await;
        for name in names {
            trie.insert(&name);
        }

        info!(count, "자동완성 인덱스 초기 적재 완료");
        Ok(count)
    }

    /// DB 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.db_pool).await.is_ok()
    }

    /// Redis 연결 상태 확인.
    pub async fn is_redis_healthy(&self) -> bool {
        self.redis.health_check().await.unwrap_or(false)
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
