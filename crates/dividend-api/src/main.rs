//! 배당금 조회 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 회사 관리, 회사명 자동완성, 배당 이력 조회 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use dividend_api::routes::create_api_router;
use dividend_api::state::AppState;
use dividend_data::provider::YahooFinanceScraper;
use dividend_data::{RedisCache, RedisConfig};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// 서버 설정 구조체.
struct ServerConfig {
    /// 바인딩할 호스트 주소
    host: String,
    /// 바인딩할 포트
    port: u16,
    /// 데이터베이스 URL
    database_url: String,
    /// Redis URL
    redis_url: String,
    /// 스크래핑 요청 간 딜레이
    request_delay: Duration,
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL 환경변수가 설정되지 않았습니다")?;
        let redis_url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379/0".to_string());
        let request_delay_ms = std::env::var("SCRAP_REQUEST_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Ok(Self {
            host,
            port,
            database_url,
            redis_url,
            request_delay: Duration::from_millis(request_delay_ms),
        })
    }

    /// 소켓 주소 반환.
    fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // tracing 초기화 (RUST_LOG / LOG_FORMAT 환경변수)
    let log_config = dividend_core::logging::LogConfig::from_env();
    dividend_core::logging::init_logging(log_config)?;

    info!("Dividend API 서버 시작 중...");

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr().map_err(|e| {
        error!(
            host = %config.host,
            port = config.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // DB 연결
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await?;
    info!("데이터베이스 연결 성공");

    // Redis 연결
    let redis = RedisCache::connect(&RedisConfig {
        url: config.redis_url.clone(),
    })
    .await?;

    let scraper = Arc::new(YahooFinanceScraper::with_delay(config.request_delay));
    let state = Arc::new(AppState::new(pool.clone(), redis, scraper));

    // 재시작 후에도 자동완성이 저장소와 일치하도록 trie를 먼저 적재
    state.load_trie().await?;

    let app = Router::new()
        .merge(create_api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!(%addr, "API 서버 listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("서버가 정상 종료되었습니다");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C 핸들러 설치 실패");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "SIGTERM 핸들러 설치 실패"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C 수신, 종료 시작");
        }
        _ = terminate => {
            info!("SIGTERM 수신, 종료 시작");
        }
    }
}
