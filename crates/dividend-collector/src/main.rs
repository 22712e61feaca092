//! Standalone dividend collector CLI.

use clap::{Parser, Subcommand};
use dividend_collector::{modules, redact_credentials, CollectorConfig};
use dividend_data::provider::YahooFinanceScraper;
use dividend_data::{FinanceCache, RedisCache, RedisConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dividend-collector")]
#[command(about = "Standalone Dividend History Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 동기화 주기 1회 실행
    RunOnce,

    /// 데몬 모드: 고정 주기로 동기화 실행
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dividend_collector={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Dividend Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    // URL의 자격 증명은 로그에 남기지 않습니다
    tracing::debug!(
        database_url = %redact_credentials(&config.database_url),
        "설정 로드 완료"
    );

    // DB 연결
    let pool = sqlx::PgPool::connect(&config.database_url).await?;
    tracing::info!("데이터베이스 연결 성공");

    // Redis 연결
    let redis = RedisCache::connect(&RedisConfig {
        url: config.redis_url.clone(),
    })
    .await?;
    tracing::info!("Redis 연결 성공");

    let backend = modules::PgSyncBackend::new(pool.clone(), FinanceCache::new(redis));
    let scraper = YahooFinanceScraper::with_delay(config.request_delay());

    // 명령 실행
    match cli.command {
        Commands::RunOnce => {
            let stats = modules::run_cycle(&backend, &scraper).await?;
            stats.log_summary("배당금 동기화");
        }
        Commands::Daemon => {
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.daemon.interval_minutes
            );

            let mut interval = tokio::time::interval(config.daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        // 주기 실행 중에도 종료 신호를 받으면 항목 사이에서 중단
                        tokio::select! {
                            _ = tokio::signal::ctrl_c() => {
                                tracing::info!("종료 신호 수신, 진행 중인 주기 중단");
                                break;
                            }
                            result = modules::run_cycle(&backend, &scraper) => {
                                match result {
                                    Ok(stats) => {
                                        stats.log_summary("배당금 동기화");
                                    }
                                    Err(e) => {
                                        tracing::error!("배당금 동기화 주기 실패: {}", e);
                                    }
                                }

                                tracing::info!(
                                    "=== 주기 완료, 다음 실행: {}분 후 ===",
                                    config.daemon.interval_minutes
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    pool.close().await;
    tracing::info!("Dividend Collector 종료");

    Ok(())
}
