//! 외부 데이터 소스 provider.

mod yahoo;

use std::time::Duration;

use async_trait::async_trait;
use dividend_core::{Company, Dividend, DividendError};
use thiserror::Error;

pub use yahoo::YahooFinanceScraper;

/// 스크래핑 에러.
///
/// 전송 계층 실패(`Http`)와 문서 구조 문제(`Parse`, `TickerNotFound`)를 구분해
/// 오케스트레이터가 항목 단위로 실패를 격리할 수 있게 합니다.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTML 파싱 실패: {0}")]
    Parse(String),

    #[error("Ticker에 해당하는 회사가 없습니다: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("Rate limit 초과")]
    RateLimited,
}

impl From<ScrapeError> for DividendError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Http(e) => DividendError::FetchFailure(e.to_string()),
            ScrapeError::Parse(msg) => DividendError::ParseFailure(msg),
            ScrapeError::TickerNotFound { ticker } => DividendError::NotFound(ticker),
            ScrapeError::RateLimited => {
                DividendError::FetchFailure("rate limit 초과".to_string())
            }
        }
    }
}

/// 배당 이력 스크래퍼.
///
/// 저장소나 스케줄링에 대해서는 알지 못하며, 외부 문서를 정규화된 도메인
/// 모델로 바꾸는 일만 담당합니다.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// ticker를 회사 정보(표시명)로 해석합니다.
    async fn scrape_company_by_ticker(&self, ticker: &str) -> Result<Company, ScrapeError>;

    /// 회사의 배당 이력 전체를 수집합니다.
    async fn scrape_dividends(&self, company: &Company) -> Result<Vec<Dividend>, ScrapeError>;

    /// 연속 요청 사이에 두어야 하는 최소 간격.
    ///
    /// 외부 소스에 대한 rate limit 정책은 스크래퍼에 속하며,
    /// 오케스트레이터는 이 값을 항목 사이 대기에 사용합니다.
    fn request_delay(&self) -> Duration {
        Duration::ZERO
    }
}
