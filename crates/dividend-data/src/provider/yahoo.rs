//! Yahoo Finance 스크래퍼.
//!
//! 두 가지 문서를 소비합니다:
//! - 요약 페이지: ticker → 회사명 해석
//! - 월 단위 이력 테이블 페이지: 배당금 행 추출
//!
//! 사이트 구조에 대한 가정은 본질적으로 깨지기 쉬우며, 전부 이 모듈 안에
//! 격리되어 있습니다. 구조 변경은 조용히 데이터를 잃는 대신 `Parse` 에러로
//! 즉시 드러나도록 엄격하게 처리합니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use dividend_core::{Company, Dividend};
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use super::{ScrapeError, Scraper};

const DEFAULT_BASE_URL: &str = "https://finance.yahoo.com";

/// 이력 조회 시간 창의 시작점 (epoch 초).
///
/// 전체 이력을 받기 위해 epoch 직후의 고정 시각을 사용합니다.
const PERIOD_START_EPOCH_SECS: i64 = 86_400;

/// Yahoo Finance 스크래퍼.
///
/// rate limit 정책(연속 요청 간 최소 간격)은 이 클라이언트에 속합니다.
pub struct YahooFinanceScraper {
    client: Client,
    base_url: String,
    request_delay: Duration,
}

impl Default for YahooFinanceScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooFinanceScraper {
    /// 기본 설정으로 생성 (요청 간격 3초).
    pub fn new() -> Self {
        Self::with_delay(Duration::from_secs(3))
    }

    /// 커스텀 요청 간격으로 생성.
    pub fn with_delay(request_delay: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, request_delay)
    }

    /// 커스텀 base URL로 생성 (테스트용 mock 서버 포함).
    pub fn with_base_url(base_url: impl Into<String>, request_delay: Duration) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            client,
            base_url: base_url.into(),
            request_delay,
        }
    }

    fn summary_url(&self, ticker: &str) -> String {
        format!("{}/quote/{}/?p={}", self.base_url, ticker, ticker)
    }

    fn history_url(&self, ticker: &str, start: i64, end: i64) -> String {
        format!(
            "{}/quote/{}/history/?p={}&frequency=1mo&period1={}&period2={}",
            self.base_url, ticker, ticker, start, end
        )
    }

    async fn fetch_document(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScrapeError::RateLimited);
        }

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Scraper for YahooFinanceScraper {
    async fn scrape_company_by_ticker(&self, ticker: &str) -> Result<Company, ScrapeError> {
        let url = self.summary_url(ticker);
        let html = self.fetch_document(&url).await?;

        let name = extract_company_name(&html).ok_or_else(|| ScrapeError::TickerNotFound {
            ticker: ticker.to_string(),
        })?;

        Ok(Company::new(ticker, name))
    }

    async fn scrape_dividends(&self, company: &Company) -> Result<Vec<Dividend>, ScrapeError> {
        let end = chrono::Utc::now().timestamp();
        let url = self.history_url(&company.ticker, PERIOD_START_EPOCH_SECS, end);
        let html = self.fetch_document(&url).await?;

        parse_history_document(&html)
    }

    fn request_delay(&self) -> Duration {
        self.request_delay
    }
}

/// 요약 페이지에서 회사명을 추출합니다.
///
/// 제목 요소는 "3M Company (MMM)" 형식이므로 여는 괄호 앞부분을 취합니다.
/// 기대하는 요소가 없으면 None (존재하지 않는 ticker 또는 레이아웃 변경).
fn extract_company_name(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h1").ok()?;

    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        if let Some((name, _)) = text.split_once('(') {
            let name = name.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }

    None
}

/// 이력 테이블 문서에서 배당금 행을 추출합니다.
///
/// 테이블 자체가 없으면 레이아웃 변경으로 간주해 `Parse` 에러를 반환합니다.
fn parse_history_document(html: &str) -> Result<Vec<Dividend>, ScrapeError> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table tbody tr")
        .map_err(|e| ScrapeError::Parse(format!("셀렉터 오류: {}", e)))?;

    let mut rows = document.select(&row_selector).peekable();
    if rows.peek().is_none() {
        return Err(ScrapeError::Parse(
            "배당 이력 테이블을 찾을 수 없습니다".to_string(),
        ));
    }

    let mut dividends = Vec::new();
    for row in rows {
        let text = row.text().collect::<Vec<_>>().join(" ");
        if let Some(dividend) = parse_dividend_row(&text)? {
            dividends.push(dividend);
        }
    }

    Ok(dividends)
}

/// 테이블 행 하나를 파싱합니다.
///
/// 행 텍스트는 "Mar 7, 2024 0.26 Dividend" 형식입니다. 끝이 "Dividend"가 아닌
/// 행(액면분할 등 다른 corporate action)은 건너뜁니다. 인식할 수 없는 월 이름은
/// 업스트림 형식 변경을 의미하므로 조용히 건너뛰지 않고 치명적 에러로 올립니다.
fn parse_dividend_row(text: &str) -> Result<Option<Dividend>, ScrapeError> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.ends_with("Dividend") {
        return Ok(None);
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(ScrapeError::Parse(format!(
            "배당금 행 형식이 예상과 다릅니다: {}",
            text
        )));
    }

    let month = month_to_number(parts[0]).ok_or_else(|| {
        ScrapeError::Parse(format!("인식할 수 없는 월 이름: {}", parts[0]))
    })?;
    let day: u32 = parts[1]
        .trim_end_matches(',')
        .parse()
        .map_err(|_| ScrapeError::Parse(format!("잘못된 일자: {}", parts[1])))?;
    let year: i32 = parts[2]
        .parse()
        .map_err(|_| ScrapeError::Parse(format!("잘못된 연도: {}", parts[2])))?;

    let amount = parts[3];
    // 금액은 텍스트로 보존하되, 숫자가 아닌 셀은 여기서 걸러냅니다
    amount
        .parse::<Decimal>()
        .map_err(|_| ScrapeError::Parse(format!("잘못된 배당 금액: {}", amount)))?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ScrapeError::Parse(format!("유효하지 않은 날짜: {}", text)))?;

    Ok(Some(Dividend::new(date, amount)))
}

/// 월 이름 → 월 번호 고정 매핑.
fn month_to_number(token: &str) -> Option<u32> {
    match token {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_to_number() {
        assert_eq!(month_to_number("Jan"), Some(1));
        assert_eq!(month_to_number("Dec"), Some(12));
        assert_eq!(month_to_number("Janvier"), None);
        assert_eq!(month_to_number("jan"), None);
    }

    #[test]
    fn test_parse_dividend_row() {
        let parsed = parse_dividend_row("Mar 7, 2024 0.26 Dividend").unwrap();
        assert_eq!(
            parsed,
            Some(Dividend::new(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(), "0.26"))
        );
    }

    #[test]
    fn test_parse_skips_other_corporate_actions() {
        assert_eq!(parse_dividend_row("Apr 1, 2024 4:1 Stock Split").unwrap(), None);
        assert_eq!(parse_dividend_row("Jun 3, 2024 1.20 Capital Gain").unwrap(), None);
    }

    #[test]
    fn test_parse_unrecognized_month_is_fatal() {
        let err = parse_dividend_row("Mars 7, 2024 0.26 Dividend").unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)), "got {:?}", err);
    }

    #[test]
    fn test_parse_rejects_non_numeric_amount() {
        let err = parse_dividend_row("Mar 7, 2024 N/A Dividend").unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[test]
    fn test_extract_company_name() {
        let html = "<html><body><h1>3M Company (MMM)</h1></body></html>";
        assert_eq!(extract_company_name(html), Some("3M Company".to_string()));
    }

    #[test]
    fn test_extract_company_name_absent() {
        let html = "<html><body><p>Symbol not found</p></body></html>";
        assert_eq!(extract_company_name(html), None);
    }

    #[test]
    fn test_parse_history_document() {
        let html = r#"
            <table>
              <thead><tr><th>Date</th><th>Event</th></tr></thead>
              <tbody>
                <tr><td>Mar 7, 2024</td><td>0.26 Dividend</td></tr>
                <tr><td>Apr 1, 2024</td><td>4:1 Stock Split</td></tr>
                <tr><td>Dec 7, 2023</td><td>0.25 Dividend</td></tr>
              </tbody>
            </table>
        "#;

        let dividends = parse_history_document(html).unwrap();
        assert_eq!(dividends.len(), 2);
        assert_eq!(dividends[0].amount, "0.26");
        assert_eq!(dividends[1].date, NaiveDate::from_ymd_opt(2023, 12, 7).unwrap());
    }

    #[test]
    fn test_parse_history_document_without_table_is_fatal() {
        let err = parse_history_document("<html><body>nothing here</body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[tokio::test]
    async fn test_scrape_company_by_ticker() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html><h1>3M Company (MMM)</h1></html>")
            .create_async()
            .await;

        let scraper = YahooFinanceScraper::with_base_url(server.url(), Duration::ZERO);
        let company = scraper.scrape_company_by_ticker("MMM").await.unwrap();

        assert_eq!(company, Company::new("MMM", "3M Company"));
    }

    #[tokio::test]
    async fn test_scrape_company_not_found_is_distinct_from_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html><body>no title element</body></html>")
            .create_async()
            .await;

        let scraper = YahooFinanceScraper::with_base_url(server.url(), Duration::ZERO);
        let err = scraper.scrape_company_by_ticker("NOPE").await.unwrap_err();

        assert!(matches!(err, ScrapeError::TickerNotFound { ref ticker } if ticker == "NOPE"));
    }

    #[tokio::test]
    async fn test_scrape_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let scraper = YahooFinanceScraper::with_base_url(server.url(), Duration::ZERO);
        let err = scraper.scrape_company_by_ticker("MMM").await.unwrap_err();

        assert!(matches!(err, ScrapeError::Http(_)));
    }

    #[tokio::test]
    async fn test_scrape_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let scraper = YahooFinanceScraper::with_base_url(server.url(), Duration::ZERO);
        let err = scraper.scrape_company_by_ticker("MMM").await.unwrap_err();

        assert!(matches!(err, ScrapeError::RateLimited));
    }

    #[tokio::test]
    async fn test_scrape_dividends() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"<table><tbody>
                    <tr><td>Mar 7, 2024</td><td>0.26 Dividend</td></tr>
                    <tr><td>Dec 7, 2023</td><td>0.25 Dividend</td></tr>
                </tbody></table>"#,
            )
            .create_async()
            .await;

        let scraper = YahooFinanceScraper::with_base_url(server.url(), Duration::ZERO);
        let company = Company::new("MMM", "3M Company");
        let dividends = scraper.scrape_dividends(&company).await.unwrap();

        assert_eq!(dividends.len(), 2);
    }
}
