//! 배당금 서비스의 에러 타입.
//!
//! 모든 경계에서 공유되는 에러 분류 체계를 정의합니다.
//! 각 variant는 고정된 사용자 노출 메시지와 에러 코드로 매핑됩니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Error)]
pub enum DividendError {
    /// 이미 추적 중인 ticker로 등록 시도
    #[error("이미 정보가 존재하는 회사입니다: {0}")]
    AlreadyExists(String),

    /// 회사/회사명이 존재하지 않음
    #[error("존재하지 않는 회사입니다: {0}")]
    NotFound(String),

    /// 유효한 조회였으나 결과가 0건 (조회 실패와 구분됨)
    #[error("조회 결과가 없습니다: {0}")]
    EmptyResult(String),

    /// 외부 소스 접근 실패 (네트워크/타임아웃)
    #[error("스크래핑에 실패하였습니다: {0}")]
    FetchFailure(String),

    /// 예상하지 못한 문서 구조 (인식할 수 없는 월 이름 포함)
    #[error("문서 파싱에 실패하였습니다: {0}")]
    ParseFailure(String),

    /// 잘못된 호출자 입력 (예: 빈 ticker)
    #[error("잘못된 입력입니다: {0}")]
    Validation(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 캐시 에러
    #[error("캐시 에러: {0}")]
    Cache(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 서비스 작업을 위한 Result 타입.
pub type DividendResult<T> = Result<T, DividendError>;

impl DividendError {
    /// 안정적인 에러 코드 문자열을 반환합니다.
    ///
    /// API 응답 본문과 로그에서 사용되며, variant가 유지되는 한 변하지 않습니다.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::EmptyResult(_) => "EMPTY_RESULT",
            Self::FetchFailure(_) => "FETCH_FAILURE",
            Self::ParseFailure(_) => "PARSE_FAILURE",
            Self::Validation(_) => "VALIDATION_FAILURE",
            Self::Database(_) => "DB_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 호출자 잘못으로 분류되는 에러인지 확인합니다.
    ///
    /// 분류 체계의 여섯 종류는 모두 서버 장애가 아닌 클라이언트 에러로 보고됩니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists(_)
                | Self::NotFound(_)
                | Self::EmptyResult(_)
                | Self::FetchFailure(_)
                | Self::ParseFailure(_)
                | Self::Validation(_)
        )
    }
}
