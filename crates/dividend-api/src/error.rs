//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트가 같은 JSON 형식과 같은 에러→상태코드 매핑을 사용합니다.
//! 매핑은 분류 체계의 variant에만 의존하므로 핸들러마다 달라질 수 없습니다.

use axum::http::StatusCode;
use axum::Json;
use dividend_core::DividendError;
use serde::{Deserialize, Serialize};

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "존재하지 않는 회사입니다: 3M Company"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 안정적인 에러 코드 (예: "NOT_FOUND", "ALREADY_EXISTS")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 분류 체계 variant → HTTP 상태코드.
fn status_for(err: &DividendError) -> StatusCode {
    match err {
        DividendError::AlreadyExists(_) => StatusCode::CONFLICT,
        DividendError::NotFound(_) | DividendError::EmptyResult(_) => StatusCode::NOT_FOUND,
        DividendError::Validation(_) => StatusCode::BAD_REQUEST,
        // 업스트림 소스 장애는 이 서버의 장애와 구분해 보고
        DividendError::FetchFailure(_) | DividendError::ParseFailure(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `DividendError`를 핸들러 에러 튜플로 변환합니다.
pub fn error_response(err: DividendError) -> (StatusCode, Json<ApiErrorResponse>) {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(code = err.code(), error = %err, "요청 처리 실패");
    } else {
        tracing::debug!(code = err.code(), error = %err, "클라이언트 에러");
    }

    (
        status,
        Json(ApiErrorResponse::new(err.code(), err.to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&DividendError::AlreadyExists("MMM".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DividendError::NotFound("3M Company".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DividendError::EmptyResult("C".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DividendError::Validation("빈 ticker".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DividendError::FetchFailure("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&DividendError::ParseFailure("bad month".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&DividendError::Database("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_key_maps_to_conflict() {
        // 존재 확인을 통과한 두 요청이 경합해도 유니크 제약 위반은
        // 내부 에러가 아니라 409로 보고되어야 합니다
        let err = DividendError::from(dividend_data::DataError::DuplicateError(
            "duplicate key value violates unique constraint \"company_ticker_key\"".to_string(),
        ));

        let (status, Json(body)) = error_response(err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "ALREADY_EXISTS");
    }

    #[test]
    fn test_error_response_body() {
        let (status, Json(body)) = error_response(DividendError::NotFound("3M Company".into()));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        assert!(body.message.contains("3M Company"));
    }

    #[test]
    fn test_json_shape() {
        let error = ApiErrorResponse::new("EMPTY_RESULT", "조회 결과가 없습니다: C");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains(r#""code":"EMPTY_RESULT""#));
        assert!(json.contains("조회 결과가 없습니다"));
    }
}
