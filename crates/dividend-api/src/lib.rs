//! 배당금 조회 REST API 서버 라이브러리.
//!
//! - `state` — 모든 핸들러가 공유하는 `AppState`
//! - `error` — 통합 에러 응답과 에러→상태코드 매핑
//! - `routes` — 회사 관리 / 자동완성 / 배당 조회 / 헬스 체크 라우트
//! - `services` — 핸들러에서 분리한 도메인 서비스 (삭제 cascade)

pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use state::AppState;
