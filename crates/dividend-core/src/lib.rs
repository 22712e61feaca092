//! 배당금 서비스의 핵심 도메인 모델과 타입.
//!
//! 이 crate는 외부 의존성이 거의 없는 순수 도메인 계층입니다:
//! - 도메인 모델 (`Company`, `Dividend`, `CompanyDividends`)
//! - 에러 분류 체계 (`DividendError`)
//! - 회사명 자동완성용 prefix 인덱스 (`CompanyNameTrie`)
//! - 로깅 초기화 (`logging`)

pub mod autocomplete;
pub mod domain;
pub mod error;
pub mod logging;

pub use autocomplete::CompanyNameTrie;
pub use domain::{Company, CompanyDividends, Dividend};
pub use error::{DividendError, DividendResult};
