//! PostgreSQL 저장소.
//!
//! 저장소는 유일한 source of truth이며, `(company_id, date)` 고유 제약을
//! 트랜잭션 차원에서 강제하는 유일한 구성 요소입니다.

mod company;
mod dividend;

pub use company::{CompanyRecord, CompanyRepository};
pub use dividend::{DividendRecord, DividendRepository};
