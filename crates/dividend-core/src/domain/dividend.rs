//! 배당금 지급 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Company;

/// 한 건의 배당금 지급.
///
/// 지급일은 달력 날짜만 의미가 있으며, 금액은 부동소수점 반올림 오차를 피하기 위해
/// 텍스트로 유지합니다. 같은 회사에 대해 `(company_id, date)` 쌍은 저장소에서
/// 유일해야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dividend {
    /// 배당 기준일
    pub date: NaiveDate,
    /// 배당 금액 (텍스트 표현)
    pub amount: String,
}

impl Dividend {
    pub fn new(date: NaiveDate, amount: impl Into<String>) -> Self {
        Self {
            date,
            amount: amount.into(),
        }
    }
}

/// 회사와 그 배당 이력을 합친 파생 뷰.
///
/// 읽기 경로에서 조립되어 회사명으로 캐시에 보관됩니다. 독립적으로 영속화되지
/// 않으며, 수명은 캐시의 채움/무효화 규칙을 따릅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDividends {
    pub company: Company,
    pub dividends: Vec<Dividend>,
}

impl CompanyDividends {
    pub fn new(company: Company, dividends: Vec<Dividend>) -> Self {
        Self { company, dividends }
    }
}
