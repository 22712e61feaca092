//! 추적 대상 회사 모델.

use serde::{Deserialize, Serialize};

/// 배당 이력을 동기화하는 추적 대상 회사.
///
/// `ticker`는 저장소 전체에서 유일하며, `name`은 조회와 캐싱의 키로 사용됩니다
/// (유일성은 요구되지 않음).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// 외부 심볼 (예: "MMM")
    pub ticker: String,
    /// 표시용 회사명 (예: "3M Company")
    pub name: String,
}

impl Company {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
        }
    }
}
