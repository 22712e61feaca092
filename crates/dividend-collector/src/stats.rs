//! 동기화 주기 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 동기화 주기 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStats {
    /// 시도한 회사 수
    pub total: usize,
    /// 성공한 회사 수
    pub success: usize,
    /// 실패한 회사 수 (다음 주기에 자연 재시도)
    pub errors: usize,
    /// 신규 저장된 배당금 엔트리 수
    pub inserted: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SyncStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            inserted = self.inserted,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "동기화 완료"
        );
    }
}
