//! Dividend Repository
//!
//! 배당금 엔트리 관련 데이터베이스 연산을 담당합니다.
//! 엔트리는 생성 이후 변경되지 않으며, 회사 삭제에 따라서만 함께 삭제됩니다.

use chrono::NaiveDate;
use dividend_core::Dividend;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// 배당금 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DividendRecord {
    pub id: i64,
    pub company_id: i64,
    pub date: NaiveDate,
    pub amount: String,
}

impl From<DividendRecord> for Dividend {
    fn from(record: DividendRecord) -> Self {
        Dividend::new(record.date, record.amount)
    }
}

/// Dividend Repository
pub struct DividendRepository;

impl DividendRepository {
    /// 회사의 배당 이력 전체 조회 (날짜순).
    pub async fn find_all_by_company_id(
        pool: &PgPool,
        company_id: i64,
    ) -> Result<Vec<DividendRecord>, sqlx::Error> {
        sqlx::query_as::<_, DividendRecord>(
            r#"
            SELECT id, company_id, date, amount FROM dividend
            WHERE company_id = $1
            ORDER BY date
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// `(company_id, date)` 존재 여부 확인.
    pub async fn exists_by_company_id_and_date(
        pool: &PgPool,
        company_id: i64,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM dividend WHERE company_id = $1 AND date = $2)",
        )
        .bind(company_id)
        .bind(date)
        .fetch_one(pool)
        .await
    }

    /// 배당금 엔트리 저장.
    ///
    /// 고유 제약이 최종 방어선이므로 동시 재시도에도 중복이 쌓이지 않습니다.
    /// 실제로 삽입되었으면 true를 반환합니다.
    pub async fn insert(
        pool: &PgPool,
        company_id: i64,
        dividend: &Dividend,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO dividend (company_id, date, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id, date) DO NOTHING
            "#,
        )
        .bind(company_id)
        .bind(dividend.date)
        .bind(&dividend.amount)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 여러 엔트리 일괄 저장. 실제 삽입된 수를 반환합니다.
    pub async fn insert_many(
        pool: &PgPool,
        company_id: i64,
        dividends: &[Dividend],
    ) -> Result<usize, sqlx::Error> {
        let mut inserted = 0;
        for dividend in dividends {
            if Self::insert(pool, company_id, dividend).await? {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    /// 회사의 배당 이력 전체 삭제 (회사 삭제 cascade 경로).
    pub async fn delete_all_by_company_id(
        pool: &PgPool,
        company_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dividend WHERE company_id = $1")
            .bind(company_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// 회사의 배당 엔트리 수.
    pub async fn count_by_company_id(pool: &PgPool, company_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM dividend WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(pool)
            .await
    }
}
