//! Company Repository
//!
//! 추적 대상 회사 관련 데이터베이스 연산을 담당합니다.

use dividend_core::Company;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// 회사 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyRecord {
    pub id: i64,
    pub ticker: String,
    pub name: String,
}

impl From<CompanyRecord> for Company {
    fn from(record: CompanyRecord) -> Self {
        Company::new(record.ticker, record.name)
    }
}

/// Company Repository
pub struct CompanyRepository;

impl CompanyRepository {
    /// ticker 존재 여부 확인.
    pub async fn exists_by_ticker(pool: &PgPool, ticker: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM company WHERE ticker = $1)")
            .bind(ticker)
            .fetch_one(pool)
            .await
    }

    /// 회사명 존재 여부 확인.
    pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM company WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// 회사 등록.
    pub async fn insert(pool: &PgPool, company: &Company) -> Result<CompanyRecord, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(
            r#"
            INSERT INTO company (ticker, name)
            VALUES ($1, $2)
            RETURNING id, ticker, name
            "#,
        )
        .bind(&company.ticker)
        .bind(&company.name)
        .fetch_one(pool)
        .await
    }

    /// ticker로 회사 조회.
    pub async fn find_by_ticker(
        pool: &PgPool,
        ticker: &str,
    ) -> Result<Option<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(
            "SELECT id, ticker, name FROM company WHERE ticker = $1",
        )
        .bind(ticker)
        .fetch_optional(pool)
        .await
    }

    /// 회사명으로 회사 조회.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>("SELECT id, ticker, name FROM company WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// 회사명 prefix로 조회 (대소문자 무시).
    ///
    /// trie와 별개로 존재하는 저장소 기반 자동완성 경로입니다.
    pub async fn find_by_name_prefix(
        pool: &PgPool,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(
            r#"
            SELECT id, ticker, name FROM company
            WHERE name ILIKE $1 || '%'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(prefix)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// 페이지 단위 회사 목록 조회.
    pub async fn list(
        pool: &PgPool,
        page: i64,
        size: i64,
    ) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>(
            r#"
            SELECT id, ticker, name FROM company
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size)
        .bind(page * size)
        .fetch_all(pool)
        .await
    }

    /// 전체 회사 수.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM company")
            .fetch_one(pool)
            .await
    }

    /// 추적 중인 전체 회사 조회 (동기화 주기용).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRecord>("SELECT id, ticker, name FROM company ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// 전체 회사명 조회 (trie 초기 적재용).
    pub async fn list_all_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM company")
            .fetch_all(pool)
            .await
    }

    /// 회사 삭제.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM company WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
