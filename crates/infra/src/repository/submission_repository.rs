//! # SubmissionRepository
//!
//! サービス依頼の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **追記のみ**: INSERT と一覧取得だけを提供する。UPDATE / DELETE は持たない
//! - **additional_data**: 送信された全項目を JSON で保存し、型付きカラムは
//!   既知の 8 項目を空文字列デフォルトで射影する
//! - **created_at**: 挿入時に注入された [`Clock`] から採番する

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intake_domain::{
    ServiceType,
    Submission,
    SubmissionFields,
    SubmissionId,
    clock::Clock,
};
use sqlx::SqlitePool;

use crate::error::InfraError;

/// サービス依頼リポジトリトレイト
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// 依頼を 1 件保存し、採番された ID を返す
    async fn save(
        &self,
        service_type: ServiceType,
        fields: &SubmissionFields,
    ) -> Result<SubmissionId, InfraError>;

    /// 新しい順（created_at 降順、同時刻は id 降順）に最大 `limit` 件を取得する
    async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, InfraError>;
}

/// SQLite 実装の SubmissionRepository
#[derive(Clone)]
pub struct SqliteSubmissionRepository {
    pool:  SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteSubmissionRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// `submissions` テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id:              i64,
    service_type:    String,
    name:            String,
    email:           String,
    description:     Option<String>,
    deadline:        Option<String>,
    urgency:         Option<String>,
    platform:        Option<String>,
    timeline:        Option<String>,
    budget:          Option<String>,
    additional_data: Option<String>,
    created_at:      DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = InfraError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let additional_data = match row.additional_data.as_deref() {
            Some(json) if !json.is_empty() => serde_json::from_str(json)?,
            _ => SubmissionFields::default(),
        };

        Ok(Submission {
            id: SubmissionId::new(row.id),
            service_type: row.service_type,
            name: row.name,
            email: row.email,
            description: row.description.unwrap_or_default(),
            deadline: row.deadline.unwrap_or_default(),
            urgency: row.urgency.unwrap_or_default(),
            platform: row.platform.unwrap_or_default(),
            timeline: row.timeline.unwrap_or_default(),
            budget: row.budget.unwrap_or_default(),
            additional_data,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl SubmissionRepository for SqliteSubmissionRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(service_type = %service_type))]
    async fn save(
        &self,
        service_type: ServiceType,
        fields: &SubmissionFields,
    ) -> Result<SubmissionId, InfraError> {
        let additional_data = serde_json::to_string(fields)?;
        let created_at = self.clock.now();

        let result = sqlx::query(
            r#"
            INSERT INTO submissions (
                service_type, name, email, description, deadline,
                urgency, platform, timeline, budget,
                additional_data, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(service_type.label())
        .bind(fields.get_or_empty("name"))
        .bind(fields.get_or_empty("email"))
        .bind(fields.get_or_empty("description"))
        .bind(fields.get_or_empty("deadline"))
        .bind(fields.get_or_empty("urgency"))
        .bind(fields.get_or_empty("platform"))
        .bind(fields.get_or_empty("timeline"))
        .bind(fields.get_or_empty("budget"))
        .bind(additional_data)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(SubmissionId::new(result.last_insert_rowid()))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(limit = limit))]
    async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, InfraError> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT
                id, service_type, name, email, description, deadline,
                urgency, platform, timeline, budget,
                additional_data, created_at
            FROM submissions
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Submission::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteSubmissionRepository>();
    }

    #[test]
    fn test_空のadditional_dataは空の項目になる() {
        let row = SubmissionRow {
            id:              7,
            service_type:    "MVP Launch Pad".to_string(),
            name:            "Jo".to_string(),
            email:           "jo@x.com".to_string(),
            description:     None,
            deadline:        None,
            urgency:         None,
            platform:        None,
            timeline:        None,
            budget:          None,
            additional_data: None,
            created_at:      Utc::now(),
        };

        let submission = Submission::try_from(row).unwrap();

        assert_eq!(submission.id, SubmissionId::new(7));
        assert_eq!(submission.description, "");
        assert!(submission.additional_data.is_empty());
    }

    #[test]
    fn test_壊れたadditional_dataはエラーになる() {
        let row = SubmissionRow {
            id:              1,
            service_type:    "Code Rescue Mission".to_string(),
            name:            String::new(),
            email:           String::new(),
            description:     None,
            deadline:        None,
            urgency:         None,
            platform:        None,
            timeline:        None,
            budget:          None,
            additional_data: Some("{broken".to_string()),
            created_at:      Utc::now(),
        };

        assert!(Submission::try_from(row).is_err());
    }
}
