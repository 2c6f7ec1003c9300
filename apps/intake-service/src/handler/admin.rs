//! # 管理者向け依頼一覧ハンドラ
//!
//! 認証なしで直近の依頼を確認するためのエンドポイント。

use std::sync::Arc;

use axum::{Json, extract::State};
use intake_domain::Submission;
use serde::Serialize;

use super::submission::SubmissionState;
use crate::error::IntakeError;

/// 一覧に返す最大件数
pub const ADMIN_LIST_LIMIT: u32 = 100;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 依頼一覧の要素 DTO
#[derive(Debug, Serialize)]
pub struct SubmissionSummaryDto {
    pub id:           i64,
    pub service_type: String,
    pub name:         String,
    pub email:        String,
    pub description:  String,
    pub deadline:     String,
    pub created_at:   String,
}

impl From<Submission> for SubmissionSummaryDto {
    fn from(submission: Submission) -> Self {
        Self {
            id:           submission.id.as_i64(),
            service_type: submission.service_type,
            name:         submission.name,
            email:        submission.email,
            description:  submission.description,
            deadline:     submission.deadline,
            created_at:   submission.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionSummaryDto>,
}

/// 直近の依頼を新しい順に取得する
///
/// ## エンドポイント
/// GET /admin/submissions
pub async fn list_submissions(
    State(state): State<Arc<SubmissionState>>,
) -> Result<Json<SubmissionListResponse>, IntakeError> {
    let submissions = state.usecase.list_recent(ADMIN_LIST_LIMIT).await?;

    Ok(Json(SubmissionListResponse {
        submissions: submissions.into_iter().map(SubmissionSummaryDto::from).collect(),
    }))
}
