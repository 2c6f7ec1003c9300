//! # 依頼受付ハンドラ
//!
//! Web サイトの各サービスフォームの送信先。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /submit-{slug}
//! ```
//!
//! `slug` はサービスカタログ（[`ServiceType`]）の 20 種類。未知の slug は 404。
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Thank you! Your submission has been received. We will contact you shortly.",
//!   "submission_id": 42
//! }
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intake_domain::ServiceType;
use serde::Serialize;

use super::form::FormFields;
use crate::{
    error::IntakeError,
    usecase::{
        SubmissionOutcome,
        SubmissionUseCaseImpl,
        submission::ACCEPTED_MESSAGE,
    },
};

/// 送信先パスの接頭辞
const SUBMIT_PREFIX: &str = "submit-";

/// 依頼受付・一覧ハンドラーの State
pub struct SubmissionState {
    pub usecase: SubmissionUseCaseImpl,
}

/// 依頼受付レスポンス
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success:       bool,
    pub message:       String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<i64>,
}

/// サービス依頼を受け付ける
///
/// ## エンドポイント
/// POST /submit-{slug}
///
/// - 保存成功: 200 `{success: true, message, submission_id}`（通知の成否は問わない）
/// - 保存失敗: 500 `{success: false, message}`
/// - 本文を読み取れない: 400 / 413（problem details、保存もメール送信もしない）
#[tracing::instrument(skip_all, fields(endpoint = %endpoint))]
pub async fn submit_service_request(
    State(state): State<Arc<SubmissionState>>,
    Path(endpoint): Path<String>,
    FormFields(fields): FormFields,
) -> Result<Response, IntakeError> {
    let service_type = endpoint
        .strip_prefix(SUBMIT_PREFIX)
        .and_then(ServiceType::from_slug)
        .ok_or_else(|| IntakeError::NotFound(format!("不明な送信先です: /{endpoint}")))?;

    let response = match state.usecase.submit(service_type, fields).await {
        SubmissionOutcome::Accepted { submission_id, .. } => (
            StatusCode::OK,
            Json(SubmitResponse {
                success:       true,
                message:       ACCEPTED_MESSAGE.to_string(),
                submission_id: Some(submission_id.as_i64()),
            }),
        ),
        SubmissionOutcome::Failed { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SubmitResponse {
                success: false,
                message,
                submission_id: None,
            }),
        ),
    };

    Ok(response.into_response())
}
