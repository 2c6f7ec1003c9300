//! # Intake Service エラー定義
//!
//! Intake Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! 依頼送信（`POST /submit-*`）の永続化失敗は [`IntakeError`] を経由せず、
//! ユースケースの `SubmissionOutcome::Failed` として `{success: false}` 形式で返す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

const ERROR_TYPE_BASE: &str = "https://bytsofeverything.com/errors";

/// エラーレスポンス（RFC 7807 Problem Details）
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    fn new(error_type_suffix: &str, title: &str, status: StatusCode, detail: String) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
        }
    }
}

/// Intake Service で発生するエラー
#[derive(Debug, Error)]
pub enum IntakeError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] intake_infra::InfraError),

    /// リクエスト本文を解釈できない
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// リクエスト本文がサイズ上限を超えている
    #[error("リクエスト本文が大きすぎます: {0}")]
    PayloadTooLarge(String),
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            IntakeError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("not-found", "Not Found", StatusCode::NOT_FOUND, msg.clone()),
            ),
            IntakeError::Database(e) => {
                tracing::error!(error = %e, span_trace = %e.span_trace(), "データベースエラー");
                internal_error()
            }
            IntakeError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "bad-request",
                    "Bad Request",
                    StatusCode::BAD_REQUEST,
                    msg.clone(),
                ),
            ),
            IntakeError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::new(
                    "payload-too-large",
                    "Payload Too Large",
                    StatusCode::PAYLOAD_TOO_LARGE,
                    msg.clone(),
                ),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// detail は固定文言（内部情報を返さない）
fn internal_error() -> (StatusCode, ErrorResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(
            "internal-error",
            "Internal Server Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred".to_string(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_foundは404のproblem_detailsになる() {
        let response = IntakeError::NotFound("unknown service: web-design".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "type": "https://bytsofeverything.com/errors/not-found",
                "title": "Not Found",
                "status": 404,
                "detail": "unknown service: web-design",
            })
        );
    }

    #[tokio::test]
    async fn test_databaseエラーは詳細を隠して500を返す() {
        let err = IntakeError::from(intake_infra::InfraError::unexpected("disk I/O error"));

        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "An internal error occurred");
        assert!(!body.to_string().contains("disk I/O"));
    }

    #[tokio::test]
    async fn test_payload_too_largeは413のproblem_detailsになる() {
        let response =
            IntakeError::PayloadTooLarge("Request payload is too large".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "type": "https://bytsofeverything.com/errors/payload-too-large",
                "title": "Payload Too Large",
                "status": 413,
                "detail": "Request payload is too large",
            })
        );
    }

    #[tokio::test]
    async fn test_bad_requestは400を返す() {
        let response = IntakeError::BadRequest("incomplete multipart stream".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["title"], "Bad Request");
    }
}
