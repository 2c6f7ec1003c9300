//! # ヘルスチェックハンドラ
//!
//! Intake Service の稼働状態を確認するためのエンドポイント。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health        （liveness: プロセスが応答できるか）
//! GET /health/ready  （readiness: データベースに接続できるか）
//! ```
//!
//! レスポンス型は [`intake_shared::HealthResponse`] / [`intake_shared::ReadinessResponse`] を参照。

use std::{collections::BTreeMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use intake_infra::db;
use intake_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::SqlitePool;

/// Readiness Check の State
pub struct ReadinessState {
    pub pool: SqlitePool,
}

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(Utc::now()))
}

/// Readiness Check エンドポイント
///
/// データベースに到達できなければ 503 を返す。
pub async fn readiness_check(
    State(state): State<Arc<ReadinessState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match db::ping(&state.pool).await {
        Ok(()) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "データベースの readiness チェックに失敗");
            CheckStatus::Error
        }
    };

    let response = ReadinessResponse::from_checks(BTreeMap::from([(
        "database".to_string(),
        database,
    )]));
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
