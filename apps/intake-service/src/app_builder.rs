//! # アプリケーション構築
//!
//! State を受け取り、ルーターとミドルウェアを組み立てる。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use intake_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handler::{
    ReadinessState,
    SubmissionState,
    health_check,
    list_submissions,
    readiness_check,
    submit_service_request,
};

/// ルーターを構築する
///
/// - `POST /{endpoint}`: `submit-{slug}` 形式の依頼送信（未知の slug は 404）
/// - `GET /admin/submissions`: 直近 100 件の依頼一覧
/// - `GET /health`, `GET /health/ready`: ヘルスチェック
/// - 上記以外: `static_dir` の静的ファイル（`/` は `index.html`）
pub fn build_app(
    submission_state: Arc<SubmissionState>,
    readiness_state: Arc<ReadinessState>,
    static_dir: &Path,
) -> Router {
    let site = ServeDir::new(static_dir);

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/admin/submissions", get(list_submissions))
                // 1 セグメントのパスは POST なら依頼送信、それ以外は静的ファイル
                .route(
                    "/{endpoint}",
                    post(submit_service_request).fallback_service(site.clone()),
                )
                .with_state(submission_state),
        )
        .fallback_service(site)
        // 下に書いたレイヤーほど外側
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使用）
        // 2. TraceLayer: request_id をスパンに含める
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. CorsLayer: Web サイトが別オリジンから送信しても受け付ける
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
