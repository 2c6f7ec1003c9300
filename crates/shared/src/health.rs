//! # ヘルスチェック共通型
//!
//! `/health`（liveness）と `/health/ready`（readiness）のレスポンス型を提供する。

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// ```
/// use chrono::{DateTime, Utc};
/// use intake_shared::HealthResponse;
///
/// let now: DateTime<Utc> = DateTime::from_timestamp(0, 0).unwrap();
/// let response = HealthResponse::healthy(now);
/// assert_eq!(response.status, "healthy");
/// assert_eq!(response.timestamp, "1970-01-01T00:00:00.000Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"`）
    pub status:    String,
    /// 応答時刻（RFC 3339 / ISO 8601）
    pub timestamp: String,
    /// アプリケーションバージョン
    pub version:   String,
}

impl HealthResponse {
    /// 稼働中を表すレスポンスを作る
    pub fn healthy(now: DateTime<Utc>) -> Self {
        Self {
            status:    "healthy".to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version:   env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// 全依存先が利用可能
    Ready,
    /// 一部の依存先が利用不可
    NotReady,
}

/// Readiness Check レスポンス
///
/// `checks` はチェック名（例: `"database"`）ごとの結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 個別チェックの結果から全体のステータスを決める
    pub fn from_checks(checks: BTreeMap<String, CheckStatus>) -> Self {
        let status = if checks.values().all(|c| *c == CheckStatus::Ok) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, checks }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
