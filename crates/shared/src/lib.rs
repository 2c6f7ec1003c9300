//! # Intake 共有ユーティリティ
//!
//! ビジネスロジックを含まない共通部品を提供する。
//!
//! - [`health`] - ヘルスチェックのレスポンス型
//! - [`observability`] - トレーシング初期化と Request ID

pub mod health;
pub mod observability;

pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
