//! # Intake インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: SQLite への接続プール管理とマイグレーション
//! - **リポジトリ実装**: サービス依頼の永続化
//! - **メール送信**: SMTP / Noop の送信実装
//!
//! ## モジュール構成
//!
//! - [`db`] - SQLite データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）

pub mod db;
pub mod error;
pub mod notification;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
