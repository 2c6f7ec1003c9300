//! # リポジトリ実装
//!
//! ドメインモデルの永続化を担当する。
//!
//! - **依存性注入**: ユースケースは `Arc<dyn SubmissionRepository>` を受け取る
//! - **テスタビリティ**: トレイト経由でモック・故障注入が可能

pub mod submission_repository;

pub use submission_repository::{SqliteSubmissionRepository, SubmissionRepository};
