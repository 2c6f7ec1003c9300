//! # ユースケース層
//!
//! Intake Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・送信実装を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - [`notification`]: メール通知（テンプレート + 送信）
//! - [`submission`]: 依頼受付パイプライン

pub mod notification;
pub mod submission;

pub use notification::{NotificationService, NotificationSettings, TemplateRenderer};
pub use submission::{SubmissionOutcome, SubmissionUseCaseImpl};
