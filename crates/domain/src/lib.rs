//! # Intake ドメイン層
//!
//! Web フォームから受け付けるサービス依頼（Submission）のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! intake-service → infra → domain
//!        ↘                   ↑
//!         └──────────────────┘
//! ```
//!
//! ドメイン層は DB や SMTP などの外部システムに依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（テストで固定時刻を注入するため）
//! - [`service_type`] - 提供サービスのカタログ（ルート slug と表示ラベル）
//! - [`submission`] - 依頼レコードとフォーム項目の正規化
//! - [`notification`] - メール通知のドメインモデル

pub mod clock;
pub mod notification;
pub mod service_type;
pub mod submission;

pub use service_type::ServiceType;
pub use submission::{Submission, SubmissionFields, SubmissionId};
