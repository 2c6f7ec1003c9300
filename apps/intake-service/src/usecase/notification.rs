//! # 通知ユースケース
//!
//! 依頼受付に伴うメール通知の生成・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`service`] - テンプレートレンダリング + タイムアウト付き送信の統合サービス

pub mod service;
pub mod template_renderer;

pub use service::{NotificationService, NotificationSettings};
pub use template_renderer::TemplateRenderer;
