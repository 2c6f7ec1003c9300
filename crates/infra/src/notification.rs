//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（本番 / Mailpit）、Noop（ログ出力のみ）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//!
//! 送信の失敗をどう扱うか（best-effort）は呼び出し側の NotificationService が決める。
//! ここでは失敗をそのまま `NotificationError` として返す。

mod noop;
mod smtp;

use async_trait::async_trait;
use intake_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use smtp::{SmtpNotificationSender, SmtpSecurity, SmtpSettings};

/// メール送信トレイト
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
