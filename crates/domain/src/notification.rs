//! # 通知
//!
//! 依頼受付時に送るメール通知のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **best-effort**: 通知の失敗は依頼の受付結果に影響しない。
//!   失敗は [`DeliveryStatus::Failed`] として呼び出し元に返し、ログに残す
//! - **テンプレート分離**: 通知イベントとメール本文の生成は分離する
//!   （TemplateRenderer は intake-service 側）

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{service_type::ServiceType, submission::SubmissionFields};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// メールアドレスが不正
    #[error("メールアドレスが不正: {0}")]
    InvalidAddress(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 送信が制限時間内に終わらなかった
    #[error("メール送信がタイムアウトしました（{0} 秒）")]
    Timeout(u64),
}

/// 通知の送信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 依頼受付に伴う通知イベント
#[derive(Debug, Clone)]
pub enum SubmissionNotification {
    /// 管理者向け: 新しい依頼が届いた
    AdminAlert {
        admin_email:  String,
        service_type: ServiceType,
        fields:       SubmissionFields,
        submitted_at: DateTime<Utc>,
    },
    /// 顧客向け: 受付確認
    CustomerConfirmation {
        customer_email: String,
        customer_name:  String,
        service_type:   ServiceType,
        scheduling_url: String,
    },
}

impl SubmissionNotification {
    /// 受信者のメールアドレス
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::AdminAlert { admin_email, .. } => admin_email,
            Self::CustomerConfirmation { customer_email, .. } => customer_email,
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::AdminAlert { service_type, .. }
            | Self::CustomerConfirmation { service_type, .. } => *service_type,
        }
    }

    /// ログ出力用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AdminAlert { .. } => "admin_alert",
            Self::CustomerConfirmation { .. } => "customer_confirmation",
        }
    }
}
