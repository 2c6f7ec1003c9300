//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**:
//!   - 管理者向け: `New {サービス種別} Submission - Byts of Everything`
//!   - 顧客向け: `Thank you for contacting Byts of Everything`
//! - **未送信の項目**: 管理者向けの name / email / deadline / description は
//!   キー自体が無い場合に `N/A` と表示する

use chrono::{DateTime, Utc};
use intake_domain::{
    SubmissionFields,
    notification::{EmailMessage, NotificationError, SubmissionNotification},
};
use tera::{Context, Tera};

/// 受付日時の表示形式
const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NOT_AVAILABLE: &str = "N/A";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`SubmissionNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// `include_str!` で埋め込んだテンプレートを tera に登録する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "admin_alert.html",
                    include_str!("../../../templates/notifications/admin_alert.html"),
                ),
                (
                    "admin_alert.txt",
                    include_str!("../../../templates/notifications/admin_alert.txt"),
                ),
                (
                    "customer_confirmation.html",
                    include_str!("../../../templates/notifications/customer_confirmation.html"),
                ),
                (
                    "customer_confirmation.txt",
                    include_str!("../../../templates/notifications/customer_confirmation.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    pub fn render(
        &self,
        notification: &SubmissionNotification,
    ) -> Result<EmailMessage, NotificationError> {
        let (template_name, subject, context) = build_template_params(notification)?;

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipient_email().to_string(),
            subject,
            html_body,
            text_body,
        })
    }
}

/// テンプレート名、件名、コンテキストを構築する
fn build_template_params(
    notification: &SubmissionNotification,
) -> Result<(&'static str, String, Context), NotificationError> {
    let label = notification.service_type().label();

    let mut context = Context::new();
    context.insert("service_type", label);

    match notification {
        SubmissionNotification::AdminAlert {
            fields,
            submitted_at,
            ..
        } => {
            insert_admin_fields(&mut context, fields, *submitted_at)?;
            Ok((
                "admin_alert",
                format!("New {label} Submission - Byts of Everything"),
                context,
            ))
        }
        SubmissionNotification::CustomerConfirmation {
            customer_name,
            scheduling_url,
            ..
        } => {
            context.insert("customer_name", customer_name);
            context.insert("scheduling_url", scheduling_url);
            Ok((
                "customer_confirmation",
                "Thank you for contacting Byts of Everything".to_string(),
                context,
            ))
        }
    }
}

fn insert_admin_fields(
    context: &mut Context,
    fields: &SubmissionFields,
    submitted_at: DateTime<Utc>,
) -> Result<(), NotificationError> {
    for key in ["name", "email", "deadline", "description"] {
        context.insert(key, fields.get(key).unwrap_or(NOT_AVAILABLE));
    }

    let details_json = serde_json::to_string_pretty(fields)
        .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;
    context.insert("details_json", &details_json);
    context.insert(
        "submitted_at",
        &submitted_at.format(SUBMITTED_AT_FORMAT).to_string(),
    );

    Ok(())
}
