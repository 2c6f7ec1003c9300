//! # 通知サービス
//!
//! テンプレートレンダリング → メール送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **best-effort**: 送信に失敗してもエラーを返さない。結果は
//!   [`DeliveryStatus`] で返し、失敗はログに残す
//! - **タイムアウト**: 1 通ごとに `tokio::time::timeout` で上限を設ける。
//!   SMTP サーバーが応答しなくても依頼の応答は遅れ続けない
//! - **依存性注入**: `NotificationSender` と `Clock` は trait で抽象化

use std::{sync::Arc, time::Duration};

use intake_domain::{
    ServiceType,
    SubmissionFields,
    clock::Clock,
    notification::{DeliveryStatus, NotificationError, SubmissionNotification},
};
use intake_infra::notification::NotificationSender;

use super::TemplateRenderer;

/// 宛先アドレスと日程調整リンク
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// 新着依頼の通知先
    pub admin_address:  String,
    /// 確認メールに載せる日程調整リンク
    pub scheduling_url: String,
    /// 1 通あたりの送信タイムアウト
    pub send_timeout:   Duration,
}

/// 通知サービス
///
/// 依頼受付に伴う 2 通のメール（管理者向け・顧客向け）を送る。
pub struct NotificationService {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
    clock:             Arc<dyn Clock>,
    settings:          NotificationSettings,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        clock: Arc<dyn Clock>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            clock,
            settings,
        }
    }

    /// 管理者に新着依頼を通知する
    ///
    /// 本文には全項目の JSON ダンプと受付日時を含める。
    #[tracing::instrument(skip_all, fields(service_type = %service_type))]
    pub async fn notify_admin(
        &self,
        service_type: ServiceType,
        fields: &SubmissionFields,
    ) -> DeliveryStatus {
        self.deliver(SubmissionNotification::AdminAlert {
            admin_email: self.settings.admin_address.clone(),
            service_type,
            fields: fields.clone(),
            submitted_at: self.clock.now(),
        })
        .await
    }

    /// 依頼者に受付確認を送る
    #[tracing::instrument(skip_all, fields(service_type = %service_type))]
    pub async fn notify_customer(
        &self,
        email: &str,
        name: &str,
        service_type: ServiceType,
    ) -> DeliveryStatus {
        self.deliver(SubmissionNotification::CustomerConfirmation {
            customer_email: email.to_string(),
            customer_name: name.to_string(),
            service_type,
            scheduling_url: self.settings.scheduling_url.clone(),
        })
        .await
    }

    /// レンダリングして送信する。失敗はログに残して `Failed` を返す
    async fn deliver(&self, notification: SubmissionNotification) -> DeliveryStatus {
        let kind = notification.kind();
        let recipient = notification.recipient_email().to_string();

        match self.render_and_send(&notification).await {
            Ok(()) => {
                tracing::info!(
                    notification.kind = kind,
                    notification.recipient = %recipient,
                    "通知メール送信成功"
                );
                DeliveryStatus::Sent
            }
            Err(e) => {
                tracing::warn!(
                    notification.kind = kind,
                    notification.recipient = %recipient,
                    error = %e,
                    "通知メール送信失敗"
                );
                DeliveryStatus::Failed
            }
        }
    }

    async fn render_and_send(
        &self,
        notification: &SubmissionNotification,
    ) -> Result<(), NotificationError> {
        // フォームに email が無い依頼は確認メールを送らない
        if notification.recipient_email().trim().is_empty() {
            return Err(NotificationError::InvalidAddress("宛先が空です".to_string()));
        }

        let email = self.template_renderer.render(notification)?;
        let timeout = self.settings.send_timeout;

        tokio::time::timeout(timeout, self.sender.send_email(&email))
            .await
            .map_err(|_| NotificationError::Timeout(timeout.as_secs()))?
    }
}

#[cfg(test)]
mod tests {
    use intake_domain::clock::FixedClock;
    use intake_infra::mock::MockNotificationSender;
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_service(sender: MockNotificationSender, send_timeout: Duration) -> NotificationService {
        NotificationService::new(
            Arc::new(sender),
            TemplateRenderer::new().unwrap(),
            Arc::new(FixedClock::from_timestamp(1_735_732_800)),
            NotificationSettings {
                admin_address: "owner@example.com".to_string(),
                scheduling_url: "https://calendly.com/moussamb1901/30min".to_string(),
                send_timeout,
            },
        )
    }

    fn fields() -> SubmissionFields {
        [("name", "Jo"), ("email", "jo@x.com")].into_iter().collect()
    }

    #[tokio::test]
    async fn notify_adminは管理者宛てに送信しsentを返す() {
        let sender = MockNotificationSender::new();
        let service = make_service(sender.clone(), Duration::from_secs(10));

        let status = service.notify_admin(ServiceType::SimpleApi, &fields()).await;

        assert_eq!(status, DeliveryStatus::Sent);
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(
            sent[0].subject,
            "New Simple API Integration Submission - Byts of Everything"
        );
        assert!(sent[0].text_body.contains("Submitted at: 2025-01-01 12:00:00"));
    }

    #[tokio::test]
    async fn notify_customerは依頼者宛てに送信する() {
        let sender = MockNotificationSender::new();
        let service = make_service(sender.clone(), Duration::from_secs(10));

        let status = service
            .notify_customer("jo@x.com", "Jo", ServiceType::AiIntegration)
            .await;

        assert_eq!(status, DeliveryStatus::Sent);
        let sent = sender.sent_emails();
        assert_eq!(sent[0].to, "jo@x.com");
        assert_eq!(sent[0].subject, "Thank you for contacting Byts of Everything");
        assert!(sent[0].text_body.contains("AI Integration Wizard services"));
    }

    #[tokio::test]
    async fn 送信失敗してもエラーを返さずfailedを返す() {
        let sender = MockNotificationSender::failing();
        let service = make_service(sender.clone(), Duration::from_secs(10));

        let status = service.notify_admin(ServiceType::SimpleApi, &fields()).await;

        assert_eq!(status, DeliveryStatus::Failed);
        assert_eq!(sender.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn タイムアウトを超えた送信はfailedになる() {
        let sender = MockNotificationSender::slow(Duration::from_secs(30));
        let service = make_service(sender.clone(), Duration::from_secs(10));

        let status = service
            .notify_customer("jo@x.com", "Jo", ServiceType::SimpleApi)
            .await;

        assert_eq!(status, DeliveryStatus::Failed);
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn タイムアウト内に終わる送信はsentになる() {
        let sender = MockNotificationSender::slow(Duration::from_secs(3));
        let service = make_service(sender.clone(), Duration::from_secs(10));

        let status = service
            .notify_customer("jo@x.com", "Jo", ServiceType::SimpleApi)
            .await;

        assert_eq!(status, DeliveryStatus::Sent);
    }
}
