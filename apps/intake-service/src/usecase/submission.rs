//! サービス依頼受付ユースケース
//!
//! 1 件の依頼を 正規化 → 永続化 → 通知 の順に処理する。
//! 永続化に失敗した場合は通知を行わない。通知の失敗は受付結果に影響しない。

use std::sync::Arc;

use intake_domain::{
    ServiceType,
    Submission,
    SubmissionFields,
    SubmissionId,
    notification::DeliveryStatus,
};
use intake_infra::repository::SubmissionRepository;

use super::notification::NotificationService;
use crate::error::IntakeError;

/// 永続化失敗時に依頼者へ返す文言
///
/// ストレージのエラー内容はレスポンスに含めず、常にこの固定文言を返す。
/// エラー内容と SpanTrace はログにのみ出力する。
pub const PERSIST_FAILED_MESSAGE: &str =
    "An error occurred while saving your submission. Please try again later.";

/// 受付成功時に依頼者へ返す文言
pub const ACCEPTED_MESSAGE: &str =
    "Thank you! Your submission has been received. We will contact you shortly.";

/// 依頼受付の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 保存に成功した（通知の成否は問わない）
    Accepted {
        submission_id: SubmissionId,
        admin:         DeliveryStatus,
        customer:      DeliveryStatus,
    },
    /// 保存に失敗した
    Failed { message: String },
}

/// サービス依頼受付ユースケース
pub struct SubmissionUseCaseImpl {
    repository:   Arc<dyn SubmissionRepository>,
    notification: Arc<NotificationService>,
}

impl SubmissionUseCaseImpl {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        notification: Arc<NotificationService>,
    ) -> Self {
        Self {
            repository,
            notification,
        }
    }

    /// 依頼を受け付ける
    ///
    /// 1. フォーム項目を正規化（重複キーは先勝ち、連結項目は `", "` で連結）
    /// 2. 1 行として保存
    /// 3. 管理者通知 → 確認メールの順に送信（best-effort）
    ///
    /// 冪等ではない。同じ内容を 2 回送ると 2 行保存され、メールも 2 回送られる。
    #[tracing::instrument(skip_all, fields(service_type = %service_type))]
    pub async fn submit(
        &self,
        service_type: ServiceType,
        raw_fields: Vec<(String, String)>,
    ) -> SubmissionOutcome {
        let fields = SubmissionFields::from_form(service_type, raw_fields);

        let submission_id = match self.repository.save(service_type, &fields).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    "依頼の保存に失敗"
                );
                return SubmissionOutcome::Failed {
                    message: PERSIST_FAILED_MESSAGE.to_string(),
                };
            }
        };

        let admin = self.notification.notify_admin(service_type, &fields).await;
        let customer = self
            .notification
            .notify_customer(
                fields.get_or_empty("email"),
                fields.get_or_empty("name"),
                service_type,
            )
            .await;

        tracing::info!(
            submission_id = %submission_id,
            admin = %admin,
            customer = %customer,
            "依頼を受け付けました"
        );

        SubmissionOutcome::Accepted {
            submission_id,
            admin,
            customer,
        }
    }

    /// 新しい順に最大 `limit` 件の依頼を取得する
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, IntakeError> {
        Ok(self.repository.list_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use intake_domain::clock::FixedClock;
    use intake_infra::mock::{MockNotificationSender, MockSubmissionRepository};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::usecase::notification::{NotificationSettings, TemplateRenderer};

    fn make_usecase(
        repository: MockSubmissionRepository,
        sender: MockNotificationSender,
    ) -> SubmissionUseCaseImpl {
        let notification = NotificationService::new(
            Arc::new(sender),
            TemplateRenderer::new().unwrap(),
            Arc::new(FixedClock::from_timestamp(0)),
            NotificationSettings {
                admin_address:  "owner@example.com".to_string(),
                scheduling_url: "https://calendly.com/moussamb1901/30min".to_string(),
                send_timeout:   Duration::from_secs(10),
            },
        );
        SubmissionUseCaseImpl::new(Arc::new(repository), Arc::new(notification))
    }

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_保存に成功すると2通送信してacceptedを返す() {
        let repository = MockSubmissionRepository::new();
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(repository.clone(), sender.clone());

        let outcome = usecase
            .submit(
                ServiceType::SimpleApi,
                raw(&[("name", "Jo"), ("email", "jo@x.com"), ("description", "Sync CRM")]),
            )
            .await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                submission_id: SubmissionId::new(1),
                admin:         DeliveryStatus::Sent,
                customer:      DeliveryStatus::Sent,
            }
        );
        let saved = repository.submissions();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].service_type, "Simple API Integration");
        assert_eq!(saved[0].name, "Jo");

        let sent = sender.sent_emails();
        let recipients: Vec<_> = sent.iter().map(|e| e.to.as_str()).collect();
        assert_eq!(recipients, vec!["owner@example.com", "jo@x.com"]);
    }

    #[tokio::test]
    async fn test_保存に失敗したら通知せずfailedを返す() {
        let repository = MockSubmissionRepository::failing();
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(repository.clone(), sender.clone());

        let outcome = usecase
            .submit(ServiceType::SimpleApi, raw(&[("name", "Jo")]))
            .await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Failed {
                message: PERSIST_FAILED_MESSAGE.to_string(),
            }
        );
        assert_eq!(repository.save_calls(), 1);
        assert_eq!(sender.attempts(), 0);
    }

    #[tokio::test]
    async fn test_通知に失敗しても受付は成功する() {
        let repository = MockSubmissionRepository::new();
        let sender = MockNotificationSender::failing();
        let usecase = make_usecase(repository.clone(), sender.clone());

        let outcome = usecase
            .submit(ServiceType::CodeRescue, raw(&[("email", "jo@x.com")]))
            .await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                submission_id: SubmissionId::new(1),
                admin:         DeliveryStatus::Failed,
                customer:      DeliveryStatus::Failed,
            }
        );
        assert_eq!(sender.attempts(), 2);
        assert_eq!(repository.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_メールアドレスがない場合は確認メールのみ失敗する() {
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(MockSubmissionRepository::new(), sender.clone());

        let outcome = usecase
            .submit(ServiceType::MvpLaunch, raw(&[("name", "Jo")]))
            .await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::Accepted {
                admin: DeliveryStatus::Sent,
                customer: DeliveryStatus::Failed,
                ..
            }
        ));
        assert_eq!(sender.sent_emails().len(), 1);
    }

    #[tokio::test]
    async fn test_連結項目は正規化されて保存される() {
        let repository = MockSubmissionRepository::new();
        let usecase = make_usecase(repository.clone(), MockNotificationSender::new());

        usecase
            .submit(
                ServiceType::DevopsTransformation,
                raw(&[
                    ("pain-points[]", "Slow deploys"),
                    ("pain-points[]", "No monitoring"),
                    ("name", "Jo"),
                    ("name", "Ignored"),
                ]),
            )
            .await;

        let saved = repository.submissions().remove(0);
        assert_eq!(
            saved.additional_data.get("pain-points"),
            Some("Slow deploys, No monitoring")
        );
        assert_eq!(saved.name, "Jo");
    }

    #[tokio::test]
    async fn test_同じ内容を2回送ると2件保存される() {
        let repository = MockSubmissionRepository::new();
        let sender = MockNotificationSender::new();
        let usecase = make_usecase(repository.clone(), sender.clone());
        let input = raw(&[("name", "Jo"), ("email", "jo@x.com")]);

        usecase.submit(ServiceType::SimpleApi, input.clone()).await;
        usecase.submit(ServiceType::SimpleApi, input).await;

        assert_eq!(repository.submissions().len(), 2);
        assert_eq!(sender.sent_emails().len(), 4);
    }

    #[tokio::test]
    async fn test_list_recentは新しい順に返す() {
        let repository = MockSubmissionRepository::new();
        let usecase = make_usecase(repository, MockNotificationSender::new());
        for name in ["first", "second", "third"] {
            usecase
                .submit(ServiceType::SimpleApi, raw(&[("name", name)]))
                .await;
        }

        let listed = usecase.list_recent(2).await.unwrap();

        let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second"]);
    }
}
