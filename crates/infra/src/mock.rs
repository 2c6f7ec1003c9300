//! # テスト用モック
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! intake-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! どちらのモックも `Clone` で内部状態を共有する。テスト側でクローンを
//! 保持しておけば、ユースケースに渡した後も呼び出し履歴を検査できる。

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intake_domain::{
    ServiceType,
    Submission,
    SubmissionFields,
    SubmissionId,
    notification::{EmailMessage, NotificationError},
};

use crate::{error::InfraError, notification::NotificationSender, repository::SubmissionRepository};

// ===== MockSubmissionRepository =====

#[derive(Default)]
struct RepositoryState {
    submissions: Vec<Submission>,
    fail_on_save: bool,
    save_calls: usize,
}

/// インメモリの SubmissionRepository
///
/// `failing()` で作成すると `save` が常に失敗する（行は作成されない）。
#[derive(Clone)]
pub struct MockSubmissionRepository {
    state: Arc<Mutex<RepositoryState>>,
    now:   DateTime<Utc>,
}

impl MockSubmissionRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            now:   Utc::now(),
        }
    }

    /// `save` が常にデータベースエラーを返すリポジトリ
    pub fn failing() -> Self {
        let repo = Self::new();
        repo.lock().fail_on_save = true;
        repo
    }

    /// 保存済みの依頼（挿入順）
    pub fn submissions(&self) -> Vec<Submission> {
        self.lock().submissions.clone()
    }

    /// `save` が呼ばれた回数（失敗した呼び出しを含む）
    pub fn save_calls(&self) -> usize {
        self.lock().save_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RepositoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockSubmissionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionRepository for MockSubmissionRepository {
    async fn save(
        &self,
        service_type: ServiceType,
        fields: &SubmissionFields,
    ) -> Result<SubmissionId, InfraError> {
        let mut state = self.lock();
        state.save_calls += 1;

        if state.fail_on_save {
            return Err(sqlx::Error::PoolTimedOut.into());
        }

        let id = SubmissionId::new(state.submissions.len() as i64 + 1);
        state.submissions.push(Submission {
            id,
            service_type: service_type.label().to_string(),
            name: fields.get_or_empty("name").to_string(),
            email: fields.get_or_empty("email").to_string(),
            description: fields.get_or_empty("description").to_string(),
            deadline: fields.get_or_empty("deadline").to_string(),
            urgency: fields.get_or_empty("urgency").to_string(),
            platform: fields.get_or_empty("platform").to_string(),
            timeline: fields.get_or_empty("timeline").to_string(),
            budget: fields.get_or_empty("budget").to_string(),
            additional_data: fields.clone(),
            created_at: self.now,
        });

        Ok(id)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, InfraError> {
        // 作成時刻はすべて同じなので id 降順 = 新しい順
        Ok(self
            .lock()
            .submissions
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ===== MockNotificationSender =====

#[derive(Default)]
struct SenderState {
    sent:     Vec<EmailMessage>,
    attempts: usize,
}

/// 送信内容を記録する NotificationSender
///
/// - `new()`: 常に成功し、送信したメールを記録する
/// - `failing()`: 常に `SendFailed` を返す（試行回数のみ記録）
/// - `slow(delay)`: `delay` 待ってから成功する（タイムアウト検証用）
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    state: Arc<Mutex<SenderState>>,
    fail:  bool,
    delay: Option<Duration>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.lock().sent.clone()
    }

    /// `send_email` が呼ばれた回数（失敗を含む）
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SenderState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.lock().attempts += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(NotificationError::SendFailed(
                "モック: SMTP サーバーに接続できません".to_string(),
            ));
        }

        self.lock().sent.push(email.clone());
        Ok(())
    }
}
