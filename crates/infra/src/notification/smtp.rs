//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//!
//! - 本番: STARTTLS + 認証（例: `smtp.gmail.com:587`）
//! - 開発: TLS なし（Mailpit などのローカル SMTP サーバー）

use std::{fmt, str::FromStr, time::Duration};

use async_trait::async_trait;
use intake_domain::notification::{EmailMessage, NotificationError};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::NotificationSender;

/// SMTP 接続のセキュリティ方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// 平文で接続し STARTTLS で昇格する（ポート 587）
    #[default]
    StartTls,
    /// TLS なし（ローカル開発用）
    None,
}

impl FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starttls" => Ok(Self::StartTls),
            "none" => Ok(Self::None),
            other => Err(format!("不明な SMTP セキュリティ方式: {other}")),
        }
    }
}

/// SMTP 接続設定
#[derive(Clone)]
pub struct SmtpSettings {
    pub host:     String,
    pub port:     u16,
    pub security: SmtpSecurity,
    pub username: Option<String>,
    pub password: Option<String>,
    /// SMTP コマンド単位のタイムアウト
    pub timeout:  Option<Duration>,
}

// パスワードをログに出さない
impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `settings`: 接続先・認証情報
    /// - `from_address`: 送信元メールアドレス
    ///
    /// 送信元アドレスが不正な場合や TLS 設定の構築に失敗した場合はエラーを返す。
    /// この時点では SMTP サーバーに接続しない。
    pub fn new(settings: SmtpSettings, from_address: &str) -> Result<Self, NotificationError> {
        let from_address = from_address
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress(format!("送信元 {from_address}: {e}")))?;

        let builder = match settings.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host).map_err(
                    |e| NotificationError::SendFailed(format!("SMTP トランスポート構築失敗: {e}")),
                )?
            }
            // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
        };

        let mut builder = builder.port(settings.port).timeout(settings.timeout);
        if let (Some(username), Some(password)) = (settings.username, settings.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from_address,
        })
    }
}

/// `EmailMessage` を lettre のメッセージ（text + html の multipart/alternative）に変換する
fn build_message(from: &Mailbox, email: &EmailMessage) -> Result<Message, NotificationError> {
    let to = email
        .to
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::InvalidAddress(format!("宛先 {:?}: {e}", email.to)))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(&email.subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(email.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email.html_body.clone()),
                ),
        )
        .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(&self.from_address, email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
