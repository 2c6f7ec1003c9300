//! # Intake Service 設定
//!
//! 環境変数から Intake Service サーバーの設定を読み込む。
//! 起動時に一度だけ読み込み、不正な値は [`ConfigError`] として起動を中断する。

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use intake_infra::notification::{SmtpSecurity, SmtpSettings};
use strum::{Display, EnumString};
use thiserror::Error;

/// 確認メールに載せる日程調整リンクのデフォルト
pub const DEFAULT_SCHEDULING_URL: &str = "https://calendly.com/moussamb1901/30min";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("環境変数 {name} の値が不正です: {value:?}（{reason}）")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}

/// Intake Service サーバーの設定
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// SQLite 接続 URL
    pub database_url: String,
    /// 静的ファイル（Web サイト）のディレクトリ
    pub static_dir:   PathBuf,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// SMTP サーバー経由で送信
    #[default]
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: SMTP サーバー経由で送信（デフォルト）
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:        NotificationBackend,
    /// SMTP 接続設定（backend=smtp の場合に使用）
    pub smtp:           SmtpSettings,
    /// 送信元メールアドレス
    pub from_address:   String,
    /// 新着依頼の通知先（管理者）
    pub admin_address:  String,
    /// 確認メールに載せる日程調整リンク
    pub scheduling_url: String,
    /// 1 通あたりの送信タイムアウト
    pub send_timeout:   Duration,
}

impl IntakeConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Ok(Self {
            host:         lookup("INTAKE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port:         parse_or(&lookup, "INTAKE_PORT", 5000)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://submissions.db".to_string()),
            static_dir:   lookup("STATIC_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
            notification: NotificationConfig::from_lookup(&lookup)?,
        })
    }
}

impl NotificationConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = parse_or(lookup, "NOTIFICATION_BACKEND", NotificationBackend::default())?;
        let send_timeout = Duration::from_secs(parse_or(lookup, "NOTIFICATION_TIMEOUT_SECS", 10)?);
        let username = lookup("SMTP_USERNAME");

        let from_address = lookup("NOTIFICATION_FROM_ADDRESS").or_else(|| username.clone());
        let admin_address = lookup("NOTIFICATION_ADMIN_ADDRESS").or_else(|| username.clone());

        // noop では実際に送らないため、宛先が無くても起動できる
        let (from_address, admin_address) = match backend {
            NotificationBackend::Smtp => (
                from_address.ok_or(ConfigError::Missing("NOTIFICATION_FROM_ADDRESS"))?,
                admin_address.ok_or(ConfigError::Missing("NOTIFICATION_ADMIN_ADDRESS"))?,
            ),
            NotificationBackend::Noop => (
                from_address.unwrap_or_else(|| "noreply@localhost".to_string()),
                admin_address.unwrap_or_else(|| "admin@localhost".to_string()),
            ),
        };

        Ok(Self {
            backend,
            smtp: SmtpSettings {
                host: lookup("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_or(lookup, "SMTP_PORT", 587)?,
                security: parse_or(lookup, "SMTP_TLS", SmtpSecurity::StartTls)?,
                username,
                password: lookup("SMTP_PASSWORD"),
                timeout: Some(send_timeout),
            },
            from_address,
            admin_address,
            scheduling_url: lookup("NOTIFICATION_SCHEDULING_URL")
                .unwrap_or_else(|| DEFAULT_SCHEDULING_URL.to_string()),
            send_timeout,
        })
    }
}

/// 環境変数をパースする。未設定ならデフォルト値を返す
fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
