//! # Intake Service サーバー
//!
//! Byts of Everything の Web サイトから送られるサービス依頼を受け付ける。
//!
//! ## 役割
//!
//! - **依頼受付**: 20 種類のサービスフォームの送信を 1 件ずつ SQLite に保存
//! - **メール通知**: 管理者への新着通知と依頼者への受付確認（best-effort）
//! - **静的配信**: Web サイト本体（HTML / CSS / JS）を配信
//!
//! ```text
//! ┌──────────┐  POST /submit-*   ┌────────────────┐     ┌──────────┐
//! │ Browser  │──────────────────▶│ Intake Service │────▶│  SQLite  │
//! └──────────┘                   └────────────────┘     └──────────┘
//!                                        │
//!                                        ▼
//!                                  ┌──────────┐
//!                                  │   SMTP   │
//!                                  └──────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `INTAKE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `INTAKE_PORT` | No | ポート番号（デフォルト: `5000`） |
//! | `DATABASE_URL` | No | SQLite 接続 URL（デフォルト: `sqlite://submissions.db`） |
//! | `STATIC_DIR` | No | Web サイトのディレクトリ（デフォルト: `.`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `noop`（デフォルト: `smtp`） |
//! | `SMTP_USERNAME` | smtp 時 | SMTP ユーザー（送信元・管理者宛先のデフォルト） |
//! | `SMTP_PASSWORD` | smtp 時 | SMTP パスワード |
//!
//! その他の項目は [`intake_service::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（メールは送らずログ出力のみ）
//! NOTIFICATION_BACKEND=noop cargo run -p intake-service
//!
//! # 本番環境
//! SMTP_USERNAME=... SMTP_PASSWORD=... LOG_FORMAT=json cargo run -p intake-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use intake_domain::clock::{Clock, SystemClock};
use intake_infra::{
    db,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::{SqliteSubmissionRepository, SubmissionRepository},
};
use intake_service::{
    app_builder::build_app,
    config::{IntakeConfig, NotificationBackend, NotificationConfig},
    handler::{ReadinessState, SubmissionState},
    usecase::{NotificationService, NotificationSettings, SubmissionUseCaseImpl, TemplateRenderer},
};
use intake_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

const SERVICE_NAME: &str = "intake-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env(SERVICE_NAME));

    let config = IntakeConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Intake Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("データベースに接続しました");

    // 依存コンポーネントを初期化
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository: Arc<dyn SubmissionRepository> =
        Arc::new(SqliteSubmissionRepository::new(pool.clone(), clock.clone()));
    let notification = Arc::new(NotificationService::new(
        build_sender(&config.notification)?,
        TemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?,
        clock,
        NotificationSettings {
            admin_address:  config.notification.admin_address.clone(),
            scheduling_url: config.notification.scheduling_url.clone(),
            send_timeout:   config.notification.send_timeout,
        },
    ));

    let submission_state = Arc::new(SubmissionState {
        usecase: SubmissionUseCaseImpl::new(repository, notification),
    });
    let readiness_state = Arc::new(ReadinessState { pool });

    let app = build_app(submission_state, readiness_state, &config.static_dir);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("バインドアドレスが不正です: {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Intake Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Intake Service サーバーを停止しました");
    Ok(())
}

/// `NOTIFICATION_BACKEND` に応じた送信実装を作る
fn build_sender(config: &NotificationConfig) -> anyhow::Result<Arc<dyn NotificationSender>> {
    let sender: Arc<dyn NotificationSender> = match config.backend {
        NotificationBackend::Smtp => {
            tracing::info!(
                smtp = ?config.smtp,
                from = %config.from_address,
                "SMTP でメールを送信します"
            );
            Arc::new(
                SmtpNotificationSender::new(config.smtp.clone(), &config.from_address)
                    .context("SMTP 送信の初期化に失敗しました")?,
            )
        }
        NotificationBackend::Noop => {
            tracing::warn!("NOTIFICATION_BACKEND=noop: メールは送信されません");
            Arc::new(NoopNotificationSender)
        }
    };

    Ok(sender)
}

/// Ctrl-C / SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT を受信しました。シャットダウンを開始します"),
        () = terminate => tracing::info!("SIGTERM を受信しました。シャットダウンを開始します"),
    }
}
