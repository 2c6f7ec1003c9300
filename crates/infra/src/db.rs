//! # SQLite データベース接続管理
//!
//! 接続プールの作成とマイグレーションの適用を行う。
//!
//! ## 設計方針
//!
//! - **接続プール**: 起動時に一度だけ作成し、アプリケーション全体で共有する
//! - **書き込みの直列化**: SQLite は同時に 1 つの書き込みトランザクションしか
//!   許さない。各 INSERT は単独の文として原子的に実行され、競合する書き込みは
//!   `busy_timeout` の範囲で待たされる
//! - **WAL モード**: 管理画面の読み取りが書き込みをブロックしない
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use intake_infra::db;
//!
//! async fn example() -> Result<(), intake_infra::InfraError> {
//!     let pool = db::create_pool("sqlite://submissions.db").await?;
//!     db::run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::error::InfraError;

/// SQLite 接続プールを作成する
///
/// # 引数
///
/// * `database_url` - SQLite 接続 URL
///   - ファイル: `sqlite://submissions.db`（存在しなければ作成する）
///   - インメモリ: `sqlite::memory:`
///
/// # 設定値
///
/// - `max_connections(5)`: 書き込みは直列化されるため多くは要らない
/// - `busy_timeout(5秒)`: 書き込みロック待ちの上限
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, InfraError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// インメモリ DB の接続プールを作成する
///
/// インメモリ DB は接続ごとに別の DB になるため、接続数を 1 に固定し、
/// アイドル切断もしない。テストやお試し起動で使う。
pub async fn create_in_memory_pool() -> Result<SqlitePool, InfraError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` で埋め込んだマイグレーションを順番に適用する。
/// 適用済みのものはスキップされる。
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), InfraError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// 接続確認（`SELECT 1`）
pub async fn ping(pool: &SqlitePool) -> Result<(), InfraError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
