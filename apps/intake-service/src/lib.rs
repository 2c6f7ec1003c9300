//! # Intake Service ライブラリ
//!
//! Web フォームからのサービス依頼を受け付けるサーバーのコアモジュール。
//! 統合テストからルーターを組み立てられるよう、各モジュールを公開する。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラー定義と HTTP レスポンス変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: 依頼受付パイプラインとメール通知

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
