//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲

pub mod admin;
pub mod form;
pub mod health;
pub mod submission;

pub use admin::{ADMIN_LIST_LIMIT, list_submissions};
pub use form::FormFields;
pub use health::{ReadinessState, health_check, readiness_check};
pub use submission::{SubmissionState, submit_service_request};
