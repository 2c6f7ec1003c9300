//! # フォーム抽出
//!
//! Web サイトのフォームは `FormData` で送られる（`multipart/form-data`）。
//! 手動の curl などでは `application/x-www-form-urlencoded` も使われるため、
//! どちらも送信順の `(キー, 値)` 列として取り出す。
//!
//! 項目の中身は検証しない。ただし本文そのものを読み切れない場合
//! （サイズ上限超過、壊れた multipart など）は一部だけを保存せず拒否する。
//!
//! | 状況 | 結果 |
//! |------|------|
//! | 本文なし / フォーム以外の Content-Type | 空のフォーム |
//! | 本文がサイズ上限を超える | 413 |
//! | 本文を解釈できない | 400 |

use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};

use crate::error::IntakeError;

/// 送信順のフォーム項目
///
/// 同じキーが複数回現れる場合もそのまま保持する（正規化はドメイン側の責務）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(pub Vec<(String, String)>);

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = IntakeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            return read_multipart(req, state).await.map(Self);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| unreadable_body(e.status(), e.body_text()))?;
            return Ok(Self(pairs));
        }

        tracing::debug!(content_type = %content_type, "フォーム以外の本文は空のフォームとして扱う");
        Ok(Self::default())
    }
}

/// multipart のテキスト項目を読み取る。ファイル項目は無視する
async fn read_multipart<S>(req: Request, state: &S) -> Result<Vec<(String, String)>, IntakeError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| unreadable_body(e.status(), e.body_text()))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| unreadable_body(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| unreadable_body(e.status(), e.body_text()))?;
        pairs.push((name, value));
    }

    Ok(pairs)
}

/// axum の拒否理由を依頼受付のエラーに変換する
fn unreadable_body(status: StatusCode, detail: String) -> IntakeError {
    tracing::warn!(status = %status, detail = %detail, "フォーム本文を読み取れませんでした");

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        IntakeError::PayloadTooLarge(detail)
    } else {
        IntakeError::BadRequest(detail)
    }
}
