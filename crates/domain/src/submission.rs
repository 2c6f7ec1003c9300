//! # Submission（サービス依頼）
//!
//! 顧客が Web フォームから送信した 1 件のサービス依頼。
//!
//! ## 設計方針
//!
//! - **作成のみ**: 受付時に 1 回だけ作成し、以後は更新・削除しない
//! - **検証しない**: 欠落項目は空文字列として扱い、メール形式や日付も検証しない
//! - **additional_data が正**: 送信された全項目を JSON で保持する。
//!   型付きカラム（name, email, ...）は検索用の射影にすぎない

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::service_type::ServiceType;

/// 型付きカラムに射影するフォーム項目名
pub const TYPED_FIELDS: [&str; 8] = [
    "name",
    "email",
    "description",
    "deadline",
    "urgency",
    "platform",
    "timeline",
    "budget",
];

/// 依頼 ID
///
/// `submissions.id`（SQLite の AUTOINCREMENT）。挿入時に採番され、単調増加する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(i64);

impl SubmissionId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 正規化済みのフォーム項目
///
/// キー順に並んだ `項目名 → 値` のマップ。`additional_data` にはこの内容が
/// そのまま JSON で保存される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionFields(BTreeMap<String, String>);

impl SubmissionFields {
    /// 送信されたフォームの (キー, 値) 列を正規化する
    ///
    /// - 同じキーが複数ある場合は最初の値を採用する
    /// - 連結項目に限り `ai-features[]` のような末尾の `[]` を取り除く。
    ///   それ以外のキーは送信されたまま保持する
    /// - サービス種別が連結項目を持つ場合、その項目の全値を `", "` で連結する。
    ///   値が 1 つもなくても空文字列としてキーを残す
    pub fn from_form<I, K, V>(service_type: ServiceType, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let joined_field = service_type.joined_field();
        let mut fields = BTreeMap::new();
        let mut joined_values = Vec::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.into();

            if joined_field.is_some_and(|field| is_joined_key(key, field)) {
                joined_values.push(value);
                continue;
            }

            fields.entry(key.to_string()).or_insert(value);
        }

        if let Some(field) = joined_field {
            fields.insert(field.to_string(), joined_values.join(", "));
        }

        Self(fields)
    }

    /// 項目の値。存在しなければ `None`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// 項目の値。存在しなければ空文字列
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubmissionFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// `field` または `field[]`
fn is_joined_key(key: &str, field: &str) -> bool {
    key.strip_suffix("[]").unwrap_or(key) == field
}

/// 永続化済みの依頼レコード
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id:              SubmissionId,
    /// サービス種別の表示ラベル
    pub service_type:    String,
    pub name:            String,
    pub email:           String,
    pub description:     String,
    pub deadline:        String,
    pub urgency:         String,
    pub platform:        String,
    pub timeline:        String,
    pub budget:          String,
    /// 送信された全項目
    pub additional_data: SubmissionFields,
    pub created_at:      DateTime<Utc>,
}
