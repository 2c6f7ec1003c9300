//! # サービス種別カタログ
//!
//! Web サイトで受け付けるサービスの固定カタログ。
//!
//! | 列 | 用途 |
//! |----|------|
//! | slug | ルート `POST /submit-{slug}` の末尾（kebab-case） |
//! | label | `submissions.service_type` に保存する表示名 |
//! | joined field | チェックボックスの複数値を `", "` で連結する項目 |
//!
//! ルートごとにハンドラを書くのではなく、slug からこの enum を引いて
//! 単一のハンドラで処理する。

use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// 提供サービスの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ServiceType {
    // API 連携
    SimpleApi,
    ModerateApi,
    ComplexApi,
    EnterpriseApi,
    // ユニットテスト
    BasicUnitTesting,
    IntermediateUnitTesting,
    AdvancedUnitTesting,
    EnterpriseUnitTesting,
    // 結合テスト
    BasicIntegrationTesting,
    IntermediateIntegrationTesting,
    AdvancedIntegrationTesting,
    EnterpriseIntegrationTesting,
    // ソフトウェアテスト
    BasicSoftwareTesting,
    IntermediateSoftwareTesting,
    AdvancedSoftwareTesting,
    EnterpriseSoftwareTesting,
    // カスタムサービス
    CodeRescue,
    MvpLaunch,
    AiIntegration,
    DevopsTransformation,
}

impl ServiceType {
    /// ルート slug から種別を引く。カタログにない slug は `None`。
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::from_str(slug).ok()
    }

    /// ルート slug（例: `"simple-api"`）
    pub fn slug(self) -> &'static str {
        self.into()
    }

    /// 保存・メール件名に使う表示ラベル
    pub fn label(self) -> &'static str {
        match self {
            Self::SimpleApi => "Simple API Integration",
            Self::ModerateApi => "Moderate API Integration",
            Self::ComplexApi => "Complex API Integration",
            Self::EnterpriseApi => "Enterprise API Integration",
            Self::BasicUnitTesting => "Basic Unit Testing",
            Self::IntermediateUnitTesting => "Intermediate Unit Testing",
            Self::AdvancedUnitTesting => "Advanced Unit Testing",
            Self::EnterpriseUnitTesting => "Enterprise Unit Testing",
            Self::BasicIntegrationTesting => "Basic Integration Testing",
            Self::IntermediateIntegrationTesting => "Intermediate Integration Testing",
            Self::AdvancedIntegrationTesting => "Advanced Integration Testing",
            Self::EnterpriseIntegrationTesting => "Enterprise Integration Testing",
            Self::BasicSoftwareTesting => "Basic Software Testing",
            Self::IntermediateSoftwareTesting => "Intermediate Software Testing",
            Self::AdvancedSoftwareTesting => "Advanced Software Testing",
            Self::EnterpriseSoftwareTesting => "Enterprise Software Testing",
            Self::CodeRescue => "Code Rescue Mission",
            Self::MvpLaunch => "MVP Launch Pad",
            Self::AiIntegration => "AI Integration Wizard",
            Self::DevopsTransformation => "DevOps Transformation",
        }
    }

    /// 複数値を連結するチェックボックス項目名
    pub fn joined_field(self) -> Option<&'static str> {
        match self {
            Self::AiIntegration => Some("ai-features"),
            Self::DevopsTransformation => Some("pain-points"),
            _ => None,
        }
    }

    /// カタログ全件（宣言順）
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("simple-api", ServiceType::SimpleApi, "Simple API Integration")]
    #[case("enterprise-unit-testing", ServiceType::EnterpriseUnitTesting, "Enterprise Unit Testing")]
    #[case(
        "intermediate-integration-testing",
        ServiceType::IntermediateIntegrationTesting,
        "Intermediate Integration Testing"
    )]
    #[case("code-rescue", ServiceType::CodeRescue, "Code Rescue Mission")]
    #[case("mvp-launch", ServiceType::MvpLaunch, "MVP Launch Pad")]
    #[case("ai-integration", ServiceType::AiIntegration, "AI Integration Wizard")]
    #[case("devops-transformation", ServiceType::DevopsTransformation, "DevOps Transformation")]
    fn test_slugから種別とラベルを引ける(
        #[case] slug: &str,
        #[case] expected: ServiceType,
        #[case] label: &str,
    ) {
        let service_type = ServiceType::from_slug(slug).unwrap();

        assert_eq!(service_type, expected);
        assert_eq!(service_type.label(), label);
        assert_eq!(service_type.slug(), slug);
    }

    #[rstest]
    #[case("")]
    #[case("unknown")]
    #[case("Simple-Api")]
    #[case("submit-simple-api")]
    fn test_カタログにないslugはnoneになる(#[case] slug: &str) {
        assert_eq!(ServiceType::from_slug(slug), None);
    }

    #[test]
    fn test_全種別のslugが往復変換できる() {
        for service_type in ServiceType::all() {
            assert_eq!(ServiceType::from_slug(service_type.slug()), Some(service_type));
        }
    }

    #[test]
    fn test_カタログは20件でslugとラベルが重複しない() {
        let slugs: HashSet<_> = ServiceType::all().map(ServiceType::slug).collect();
        let labels: HashSet<_> = ServiceType::all().map(ServiceType::label).collect();

        assert_eq!(ServiceType::all().count(), 20);
        assert_eq!(slugs.len(), 20);
        assert_eq!(labels.len(), 20);
    }

    #[test]
    fn test_連結項目を持つのはaiとdevopsのみ() {
        let joined: Vec<_> = ServiceType::all()
            .filter_map(|s| s.joined_field().map(|field| (s, field)))
            .collect();

        assert_eq!(
            joined,
            vec![
                (ServiceType::AiIntegration, "ai-features"),
                (ServiceType::DevopsTransformation, "pain-points"),
            ]
        );
    }

    #[test]
    fn test_displayは表示ラベルを出力する() {
        assert_eq!(ServiceType::MvpLaunch.to_string(), "MVP Launch Pad");
    }
}
