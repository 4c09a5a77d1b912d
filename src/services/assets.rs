//! Packaged Mollie Components assets and script placeholder substitution.

use crate::errors::ServiceError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::instrument;

pub const PROFILE_ID_PLACEHOLDER: &str = "[mollie_profile_id]";
pub const SHOP_URL_PLACEHOLDER: &str = "[shop_url]";
pub const LOCALE_PLACEHOLDER: &str = "[mollie_locale]";
pub const TEST_MODE_PLACEHOLDER: &str = "[mollie_testmode]";

pub const PLACEHOLDERS: [&str; 4] = [
    PROFILE_ID_PLACEHOLDER,
    SHOP_URL_PLACEHOLDER,
    LOCALE_PLACEHOLDER,
    TEST_MODE_PLACEHOLDER,
];

/// Component asset families served by the storefront routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    CreditCard,
}

impl AssetKind {
    /// Parses the `type` route segment. Matching is exact.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "creditcard" => Some(Self::CreditCard),
            _ => None,
        }
    }

    pub fn script_path(self) -> &'static str {
        match self {
            Self::CreditCard => "js/components.creditcard.js",
        }
    }

    pub fn stylesheet_path(self) -> &'static str {
        match self {
            Self::CreditCard => "css/components.creditcard.css",
        }
    }
}

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Reads an asset by its path relative to the asset root.
    async fn read(&self, relative_path: &str) -> Result<String, ServiceError>;
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    #[instrument(skip(self))]
    async fn read(&self, relative_path: &str) -> Result<String, ServiceError> {
        let path = self.root.join(relative_path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => {
                    ServiceError::AssetError(format!("asset {} is missing", path.display()))
                }
                _ => ServiceError::AssetError(format!("failed to read {}: {}", path.display(), err)),
            })
    }
}

/// Values substituted into the components script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptVariables<'a> {
    pub profile_id: &'a str,
    pub shop_url: &'a str,
    pub locale: &'a str,
    pub test_mode: bool,
}

/// Replaces every placeholder occurrence in `template` in a single scan, so
/// inserted values are never searched for placeholders themselves.
pub fn render_script(template: &str, vars: &ScriptVariables<'_>) -> String {
    let test_mode = if vars.test_mode { "true" } else { "false" };
    let substitutions = [
        (PROFILE_ID_PLACEHOLDER, vars.profile_id),
        (SHOP_URL_PLACEHOLDER, vars.shop_url),
        (LOCALE_PLACEHOLDER, vars.locale),
        (TEST_MODE_PLACEHOLDER, test_mode),
    ];

    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('[') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match substitutions
            .iter()
            .find(|(token, _)| candidate.starts_with(token))
        {
            Some((token, value)) => {
                output.push_str(value);
                rest = &candidate[token.len()..];
            }
            None => {
                output.push('[');
                rest = &candidate[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TEMPLATE: &str = "var mollie = Mollie('[mollie_profile_id]', { locale: '[mollie_locale]', testmode: [mollie_testmode] });\n\
                            fetch('[shop_url]/mollie/components/store-card-token/' + id);\n\
                            console.log('[mollie_profile_id]');";

    fn vars(test_mode: bool) -> ScriptVariables<'static> {
        ScriptVariables {
            profile_id: "pfl_QkEhN94Ba",
            shop_url: "https://shop.example.com",
            locale: "nl_NL",
            test_mode,
        }
    }

    #[test]
    fn render_replaces_every_placeholder() {
        let script = render_script(TEMPLATE, &vars(true));

        for token in PLACEHOLDERS {
            assert!(!script.contains(token), "{token} left in output");
        }
        assert_eq!(script.matches("pfl_QkEhN94Ba").count(), 2);
        assert!(script.contains("testmode: true"));
        assert!(script.contains("fetch('https://shop.example.com/mollie/"));
    }

    #[test]
    fn render_writes_false_outside_test_mode() {
        let script = render_script(TEMPLATE, &vars(false));
        assert!(script.contains("testmode: false"));
    }

    #[test]
    fn render_accepts_empty_profile_id() {
        let script = render_script(
            TEMPLATE,
            &ScriptVariables {
                profile_id: "",
                ..vars(true)
            },
        );
        assert!(script.starts_with("var mollie = Mollie('',"));
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let script = render_script(
            TEMPLATE,
            &ScriptVariables {
                shop_url: "https://shop.example.com/[mollie_locale]",
                ..vars(true)
            },
        );

        assert!(script.contains("fetch('https://shop.example.com/[mollie_locale]/mollie/"));
        assert!(script.contains("locale: 'nl_NL'"));
    }

    #[test]
    fn other_brackets_are_kept() {
        let script = render_script("fields[0] = '[mollie_locale]'; [unknown]", &vars(true));
        assert_eq!(script, "fields[0] = 'nl_NL'; [unknown]");
    }

    #[test]
    fn only_creditcard_is_a_known_kind() {
        assert_eq!(
            AssetKind::from_path_segment("creditcard"),
            Some(AssetKind::CreditCard)
        );
        assert_eq!(AssetKind::from_path_segment("CreditCard"), None);
        assert_eq!(AssetKind::from_path_segment("ideal"), None);
        assert_eq!(AssetKind::from_path_segment(""), None);
    }

    #[tokio::test]
    async fn fs_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(
            dir.path().join(AssetKind::CreditCard.stylesheet_path()),
            ".mollie-component { height: 40px; }",
        )
        .unwrap();

        let source = FsAssetSource::new(dir.path());
        let css = source
            .read(AssetKind::CreditCard.stylesheet_path())
            .await
            .unwrap();
        assert_eq!(css, ".mollie-component { height: 40px; }");
    }

    #[tokio::test]
    async fn fs_source_reports_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsAssetSource::new(dir.path());

        let result = source.read(AssetKind::CreditCard.script_path()).await;
        assert_matches!(result, Err(ServiceError::AssetError(msg)) if msg.contains("missing"));
    }

    #[tokio::test]
    async fn packaged_assets_contain_every_placeholder() {
        let source = FsAssetSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let script = source
            .read(AssetKind::CreditCard.script_path())
            .await
            .unwrap();

        for token in PLACEHOLDERS {
            assert!(script.contains(token), "{token} missing from packaged script");
        }
    }
}
