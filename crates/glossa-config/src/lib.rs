//! Configuration for Glossa
//!
//! A TOML file names the configured providers, their credentials and
//! defaults, the provider in use, and optional telemetry export.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod provider;
pub mod telemetry;

use indexmap::IndexMap;
use serde::Deserialize;

pub use env::expand_env;
pub use provider::{ProviderConfig, ProviderKind, ToolCallDetection};
pub use telemetry::TelemetryConfig;

/// Top-level Glossa configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider used when the caller does not pick one
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, ProviderConfig>,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Pick a provider by name, falling back to the default one
    ///
    /// Without an explicit name or `default_provider`, the only configured
    /// provider is selected.
    pub fn select_provider(&self, name: Option<&str>) -> anyhow::Result<(&str, &ProviderConfig)> {
        let name = match name.or(self.default_provider.as_deref()) {
            Some(name) => name,
            None => {
                let mut names = self.providers.keys();
                match (names.next(), names.next()) {
                    (Some(only), None) => only.as_str(),
                    _ => anyhow::bail!("no provider selected; set `default_provider` or pick one explicitly"),
                }
            }
        };

        self.providers
            .get_key_value(name)
            .map(|(name, provider)| (name.as_str(), provider))
            .ok_or_else(|| anyhow::anyhow!("provider not found: `{name}`"))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn parse(raw: &str) -> Config {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn explicit_name_wins_over_default() {
        let config = parse(indoc! {r#"
            default_provider = "claude"

            [providers.claude]
            type = "claude"

            [providers.deepseek]
            type = "deepseek"
        "#});

        let (name, provider) = config.select_provider(Some("deepseek")).unwrap();
        assert_eq!(name, "deepseek");
        assert_eq!(provider.kind, ProviderKind::DeepSeek);

        let (name, _) = config.select_provider(None).unwrap();
        assert_eq!(name, "claude");
    }

    #[test]
    fn single_provider_needs_no_default() {
        let config = parse(indoc! {r#"
            [providers.only]
            type = "deepseek"
        "#});

        assert_eq!(config.select_provider(None).unwrap().0, "only");
    }

    #[test]
    fn ambiguous_selection_fails() {
        let config = parse(indoc! {r#"
            [providers.a]
            type = "deepseek"

            [providers.b]
            type = "claude"
        "#});

        let err = config.select_provider(None).unwrap_err();
        assert!(err.to_string().contains("default_provider"));
    }

    #[test]
    fn unknown_provider_fails() {
        let config = parse(indoc! {r#"
            [providers.a]
            type = "deepseek"
        "#});

        let err = config.select_provider(Some("missing")).unwrap_err();
        assert!(err.to_string().contains("`missing`"));
    }
}
