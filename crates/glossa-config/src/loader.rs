use std::path::Path;

use anyhow::Context;

use crate::Config;
use crate::provider::{ProviderConfig, ProviderKind};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let expanded = crate::env::expand_env(&raw).context("config variable expansion failed")?;
        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;

        config.validate()?;
        tracing::debug!(path = %path.display(), providers = config.providers.len(), "configuration loaded");

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Empty credentials are accepted here; adapters reject them per call.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("at least one provider must be configured");
        }

        if let Some(default) = &self.default_provider
            && !self.providers.contains_key(default)
        {
            anyhow::bail!("default_provider `{default}` is not a configured provider");
        }

        for (name, provider) in &self.providers {
            validate_provider(name, provider)?;
        }

        Ok(())
    }
}

fn validate_provider(name: &str, provider: &ProviderConfig) -> anyhow::Result<()> {
    if let Some(temperature) = provider.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        anyhow::bail!("provider '{name}': temperature must be between 0.0 and 2.0, got {temperature}");
    }

    if provider.max_tokens == Some(0) {
        anyhow::bail!("provider '{name}': max_tokens must be greater than 0");
    }

    if provider.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
        anyhow::bail!("provider '{name}': model must not be empty");
    }

    let kind = provider.kind.as_str();
    match provider.kind {
        ProviderKind::Claude if provider.base_url.is_some() => {
            anyhow::bail!("provider '{name}': base_url is not supported for {kind}, use region");
        }
        ProviderKind::DeepSeek if provider.region.is_some() => {
            anyhow::bail!("provider '{name}': region is not supported for {kind}, use base_url");
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::ToolCallDetection;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn validate(raw: &str) -> anyhow::Result<()> {
        let config: Config = toml::from_str(raw)?;
        config.validate()
    }

    #[test]
    fn loads_full_config() {
        let file = write_config(indoc! {r#"
            default_provider = "claude"

            [providers.claude]
            type = "claude"
            api_key = "AKIA"
            api_secret = "s3cr3t"
            region = "eu-central-1"
            temperature = 0.2
            tool_call_detection = "strict"

            [providers.deepseek]
            type = "deepseek"
            api_key = "sk-test"
            base_url = "http://127.0.0.1:8080/chat/completions"
            max_tokens = 512

            [telemetry]
            service_name = "glossa-test"
        "#});

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_provider.as_deref(), Some("claude"));
        assert_eq!(config.providers.keys().collect::<Vec<_>>(), ["claude", "deepseek"]);

        let claude = &config.providers["claude"];
        assert_eq!(claude.kind, ProviderKind::Claude);
        assert_eq!(claude.api_secret.as_ref().unwrap().expose_secret(), "s3cr3t");
        assert_eq!(claude.region.as_deref(), Some("eu-central-1"));
        assert_eq!(claude.tool_call_detection, ToolCallDetection::Strict);

        let deepseek = &config.providers["deepseek"];
        assert_eq!(deepseek.max_tokens, Some(512));
        assert_eq!(deepseek.tool_call_detection, ToolCallDetection::Lenient);
        assert_eq!(config.telemetry.unwrap().service_name, "glossa-test");
    }

    #[test]
    fn expands_environment_before_parsing() {
        temp_env::with_var("GLOSSA_LOADER_KEY", Some("sk-from-env"), || {
            let file = write_config(indoc! {r#"
                [providers.deepseek]
                type = "deepseek"
                api_key = "{{ env.GLOSSA_LOADER_KEY }}"
            "#});

            let config = Config::load(file.path()).unwrap();
            let key = config.providers["deepseek"].api_key.as_ref().unwrap();
            assert_eq!(key.expose_secret(), "sk-from-env");
        });
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/glossa.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/glossa.toml"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_config(indoc! {r#"
            [providers.deepseek]
            type = "deepseek"
            api_kye = "typo"
        "#});

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn requires_a_provider() {
        let err = validate("").unwrap_err();
        assert!(err.to_string().contains("at least one provider"));
    }

    #[test]
    fn default_provider_must_exist() {
        let err = validate(indoc! {r#"
            default_provider = "claude"

            [providers.deepseek]
            type = "deepseek"
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("`claude`"));
    }

    #[test]
    fn temperature_out_of_range() {
        let err = validate(indoc! {r#"
            [providers.deepseek]
            type = "deepseek"
            temperature = 2.5
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn zero_max_tokens() {
        let err = validate(indoc! {r#"
            [providers.deepseek]
            type = "deepseek"
            max_tokens = 0
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn region_only_on_claude() {
        let err = validate(indoc! {r#"
            [providers.deepseek]
            type = "deepseek"
            region = "us-east-1"
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("region is not supported for deepseek"));
    }

    #[test]
    fn base_url_only_on_deepseek() {
        let err = validate(indoc! {r#"
            [providers.claude]
            type = "claude"
            base_url = "https://example.com"
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("base_url is not supported for claude"));
    }

    #[test]
    fn empty_credentials_pass_validation() {
        validate(indoc! {r#"
            [providers.claude]
            type = "claude"
            api_key = ""
        "#})
        .unwrap();
    }
}
