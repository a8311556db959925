//! API credentials handed to an adapter per call

use glossa_config::ProviderConfig;
use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;

/// Key/secret pair supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// API key or access key id
    pub api_key: Option<SecretString>,
    /// API secret or secret access key
    pub api_secret: Option<SecretString>,
}

/// Which credential fields a provider needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredCredentials {
    /// Only the API key
    Key,
    /// Both key and secret
    KeyAndSecret,
}

impl Credentials {
    /// Credentials with only an API key
    pub fn key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            api_secret: None,
        }
    }

    /// Credentials with a key and a secret
    pub fn key_and_secret(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            api_secret: Some(SecretString::from(api_secret.into())),
        }
    }

    /// The API key, failing when absent or empty
    pub fn require_key(&self) -> Result<&str, LlmError> {
        non_empty(self.api_key.as_ref()).ok_or_else(|| LlmError::Config("api key is missing or empty".to_owned()))
    }

    /// The API secret, failing when absent or empty
    pub fn require_secret(&self) -> Result<&str, LlmError> {
        non_empty(self.api_secret.as_ref())
            .ok_or_else(|| LlmError::Config("api secret is missing or empty".to_owned()))
    }

    /// Check the fields a provider needs before any network attempt
    pub fn validate(&self, required: RequiredCredentials) -> Result<(), LlmError> {
        self.require_key()?;
        if required == RequiredCredentials::KeyAndSecret {
            self.require_secret()?;
        }
        Ok(())
    }
}

impl From<&ProviderConfig> for Credentials {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }
}

fn non_empty(secret: Option<&SecretString>) -> Option<&str> {
    secret.map(ExposeSecret::expose_secret).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_config_error() {
        let err = Credentials::default().validate(RequiredCredentials::Key).unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn empty_secret_is_config_error() {
        let creds = Credentials::key_and_secret("AKIA", "  ");
        assert!(creds.validate(RequiredCredentials::Key).is_ok());
        let err = creds.validate(RequiredCredentials::KeyAndSecret).unwrap_err();
        assert!(err.to_string().contains("secret"));
    }

    #[test]
    fn read_from_provider_config() {
        let config: ProviderConfig = toml::from_str("type = \"claude\"\napi_key = \"AKIA\"\napi_secret = \"\"").unwrap();
        let creds = Credentials::from(&config);
        assert_eq!(creds.require_key().unwrap(), "AKIA");
        assert!(matches!(creds.require_secret(), Err(LlmError::Config(_))));
    }

    #[test]
    fn complete_pair_validates() {
        let creds = Credentials::key_and_secret("AKIA", "s3cr3t");
        assert!(creds.validate(RequiredCredentials::KeyAndSecret).is_ok());
        assert_eq!(creds.require_key().unwrap(), "AKIA");
    }
}
