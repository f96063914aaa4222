//! API credential resolution
//!
//! The API key is resolved once at startup by walking an ordered list of
//! [`CredentialProvider`]s: the OS keyring first, then the process
//! environment. A provider that errors is logged and skipped; if none yields
//! a non-blank key, startup fails with
//! [`ScopechatError::MissingCredentials`].

use crate::config::ProviderConfig;
use crate::error::{Result, ScopechatError};
use std::fmt;

/// Keyring service name under which the API key is stored
pub const KEYRING_SERVICE: &str = "scopechat";

/// An API key that never prints itself
///
/// # Examples
///
/// ```
/// use scopechat::credentials::Secret;
///
/// let secret = Secret::new("gsk_live_123");
/// assert_eq!(secret.expose(), "gsk_live_123");
/// assert_eq!(format!("{:?}", secret), "Secret(***)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a raw key
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw key, for building request headers
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// One source of the API key
#[cfg_attr(test, mockall::automock)]
pub trait CredentialProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Look the key up
    ///
    /// `Ok(None)` means this source simply has no key.
    fn lookup(&self) -> Result<Option<Secret>>;
}

/// Looks the key up in the OS credential store
#[derive(Debug, Clone)]
pub struct KeyringCredentialProvider {
    service: String,
    user: String,
}

impl KeyringCredentialProvider {
    /// Create a keyring lookup for `service`/`user`
    pub fn new(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }
}

impl CredentialProvider for KeyringCredentialProvider {
    fn name(&self) -> &'static str {
        "keyring"
    }

    fn lookup(&self) -> Result<Option<Secret>> {
        let entry = keyring::Entry::new(&self.service, &self.user)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(Secret::new(value))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ScopechatError::Keyring(e).into()),
        }
    }
}

/// Looks the key up in a process environment variable
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    /// Create an environment lookup for `var`
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn lookup(&self) -> Result<Option<Secret>> {
        Ok(std::env::var(&self.var).ok().map(Secret::new))
    }
}

/// The default lookup order: keyring, then environment
pub fn default_providers(config: &ProviderConfig) -> Vec<Box<dyn CredentialProvider>> {
    vec![
        Box::new(KeyringCredentialProvider::new(
            KEYRING_SERVICE,
            config.api_key_env.as_str(),
        )),
        Box::new(EnvCredentialProvider::new(config.api_key_env.as_str())),
    ]
}

/// Resolve the API key from the first provider that has a non-blank value
///
/// # Errors
///
/// Returns [`ScopechatError::MissingCredentials`] when every provider comes
/// up empty or fails.
pub fn resolve_credential(providers: &[Box<dyn CredentialProvider>]) -> Result<Secret> {
    for provider in providers {
        match provider.lookup() {
            Ok(Some(secret)) if !secret.is_blank() => {
                tracing::info!("Resolved API key from {}", provider.name());
                return Ok(secret);
            }
            Ok(_) => {
                tracing::debug!("No API key in {}", provider.name());
            }
            Err(e) => {
                tracing::warn!("Credential lookup via {} failed: {}", provider.name(), e);
            }
        }
    }

    let tried = providers
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ScopechatError::MissingCredentials(format!(
        "no API key found (tried: {})",
        if tried.is_empty() { "nothing" } else { tried.as_str() }
    ))
    .into())
}

/// Store the API key in the OS keyring
///
/// # Errors
///
/// Returns error if the key is blank or the keyring rejects the write
pub fn store_credential(config: &ProviderConfig, secret: &Secret) -> Result<()> {
    if secret.is_blank() {
        return Err(ScopechatError::Config("API key cannot be empty".to_string()).into());
    }
    let entry = keyring::Entry::new(KEYRING_SERVICE, &config.api_key_env)?;
    entry.set_password(secret.expose())?;
    tracing::info!(
        "Stored API key in keyring: service={}, user={}",
        KEYRING_SERVICE,
        config.api_key_env
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn mock(name: &'static str, value: Option<&'static str>) -> Box<dyn CredentialProvider> {
        let mut provider = MockCredentialProvider::new();
        provider.expect_name().return_const(name);
        provider
            .expect_lookup()
            .returning(move || Ok(value.map(Secret::new)));
        Box::new(provider)
    }

    fn failing(name: &'static str) -> Box<dyn CredentialProvider> {
        let mut provider = MockCredentialProvider::new();
        provider.expect_name().return_const(name);
        provider
            .expect_lookup()
            .returning(|| Err(ScopechatError::Provider("store locked".to_string()).into()));
        Box::new(provider)
    }

    #[test]
    fn test_secret_is_redacted() {
        let secret = Secret::new("gsk_live");
        assert_eq!(secret.to_string(), "***");
        assert!(!format!("{:?}", secret).contains("gsk_live"));
    }

    #[test]
    fn test_first_provider_wins() {
        let providers = vec![
            mock("keyring", Some("from-keyring")),
            mock("environment", Some("from-env")),
        ];
        let secret = resolve_credential(&providers).unwrap();
        assert_eq!(secret.expose(), "from-keyring");
    }

    #[test]
    fn test_falls_back_when_first_is_empty() {
        let providers = vec![mock("keyring", None), mock("environment", Some("from-env"))];
        assert_eq!(resolve_credential(&providers).unwrap().expose(), "from-env");
    }

    #[test]
    fn test_blank_value_counts_as_absent() {
        let providers = vec![
            mock("keyring", Some("   ")),
            mock("environment", Some("from-env")),
        ];
        assert_eq!(resolve_credential(&providers).unwrap().expose(), "from-env");
    }

    #[test]
    fn test_failing_provider_is_skipped() {
        let providers = vec![failing("keyring"), mock("environment", Some("from-env"))];
        assert_eq!(resolve_credential(&providers).unwrap().expose(), "from-env");
    }

    #[test]
    fn test_missing_everywhere_is_error() {
        let providers = vec![mock("keyring", None), failing("environment")];
        let err = resolve_credential(&providers).unwrap_err();
        let err = err.downcast::<ScopechatError>().unwrap();
        assert!(matches!(err, ScopechatError::MissingCredentials(_)));
        assert!(err.to_string().contains("keyring, environment"));
    }

    #[test]
    fn test_no_providers_is_error() {
        assert!(resolve_credential(&[]).is_err());
    }

    #[test]
    #[serial]
    fn test_env_provider_reads_variable() {
        std::env::set_var("SCOPECHAT_TEST_KEY", "env-secret");
        let found = EnvCredentialProvider::new("SCOPECHAT_TEST_KEY").lookup().unwrap();
        std::env::remove_var("SCOPECHAT_TEST_KEY");
        assert_eq!(found, Some(Secret::new("env-secret")));

        let missing = EnvCredentialProvider::new("SCOPECHAT_TEST_KEY").lookup().unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_default_provider_order() {
        let providers = default_providers(&ProviderConfig::default());
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["keyring", "environment"]);
    }

    #[test]
    fn test_store_rejects_blank_key() {
        assert!(store_credential(&ProviderConfig::default(), &Secret::new(" ")).is_err());
    }
}
