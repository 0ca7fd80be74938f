use crate::error::{GigaChatError, Result};
use url::Url;

pub const BASE_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
pub const AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const SCOPE: &str = "GIGACHAT_API_PERS";

const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
const ENV_PREFIX: &str = "GIGACHAT_";

/// Connection settings for the GigaChat API and its OAuth server.
///
/// Every field can come from the environment (`GIGACHAT_*` variables);
/// values set through [`SettingsBuilder`] take precedence.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub auth_url: String,
    /// Base64 authorization key for the OAuth 2.0 flow.
    pub credentials: Option<String>,
    pub scope: String,
    /// Pre-issued access token; skips the auth flow while the server accepts it.
    pub access_token: Option<String>,
    /// Default model applied to chat payloads that do not name one.
    pub model: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub timeout: f64,
    pub verify_ssl_certs: bool,
    pub use_auth: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            auth_url: AUTH_URL.to_string(),
            credentials: None,
            scope: SCOPE.to_string(),
            access_token: None,
            model: None,
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            verify_ssl_certs: true,
            use_auth: true,
        }
    }
}

impl Settings {
    /// Loads settings from `GIGACHAT_*` environment variables on top of the defaults.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Some(value) = env_var("BASE_URL") {
            settings.base_url = value;
        }
        if let Some(value) = env_var("AUTH_URL") {
            settings.auth_url = value;
        }
        settings.credentials = env_var("CREDENTIALS").or(settings.credentials);
        if let Some(value) = env_var("SCOPE") {
            settings.scope = value;
        }
        settings.access_token = env_var("ACCESS_TOKEN").or(settings.access_token);
        settings.model = env_var("MODEL").or(settings.model);
        settings.user = env_var("USER").or(settings.user);
        settings.password = env_var("PASSWORD").or(settings.password);
        if let Some(value) = env_var("TIMEOUT") {
            settings.timeout = parse_float("TIMEOUT", &value)?;
        }
        if let Some(value) = env_var("VERIFY_SSL_CERTS") {
            settings.verify_ssl_certs = parse_bool("VERIFY_SSL_CERTS", &value)?;
        }
        if let Some(value) = env_var("USE_AUTH") {
            settings.use_auth = parse_bool("USE_AUTH", &value)?;
        }

        Ok(settings)
    }

    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, value) in [("base_url", &self.base_url), ("auth_url", &self.auth_url)] {
            Url::parse(value).map_err(|e| GigaChatError::Config {
                message: format!("invalid {name} '{value}': {e}"),
            })?;
        }
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(GigaChatError::Config {
                message: format!("timeout must be a positive number of seconds, got {}", self.timeout),
            });
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(GigaChatError::Config {
            message: format!("{ENV_PREFIX}{name} must be a boolean, got '{value}'"),
        }),
    }
}

fn parse_float(name: &str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| GigaChatError::Config {
        message: format!("{ENV_PREFIX}{name} must be a number, got '{value}'"),
    })
}

/// Builder over [`Settings`]; unset fields fall back to the environment,
/// then to the defaults.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    base_url: Option<String>,
    auth_url: Option<String>,
    credentials: Option<String>,
    scope: Option<String>,
    access_token: Option<String>,
    model: Option<String>,
    user: Option<String>,
    password: Option<String>,
    timeout: Option<f64>,
    verify_ssl_certs: Option<bool>,
    use_auth: Option<bool>,
}

impl SettingsBuilder {
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn auth_url(mut self, value: impl Into<String>) -> Self {
        self.auth_url = Some(value.into());
        self
    }

    pub fn credentials(mut self, value: impl Into<String>) -> Self {
        self.credentials = Some(value.into());
        self
    }

    pub fn scope(mut self, value: impl Into<String>) -> Self {
        self.scope = Some(value.into());
        self
    }

    pub fn access_token(mut self, value: impl Into<String>) -> Self {
        self.access_token = Some(value.into());
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.model = Some(value.into());
        self
    }

    pub fn user(mut self, value: impl Into<String>) -> Self {
        self.user = Some(value.into());
        self
    }

    pub fn password(mut self, value: impl Into<String>) -> Self {
        self.password = Some(value.into());
        self
    }

    pub fn timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn verify_ssl_certs(mut self, value: bool) -> Self {
        self.verify_ssl_certs = Some(value);
        self
    }

    pub fn use_auth(mut self, value: bool) -> Self {
        self.use_auth = Some(value);
        self
    }

    pub fn build(self) -> Result<Settings> {
        let mut settings = Settings::from_env()?;

        if let Some(value) = self.base_url {
            settings.base_url = value;
        }
        if let Some(value) = self.auth_url {
            settings.auth_url = value;
        }
        settings.credentials = self.credentials.or(settings.credentials);
        if let Some(value) = self.scope {
            settings.scope = value;
        }
        settings.access_token = self.access_token.or(settings.access_token);
        settings.model = self.model.or(settings.model);
        settings.user = self.user.or(settings.user);
        settings.password = self.password.or(settings.password);
        if let Some(value) = self.timeout {
            settings.timeout = value;
        }
        if let Some(value) = self.verify_ssl_certs {
            settings.verify_ssl_certs = value;
        }
        if let Some(value) = self.use_auth {
            settings.use_auth = value;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_endpoints() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, BASE_URL);
        assert_eq!(settings.auth_url, AUTH_URL);
        assert_eq!(settings.scope, SCOPE);
        assert!(settings.use_auth);
        assert!(settings.verify_ssl_certs);
        assert_eq!(settings.timeout, 30.0);
    }

    #[test]
    fn builder_overrides_win() {
        let settings = Settings::builder()
            .base_url("http://localhost:8080/api/v1")
            .credentials("key")
            .scope("GIGACHAT_API_CORP")
            .timeout(5.0)
            .verify_ssl_certs(false)
            .build()
            .unwrap();

        assert_eq!(settings.base_url, "http://localhost:8080/api/v1");
        assert_eq!(settings.credentials.as_deref(), Some("key"));
        assert_eq!(settings.scope, "GIGACHAT_API_CORP");
        assert_eq!(settings.timeout, 5.0);
        assert!(!settings.verify_ssl_certs);
    }

    #[test]
    fn builder_values_win_over_environment() {
        // No other test touches GIGACHAT_SCOPE, so this is race-free.
        std::env::set_var("GIGACHAT_SCOPE", "GIGACHAT_API_B2B");

        let from_env = Settings::builder().build().unwrap();
        assert_eq!(from_env.scope, "GIGACHAT_API_B2B");

        let overridden = Settings::builder()
            .scope("GIGACHAT_API_CORP")
            .build()
            .unwrap();
        assert_eq!(overridden.scope, "GIGACHAT_API_CORP");

        std::env::remove_var("GIGACHAT_SCOPE");
    }

    #[test]
    fn builder_rejects_malformed_base_url() {
        let result = Settings::builder().base_url("not a url").build();
        assert!(matches!(result, Err(GigaChatError::Config { .. })));
    }

    #[test]
    fn builder_rejects_non_positive_timeout() {
        let result = Settings::builder().timeout(0.0).build();
        assert!(matches!(result, Err(GigaChatError::Config { .. })));
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        assert!(parse_bool("USE_AUTH", "True").unwrap());
        assert!(parse_bool("USE_AUTH", "1").unwrap());
        assert!(!parse_bool("USE_AUTH", "no").unwrap());
        assert!(parse_bool("USE_AUTH", "maybe").is_err());
    }
}
