use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::Stream;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{self, RequestMeta};
use crate::error::{GigaChatError, Result};
use crate::models::{
    AccessToken, Chat, ChatCompletion, ChatCompletionChunk, Model, Models, ThreadRunOptions,
    ThreadRunResponse,
};
use crate::settings::Settings;

/// Async GigaChat client.
///
/// Owns one HTTP client for the API and one for the OAuth server, plus a
/// cached access token. Authenticated calls refresh the token lazily and
/// retry once when the server rejects the cached one.
pub struct GigaChat {
    settings: Settings,
    client: reqwest::Client,
    auth_client: reqwest::Client,
    token: RwLock<Option<AccessToken>>,
}

fn http_client(settings: &Settings) -> Result<reqwest::Client> {
    let timeout =
        Duration::try_from_secs_f64(settings.timeout).map_err(|e| GigaChatError::Config {
            message: format!("invalid timeout {}: {e}", settings.timeout),
        })?;
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!settings.verify_ssl_certs)
        .build()?)
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl GigaChat {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let client = http_client(&settings)?;
        let auth_client = http_client(&settings)?;
        // A pre-issued token has no known expiry: trusted until rejected.
        let token = settings.access_token.clone().map(|access_token| AccessToken {
            access_token,
            expires_at: 0,
        });
        Ok(Self {
            settings,
            client,
            auth_client,
            token: RwLock::new(token),
        })
    }

    /// Builds a client purely from `GIGACHAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Settings::from_env()?)
    }

    /// Currently cached access token, if authentication is enabled.
    pub async fn token(&self) -> Option<String> {
        if !self.settings.use_auth {
            return None;
        }
        let guard = self.token.read().await;
        guard.as_ref().map(|t| t.access_token.clone())
    }

    async fn cached_token(&self) -> Option<String> {
        let guard = self.token.read().await;
        guard
            .as_ref()
            .filter(|t| t.is_fresh(now_ms()))
            .map(|t| t.access_token.clone())
    }

    async fn reset_token(&self) {
        *self.token.write().await = None;
    }

    /// Obtains a fresh token from whichever credential source is
    /// configured; the OAuth authorization key wins over user/password.
    /// Without either, the existing token (if any) is kept as-is.
    async fn refresh_token(&self) -> Result<Option<String>> {
        let token = if let Some(credentials) = &self.settings.credentials {
            let token = api::post_auth::call(
                &self.auth_client,
                &self.settings.auth_url,
                credentials,
                &self.settings.scope,
            )
            .await?;
            info!("OAuth access token refreshed");
            Some(token)
        } else if let (Some(user), Some(password)) =
            (&self.settings.user, &self.settings.password)
        {
            let token: AccessToken =
                api::post_token::call(&self.client, &self.settings.base_url, user, password)
                    .await?
                    .into();
            info!("access token refreshed");
            Some(token)
        } else {
            debug!("no credential source configured, proceeding with the current token");
            None
        };

        match token {
            Some(token) => {
                let value = token.access_token.clone();
                *self.token.write().await = Some(token);
                Ok(Some(value))
            }
            None => {
                let guard = self.token.read().await;
                Ok(guard.as_ref().map(|t| t.access_token.clone()))
            }
        }
    }

    /// Runs an authenticated call: use the cached token when fresh, and on
    /// an authentication error drop it, refresh once and retry once.
    async fn with_auth<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.settings.use_auth {
            return call(None).await;
        }

        if let Some(token) = self.cached_token().await {
            match call(Some(token)).await {
                Err(GigaChatError::Authentication { url, status, .. }) => {
                    warn!(%url, status, "authentication rejected, refreshing token");
                    self.reset_token().await;
                }
                other => return other,
            }
        }

        let token = self.refresh_token().await?;
        call(token).await
    }

    /// The original service behavior: a default model configured in the
    /// settings replaces whatever the payload carries.
    fn apply_default_model(&self, mut chat: Chat) -> Chat {
        if let Some(model) = &self.settings.model {
            chat.model = Some(model.clone());
        }
        chat
    }

    /// Lists the available models.
    pub async fn models(&self) -> Result<Models> {
        self.with_auth(|token| async move {
            api::get_models::call(&self.client, &self.settings.base_url, token.as_deref()).await
        })
        .await
    }

    /// Describes a single model.
    pub async fn model(&self, model: &str) -> Result<Model> {
        self.with_auth(|token| async move {
            api::get_model::call(&self.client, &self.settings.base_url, model, token.as_deref())
                .await
        })
        .await
    }

    /// Requests a full completion for the given chat payload.
    pub async fn chat(&self, payload: impl Into<Chat>) -> Result<ChatCompletion> {
        let chat = self.apply_default_model(payload.into());
        let chat = &chat;
        self.with_auth(|token| async move {
            api::post_chat::call(
                &self.client,
                &self.settings.base_url,
                chat,
                token.as_deref(),
                RequestMeta::default(),
            )
            .await
        })
        .await
    }

    /// Streams completion chunks for the given chat payload.
    ///
    /// The auth retry happens while opening the stream; errors after the
    /// first chunk are yielded as stream items.
    pub async fn stream(
        &self,
        payload: impl Into<Chat>,
    ) -> Result<impl Stream<Item = Result<ChatCompletionChunk>>> {
        let chat = self.apply_default_model(payload.into());

        if self.settings.use_auth {
            if let Some(token) = self.cached_token().await {
                match api::stream_chat::call(
                    &self.client,
                    &self.settings.base_url,
                    &chat,
                    Some(&token),
                    RequestMeta::default(),
                )
                .await
                {
                    Err(GigaChatError::Authentication { url, status, .. }) => {
                        warn!(%url, status, "authentication rejected, refreshing token");
                        self.reset_token().await;
                    }
                    other => return other,
                }
            }
            let token = self.refresh_token().await?;
            return api::stream_chat::call(
                &self.client,
                &self.settings.base_url,
                &chat,
                token.as_deref(),
                RequestMeta::default(),
            )
            .await;
        }

        api::stream_chat::call(
            &self.client,
            &self.settings.base_url,
            &chat,
            None,
            RequestMeta::default(),
        )
        .await
    }

    /// Starts a run of an existing thread.
    pub async fn run_thread(
        &self,
        thread_id: &str,
        options: Option<&ThreadRunOptions>,
    ) -> Result<ThreadRunResponse> {
        self.with_auth(|token| async move {
            api::threads::post_run(
                &self.client,
                &self.settings.base_url,
                thread_id,
                options,
                token.as_deref(),
            )
            .await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_settings() -> Settings {
        Settings {
            base_url: "http://localhost:8080/api/v1".into(),
            auth_url: "http://localhost:8080/oauth".into(),
            ..Settings::default()
        }
    }

    #[test]
    fn pre_issued_token_seeds_the_cache() {
        let settings = Settings {
            access_token: Some("preissued".into()),
            ..local_settings()
        };
        let client = GigaChat::new(settings).unwrap();
        tokio_test::block_on(async {
            assert_eq!(client.token().await.as_deref(), Some("preissued"));
            assert_eq!(client.cached_token().await.as_deref(), Some("preissued"));
        });
    }

    #[test]
    fn token_is_hidden_when_auth_disabled() {
        let settings = Settings {
            access_token: Some("preissued".into()),
            use_auth: false,
            ..local_settings()
        };
        let client = GigaChat::new(settings).unwrap();
        tokio_test::block_on(async {
            assert_eq!(client.token().await, None);
        });
    }

    #[test]
    fn overflowing_timeout_is_a_config_error() {
        let settings = Settings {
            timeout: 1e300,
            ..local_settings()
        };
        assert!(matches!(
            GigaChat::new(settings),
            Err(GigaChatError::Config { .. })
        ));
    }

    #[test]
    fn default_model_replaces_payload_model() {
        let settings = Settings {
            model: Some("GigaChat-Pro".into()),
            ..local_settings()
        };
        let client = GigaChat::new(settings).unwrap();
        let chat = client.apply_default_model(Chat::from("hi").with_model("GigaChat"));
        assert_eq!(chat.model.as_deref(), Some("GigaChat-Pro"));
    }

    #[test]
    fn payload_model_survives_without_a_default() {
        let client = GigaChat::new(local_settings()).unwrap();
        let chat = client.apply_default_model(Chat::from("hi").with_model("GigaChat"));
        assert_eq!(chat.model.as_deref(), Some("GigaChat"));
    }
}
