//! One module per GigaChat endpoint. Each exposes a free async `call`
//! function taking the shared [`reqwest::Client`]; the high-level
//! [`crate::GigaChat`] client wires in base URLs and token management.

pub mod get_model;
pub mod get_models;
pub mod post_auth;
pub mod post_chat;
pub mod post_token;
pub mod stream_chat;
pub mod threads;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{GigaChatError, Result};

/// Optional per-request tracing headers accepted by the chat endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMeta<'a> {
    pub client_id: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub request_id: Option<&'a str>,
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn build_headers(
    access_token: Option<&str>,
    meta: RequestMeta<'_>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = access_token {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
    }
    if let Some(client_id) = meta.client_id {
        headers.insert("X-Client-ID", header_value(client_id)?);
    }
    if let Some(session_id) = meta.session_id {
        headers.insert("X-Session-ID", header_value(session_id)?);
    }
    if let Some(request_id) = meta.request_id {
        headers.insert("X-Request-ID", header_value(request_id)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| GigaChatError::Config {
        message: format!("value is not a valid HTTP header: '{value}'"),
    })
}

/// Maps the response to the expected JSON body, or to an error carrying
/// the final URL, status and body text. 401 becomes an authentication
/// error so the client can refresh its token and retry.
pub(crate) async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let url = response.url().to_string();
    if status == StatusCode::OK {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(status_error(status, url, message))
    }
}

pub(crate) fn status_error(status: StatusCode, url: String, message: String) -> GigaChatError {
    if status == StatusCode::UNAUTHORIZED {
        GigaChatError::Authentication {
            url,
            status: status.as_u16(),
            message,
        }
    } else {
        GigaChatError::Response {
            url,
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_join_normalizes_slashes() {
        assert_eq!(
            endpoint("http://host/api/v1/", "/chat/completions"),
            "http://host/api/v1/chat/completions"
        );
        assert_eq!(
            endpoint("http://host/api/v1", "models"),
            "http://host/api/v1/models"
        );
    }

    #[test]
    fn headers_carry_bearer_and_tags() {
        let meta = RequestMeta {
            session_id: Some("s-1"),
            request_id: Some("r-1"),
            ..RequestMeta::default()
        };
        let headers = build_headers(Some("tok"), meta).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert_eq!(headers.get("X-Session-ID").unwrap(), "s-1");
        assert_eq!(headers.get("X-Request-ID").unwrap(), "r-1");
        assert!(headers.get("X-Client-ID").is_none());
    }

    #[test]
    fn control_characters_are_rejected() {
        let result = build_headers(Some("bad\ntoken"), RequestMeta::default());
        assert!(matches!(result, Err(GigaChatError::Config { .. })));
    }
}
