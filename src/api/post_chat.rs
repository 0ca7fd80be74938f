use crate::api::RequestMeta;
use crate::error::Result;
use crate::models::{Chat, ChatCompletion};

/// Requests a full chat completion. The `stream` flag is stripped from
/// the payload; streaming goes through [`crate::api::stream_chat`].
pub async fn call(
    client: &reqwest::Client,
    base_url: &str,
    chat: &Chat,
    access_token: Option<&str>,
    meta: RequestMeta<'_>,
) -> Result<ChatCompletion> {
    let payload = request_payload(chat);
    let headers = super::build_headers(access_token, meta)?;
    let response = client
        .post(super::endpoint(base_url, "/chat/completions"))
        .headers(headers)
        .json(&payload)
        .send()
        .await?;

    super::expect_json(response).await
}

fn request_payload(chat: &Chat) -> Chat {
    let mut payload = chat.clone();
    payload.stream = None;
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, Role};

    #[test]
    fn stream_flag_is_stripped() {
        let mut chat = Chat::new(vec![Message::new(Role::User, "hi")]);
        chat.stream = Some(true);

        let json = serde_json::to_value(request_payload(&chat)).unwrap();
        assert!(json.get("stream").is_none());
    }
}
