use crate::error::Result;
use crate::models::Token;

/// Issues a token through the legacy `/token` endpoint with HTTP basic auth.
pub async fn call(
    client: &reqwest::Client,
    base_url: &str,
    user: &str,
    password: &str,
) -> Result<Token> {
    let response = client
        .post(super::endpoint(base_url, "/token"))
        .basic_auth(user, Some(password))
        .send()
        .await?;

    super::expect_json(response).await
}
