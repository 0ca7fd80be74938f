use reqwest::header::ACCEPT;
use uuid::Uuid;

use crate::error::Result;
use crate::models::AccessToken;

/// Exchanges the base64 authorization key for an access token on the
/// OAuth 2.0 server.
pub async fn call(
    client: &reqwest::Client,
    auth_url: &str,
    credentials: &str,
    scope: &str,
) -> Result<AccessToken> {
    let rquid = Uuid::new_v4().to_string();
    let response = client
        .post(auth_url)
        .header(ACCEPT, "application/json")
        .header("RqUID", rquid)
        .header("Authorization", format!("Basic {credentials}"))
        .form(&[("scope", scope)])
        .send()
        .await?;

    super::expect_json(response).await
}
