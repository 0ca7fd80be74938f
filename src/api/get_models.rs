use crate::api::RequestMeta;
use crate::error::Result;
use crate::models::Models;

/// Fetches the catalog of available models.
pub async fn call(
    client: &reqwest::Client,
    base_url: &str,
    access_token: Option<&str>,
) -> Result<Models> {
    let headers = super::build_headers(access_token, RequestMeta::default())?;
    let response = client
        .get(super::endpoint(base_url, "/models"))
        .headers(headers)
        .send()
        .await?;

    super::expect_json(response).await
}
