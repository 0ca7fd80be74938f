use crate::api::RequestMeta;
use crate::error::Result;
use crate::models::Model;

/// Fetches the description of a single model.
pub async fn call(
    client: &reqwest::Client,
    base_url: &str,
    model: &str,
    access_token: Option<&str>,
) -> Result<Model> {
    let headers = super::build_headers(access_token, RequestMeta::default())?;
    let response = client
        .get(super::endpoint(base_url, &format!("/models/{model}")))
        .headers(headers)
        .send()
        .await?;

    super::expect_json(response).await
}
