use serde::Serialize;

use crate::api::RequestMeta;
use crate::error::Result;
use crate::models::{ThreadRunOptions, ThreadRunResponse};

#[derive(Serialize)]
struct RunBody<'a> {
    thread_id: &'a str,
    #[serde(flatten)]
    options: Option<&'a ThreadRunOptions>,
}

/// Starts a run of an existing thread.
pub async fn post_run(
    client: &reqwest::Client,
    base_url: &str,
    thread_id: &str,
    options: Option<&ThreadRunOptions>,
    access_token: Option<&str>,
) -> Result<ThreadRunResponse> {
    let headers = super::build_headers(access_token, RequestMeta::default())?;
    let response = client
        .post(super::endpoint(base_url, "/threads/run"))
        .headers(headers)
        .json(&RunBody { thread_id, options })
        .send()
        .await?;

    super::expect_json(response).await
}
