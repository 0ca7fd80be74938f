use bytes::{Bytes, BytesMut};
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::api::RequestMeta;
use crate::error::{GigaChatError, Result};
use crate::models::{Chat, ChatCompletionChunk};

const EVENT_STREAM: &str = "text/event-stream";

/// Requests a streaming chat completion and decodes the server-sent
/// events into [`ChatCompletionChunk`]s.
///
/// Status and content type are checked before the first chunk is
/// yielded, so authentication failures surface from this call rather
/// than from the stream.
pub async fn call(
    client: &reqwest::Client,
    base_url: &str,
    chat: &Chat,
    access_token: Option<&str>,
    meta: RequestMeta<'_>,
) -> Result<impl Stream<Item = Result<ChatCompletionChunk>>> {
    let payload = request_payload(chat);
    let mut headers = super::build_headers(access_token, meta)?;
    headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let response = client
        .post(super::endpoint(base_url, "/chat/completions"))
        .headers(headers)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        let url = response.url().to_string();
        let message = response.text().await.unwrap_or_default();
        return Err(super::status_error(status, url, message));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if content_type != EVENT_STREAM {
        return Err(GigaChatError::UnexpectedContentType {
            expected: EVENT_STREAM.to_string(),
            got: content_type,
        });
    }

    Ok(sse_stream(response.bytes_stream().boxed()))
}

fn request_payload(chat: &Chat) -> Chat {
    let mut payload = chat.clone();
    payload.stream = Some(true);
    payload
}

/// Outcome of one SSE line.
enum SseEvent {
    Chunk(Box<ChatCompletionChunk>),
    Done,
    Skip,
}

fn parse_line(line: &str) -> Result<SseEvent> {
    let Some(data) = line.strip_prefix("data: ") else {
        // Comments, event names and blank keep-alive lines.
        return Ok(SseEvent::Skip);
    };
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }
    let chunk = serde_json::from_str(data)?;
    Ok(SseEvent::Chunk(Box::new(chunk)))
}

struct SseState {
    stream: BoxStream<'static, reqwest::Result<Bytes>>,
    buf: BytesMut,
    done: bool,
}

/// Line-buffers the upstream byte stream and decodes `data:` events.
/// The stream ends on `[DONE]` or upstream EOF.
fn sse_stream(
    byte_stream: BoxStream<'static, reqwest::Result<Bytes>>,
) -> impl Stream<Item = Result<ChatCompletionChunk>> {
    let state = SseState {
        stream: byte_stream,
        buf: BytesMut::new(),
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            if let Some(pos) = st.buf.iter().position(|&b| b == b'\n') {
                let line = st.buf.split_to(pos + 1);
                let line = String::from_utf8_lossy(&line);
                match parse_line(line.trim_end_matches(['\r', '\n'])) {
                    Ok(SseEvent::Chunk(chunk)) => return Some((Ok(*chunk), st)),
                    Ok(SseEvent::Done) => {
                        st.done = true;
                        return None;
                    }
                    Ok(SseEvent::Skip) => continue,
                    Err(e) => {
                        st.done = true;
                        return Some((Err(e), st));
                    }
                }
            }

            match st.stream.next().await {
                Some(Ok(bytes)) => st.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(e.into()), st));
                }
                None => {
                    st.done = true;
                    return None;
                }
            }
        }
    })
}
