//! Shared response handling for HTTP streaming backends

use async_stream::stream;
use futures::StreamExt;
use parley_core::framing::{DATA_PREFIX, DONE_SENTINEL};
use parley_core::{FragmentStream, LineBuffer, LlmError, LlmResult};

/// How a backend frames its streamed body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineFormat {
    /// `data: {json}` lines, optionally closed by `data: [DONE]`
    Sse,
    /// One JSON object per line
    Ndjson,
}

/// What one decoded line contributed
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Parsed {
    Text(String),
    Skip,
    End,
}

/// Send a request and fail unless the backend accepted it
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> LlmResult<reqwest::Response> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Http(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("{} rejected request with {}: {}", provider, status, body);
    Err(LlmError::Api {
        provider: provider.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Turn a streamed response body into text fragments
///
/// Lines are reassembled across chunk boundaries before `parse` sees them.
/// The first parse failure or transport error ends the stream.
pub(crate) fn line_fragments<F>(
    response: reqwest::Response,
    format: LineFormat,
    parse: F,
) -> FragmentStream
where
    F: Fn(&str) -> LlmResult<Parsed> + Send + 'static,
{
    Box::pin(stream! {
        let mut body = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut finished = false;

        while !finished {
            let batch = match body.next().await {
                Some(Ok(bytes)) => lines.push(&bytes),
                Some(Err(e)) => {
                    yield Err(LlmError::Stream(e.to_string()));
                    break;
                }
                None => {
                    finished = true;
                    lines.finish().into_iter().collect()
                }
            };

            for line in batch {
                let Some(payload) = payload_of(&line, format) else {
                    continue;
                };

                match parse(payload) {
                    Ok(Parsed::Text(text)) if !text.is_empty() => yield Ok(text),
                    Ok(Parsed::Text(_)) | Ok(Parsed::Skip) => {}
                    Ok(Parsed::End) => {
                        finished = true;
                        break;
                    }
                    Err(e) => {
                        yield Err(e);
                        finished = true;
                        break;
                    }
                }
            }
        }
    })
}

/// Extract the JSON payload of a line, or `None` for lines carrying nothing
fn payload_of(line: &str, format: LineFormat) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match format {
        LineFormat::Ndjson => Some(line),
        LineFormat::Sse => {
            let payload = line.strip_prefix(DATA_PREFIX)?.trim_start();
            if payload == DONE_SENTINEL {
                // Handled by the caller as an end marker
                return Some(DONE_SENTINEL);
            }
            Some(payload)
        }
    }
}

/// Map `[DONE]` to [`Parsed::End`], otherwise defer to `parse`
pub(crate) fn until_done<F>(parse: F) -> impl Fn(&str) -> LlmResult<Parsed> + Send + 'static
where
    F: Fn(&str) -> LlmResult<Parsed> + Send + 'static,
{
    move |payload| {
        if payload == DONE_SENTINEL {
            Ok(Parsed::End)
        } else {
            parse(payload)
        }
    }
}
