use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, RANGE};
use url::Url;

use super::{ObjectStore, StoreError, StoreResult};
use crate::types::{ObjectLocation, ObjectMetadata};

const USER_AGENT: &str = concat!("tabular-inspector/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`HttpObjectStore`].
#[derive(Debug, Clone)]
pub struct HttpStoreOptions {
    /// Base URL; objects live at `<endpoint>/<bucket>/<key>` (path-style addressing).
    pub endpoint: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra attempts after a transient failure (connect/timeout errors, HTTP 5xx).
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub retry_backoff: Duration,
    pub user_agent: String,
}

impl HttpStoreOptions {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(200),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// S3-compatible store reached over plain HTTP(S).
///
/// Uses `HEAD` for the metadata probe and `GET` with `Range: bytes=START-END` for partial
/// reads. Request signing is expected to happen in front of this store (public buckets,
/// a signing proxy, or pre-authorized endpoints).
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: Client,
    opts: HttpStoreOptions,
}

impl HttpObjectStore {
    pub fn new(opts: HttpStoreOptions) -> StoreResult<Self> {
        let client = Client::builder()
            .user_agent(opts.user_agent.clone())
            .timeout(opts.timeout)
            .build()
            .map_err(|e| StoreError::Remote(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, opts })
    }

    /// URL of `location`, with each key segment percent-encoded.
    pub fn object_url(&self, location: &ObjectLocation) -> StoreResult<Url> {
        let mut url = self.opts.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::InvalidLocation(format!(
                    "endpoint cannot be a base: {}",
                    self.opts.endpoint
                ))
            })?;
            segments.pop_if_empty();
            segments.push(&location.bucket);
            for segment in location.key.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    fn send(
        &self,
        location: &ObjectLocation,
        build: impl Fn() -> RequestBuilder,
    ) -> StoreResult<Response> {
        let mut attempt = 0u32;
        loop {
            let retry = attempt < self.opts.max_retries;
            match build().send() {
                Ok(res) if res.status() == StatusCode::NOT_FOUND => {
                    return Err(StoreError::not_found(location));
                }
                Ok(res) if res.status().is_server_error() && retry => {}
                Ok(res) if res.status().is_success() => return Ok(res),
                Ok(res) => {
                    return Err(StoreError::Remote(format!(
                        "HTTP {} for {location}",
                        res.status()
                    )));
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && retry => {}
                Err(e) => return Err(StoreError::Remote(format!("request failed: {e}"))),
            }
            thread::sleep(
                self.opts
                    .retry_backoff
                    .saturating_mul(2u32.saturating_pow(attempt)),
            );
            attempt += 1;
        }
    }
}

impl ObjectStore for HttpObjectStore {
    fn head(&self, location: &ObjectLocation) -> StoreResult<ObjectMetadata> {
        let url = self.object_url(location)?;
        let res = self.send(location, || self.client.head(url.clone()))?;
        let headers = res.headers();
        let size_bytes = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .ok_or_else(|| StoreError::Remote(format!("missing Content-Length for {location}")))?;
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(ObjectMetadata {
            size_bytes,
            content_type,
        })
    }

    fn get_range(
        &self,
        location: &ObjectLocation,
        start: u64,
        end_inclusive: u64,
    ) -> StoreResult<Vec<u8>> {
        let url = self.object_url(location)?;
        let res = self.send(location, || {
            self.client
                .get(url.clone())
                .header(RANGE, format!("bytes={start}-{end_inclusive}"))
        })?;
        let ranged = res.status() == StatusCode::PARTIAL_CONTENT;
        let bytes = res
            .bytes()
            .map_err(|e| StoreError::Remote(format!("read response failed: {e}")))?;

        // A server that ignores Range answers 200 with the whole body.
        let mut out = bytes.to_vec();
        if !ranged {
            let start = usize::try_from(start).unwrap_or(usize::MAX).min(out.len());
            out.drain(..start);
        }
        let want = usize::try_from(end_inclusive.saturating_sub(start).saturating_add(1))
            .unwrap_or(usize::MAX);
        out.truncate(want);
        Ok(out)
    }

    fn get(&self, location: &ObjectLocation) -> StoreResult<Vec<u8>> {
        let url = self.object_url(location)?;
        let res = self.send(location, || self.client.get(url.clone()))?;
        let bytes = res
            .bytes()
            .map_err(|e| StoreError::Remote(format!("read response failed: {e}")))?;
        Ok(bytes.to_vec())
    }
}
