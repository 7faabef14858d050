use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// A response body as a chunk stream plus the advertised length, when known.
pub struct ByteStream<E> {
    pub total_bytes: Option<u64>,
    pub chunks:      BoxStream<Result<Bytes, E>>,
}

/// Transport seam for the downloader.
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a small text body (checksum manifests, JSON documents).
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Open a streaming GET for a large body.
    fn stream(&self, url: &str)
    -> impl Future<Output = Result<ByteStream<Self::Error>, Self::Error>> + Send;
}

/// Production transport backed by reqwest.
#[derive(Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    async fn get_text(&self, url: &str) -> Result<String, Self::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    async fn stream(&self, url: &str) -> Result<ByteStream<Self::Error>, Self::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let total_bytes = response.content_length();
        Ok(ByteStream {
            total_bytes,
            chunks: Box::pin(response.bytes_stream()),
        })
    }
}
