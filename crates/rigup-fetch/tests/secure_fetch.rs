use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use bytes::Bytes;
use rigup_fetch::{ByteStream, FetchError, Fetcher, HttpClient};
use rigup_verify::HashAlgorithm;

#[derive(Debug)]
struct MockError(String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

/// Transport over canned in-memory bodies. A `!fail` marker body makes the
/// stream break after its first chunk.
#[derive(Default)]
struct MemoryClient {
    bodies: HashMap<String, Vec<u8>>,
    broken: Vec<String>,
}

impl MemoryClient {
    fn body(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), bytes.into());
        self
    }

    fn broken(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), bytes.into());
        self.broken.push(url.to_string());
        self
    }
}

impl HttpClient for MemoryClient {
    type Error = MockError;

    async fn get_text(&self, url: &str) -> Result<String, Self::Error> {
        self.bodies
            .get(url)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .ok_or_else(|| MockError(format!("404: {url}")))
    }

    async fn stream(&self, url: &str) -> Result<ByteStream<Self::Error>, Self::Error> {
        let body = self
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| MockError(format!("404: {url}")))?;
        let total = body.len() as u64;

        let mut chunks: Vec<Result<Bytes, MockError>> = body
            .chunks(4)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        if self.broken.iter().any(|u| u == url) {
            chunks.truncate(1);
            chunks.push(Err(MockError("connection reset".to_string())));
        }

        Ok(ByteStream {
            total_bytes: Some(total),
            chunks:      Box::pin(futures_util::stream::iter(chunks)),
        })
    }
}

const ASSET: &str = "ollama-linux-amd64";
const ASSET_URL: &str = "https://example.com/ollama-linux-amd64";
const SUM_NAME: &str = "sha256sum.txt";
const SUM_URL: &str = "https://example.com/sha256sum.txt";

const BODY: &[u8] = b"pretend this is a binary";

fn digest_of(body: &[u8], algo: HashAlgorithm) -> String {
    let mut hasher = algo.hasher();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

fn leftover_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn verified_download_lands_at_destination() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = format!("{}  {ASSET}\n", digest_of(BODY, HashAlgorithm::Sha256));
    let client = MemoryClient::default()
        .body(ASSET_URL, BODY)
        .body(SUM_URL, manifest);

    let path = Fetcher::new(client)
        .fetch_and_verify(ASSET, ASSET_URL, SUM_NAME, SUM_URL, dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join(ASSET));
    assert_eq!(std::fs::read(&path).unwrap(), BODY);
    assert_eq!(leftover_files(dir.path()), vec![ASSET.to_string()]);
}

#[tokio::test]
async fn digest_family_follows_manifest_name() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = format!("{}  {ASSET}\n", digest_of(BODY, HashAlgorithm::Sha512));
    let client = MemoryClient::default()
        .body(ASSET_URL, BODY)
        .body("https://example.com/sha512sum.txt", manifest);

    Fetcher::new(client)
        .fetch_and_verify(
            ASSET,
            ASSET_URL,
            "sha512sum.txt",
            "https://example.com/sha512sum.txt",
            dir.path(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn tampered_body_is_rejected_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let mut tampered = BODY.to_vec();
    tampered[7] ^= 0x01;
    let manifest = format!("{}  {ASSET}\n", digest_of(BODY, HashAlgorithm::Sha256));
    let client = MemoryClient::default()
        .body(ASSET_URL, tampered)
        .body(SUM_URL, manifest);

    let err = Fetcher::new(client)
        .fetch_and_verify(ASSET, ASSET_URL, SUM_NAME, SUM_URL, dir.path())
        .await
        .unwrap_err();

    match err {
        FetchError::HashMismatch {
            expected, computed, ..
        } => assert_ne!(expected, computed),
        other => panic!("expected hash mismatch, got {other}"),
    }
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn missing_manifest_entry_is_distinct_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = "abc123  some-other-file\n".to_string();
    let client = MemoryClient::default()
        .body(ASSET_URL, BODY)
        .body(SUM_URL, manifest);

    let err = Fetcher::new(client)
        .fetch_and_verify(ASSET, ASSET_URL, SUM_NAME, SUM_URL, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::ManifestEntryMissing { .. }));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn broken_stream_discards_partial() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = format!("{}  {ASSET}\n", digest_of(BODY, HashAlgorithm::Sha256));
    let client = MemoryClient::default()
        .broken(ASSET_URL, BODY)
        .body(SUM_URL, manifest);

    let err = Fetcher::new(client)
        .fetch_and_verify(ASSET, ASSET_URL, SUM_NAME, SUM_URL, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Download(_)));
    assert!(leftover_files(dir.path()).is_empty());
}

#[tokio::test]
async fn unknown_digest_family_fails_before_any_download() {
    let dir = tempfile::tempdir().unwrap();
    // No bodies registered: reaching the transport would fail loudly.
    let client = MemoryClient::default();

    let err = Fetcher::new(client)
        .fetch_and_verify(ASSET, ASSET_URL, "md5sum.txt", SUM_URL, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Verify(_)));
    assert!(leftover_files(dir.path()).is_empty());
}
