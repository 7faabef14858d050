use tracing::debug;

use crate::types::Release;
use crate::{ReleaseError, Result};

// Catalog page size cap; the API serves at most 100 entries per page.
const PER_PAGE: usize = 100;

/// Seam over the release listing, so install flows can run against canned
/// catalogs the same way downloads run against in-memory transports.
pub trait ReleaseSource: Send + Sync {
    fn list_releases(&self) -> impl Future<Output = Result<Vec<Release>>> + Send;
}

/// Read-only client for a fixed owner/repository release listing.
pub struct ReleaseCatalog {
    client:   reqwest::Client,
    base_url: String,
    owner:    String,
    repo:     String,
    token:    Option<String>,
}

impl ReleaseCatalog {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.github.com".to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token,
        }
    }

    /// Point the client at a different catalog host. Used by tests and
    /// mirror setups.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// List every release, paging until the catalog is exhausted.
    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        let mut releases = Vec::new();
        let mut page = 1usize;

        loop {
            let url = format!(
                "{}/repos/{}/{}/releases?per_page={PER_PAGE}&page={page}",
                self.base_url, self.owner, self.repo
            );
            debug!(%url, "fetching release catalog page");

            let mut request = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.github+json")
                .header("User-Agent", "rigup");
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(ReleaseError::Http)?;
            if !response.status().is_success() {
                return Err(ReleaseError::Status(response.status()));
            }

            let batch: Vec<Release> = response.json().await.map_err(ReleaseError::Decode)?;
            let exhausted = batch.len() < PER_PAGE;
            releases.extend(batch);

            if exhausted {
                break;
            }
            page += 1;
        }

        debug!(count = releases.len(), "release catalog listed");
        Ok(releases)
    }
}

impl ReleaseSource for ReleaseCatalog {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        ReleaseCatalog::list_releases(self).await
    }
}
