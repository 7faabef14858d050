use serde::Deserialize;

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// A tagged release and its assets, as listed by the catalog.
///
/// Unknown fields in the catalog document are ignored; the two fields here
/// are the only ones the pipeline consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}
