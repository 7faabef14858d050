//! Restore-or-fetch coordination for model artifacts.

use std::path::{Path, PathBuf};

use rigup_fetch::{Fetcher, HttpClient};
use rigup_verify::HashAlgorithm;
use tracing::{debug, info, warn};

use crate::backend::{CacheBackend, SaveOutcome};
use crate::cas::{cache_key, scoped_prefix};
use crate::repo::{ModelRepoDoc, ModelSource, download_url, repo_doc_url, select_sibling};
use crate::{ModelError, Result};

/// A model file on disk, with provenance.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub path:          PathBuf,
    pub sidecar:       PathBuf,
    /// Remote-cache key this artifact was restored from, when it did not
    /// have to be fetched from the model repository.
    pub restored_from: Option<String>,
}

/// Acquire the model file, preferring the remote cache over the repository.
///
/// All keys are scoped to the (model, quantization) identity, so a lookup
/// for one model can never restore another model's weights from a shared
/// prefix. A cache hit restores `<quant>.gguf` (and its sidecar) without
/// fetching a single byte from the model repository. On a miss the artifact
/// is fetched, keyed by its content hash, and saved back for future runs
/// once an exact-key probe confirmed the key is absent. Backend failures
/// degrade to the direct fetch path with a warning; they are never fatal.
pub async fn restore_or_fetch<C, B>(
    fetcher: &Fetcher<C>,
    backend: Option<&B>,
    endpoint: &str,
    model_id: &str,
    quant: &str,
    model_dir: &Path,
    key_prefix: &str,
) -> Result<ModelArtifact>
where
    C: HttpClient,
    B: CacheBackend,
{
    let file_name = format!("{}.gguf", quant.to_lowercase());
    let target = model_dir.join(&file_name);
    let sidecar = model_dir.join(format!("{}.json", quant.to_lowercase()));
    let prefix = scoped_prefix(key_prefix, model_id, quant);

    if let Some(backend) = backend {
        match backend.restore(None, &prefix, model_dir).await {
            Ok(Some(key)) if target.is_file() => {
                info!(%key, path = %target.display(), "model restored from remote cache");
                return Ok(ModelArtifact {
                    path: target,
                    sidecar,
                    restored_from: Some(key),
                });
            }
            Ok(Some(key)) => {
                debug!(%key, "cache entry restored but lacks {file_name}, fetching instead");
            }
            Ok(None) => debug!(%prefix, "remote cache miss"),
            Err(e) => warn!(error = %e, "remote cache unavailable, falling back to direct fetch"),
        }
    }

    let artifact = fetch_model(fetcher, endpoint, model_id, quant, model_dir).await?;

    if let Some(backend) = backend {
        if let Err(e) = save_to_cache(backend, &artifact, &prefix).await {
            warn!(error = %e, "failed to save model to remote cache");
        }
    }

    Ok(artifact)
}

/// Fetch the model file from the repository: resolve the document, pick the
/// quantization sibling, stream it down, and write the provenance sidecar.
pub async fn fetch_model<C: HttpClient>(
    fetcher: &Fetcher<C>,
    endpoint: &str,
    model_id: &str,
    quant: &str,
    model_dir: &Path,
) -> Result<ModelArtifact> {
    let doc_text = fetcher.fetch_text(&repo_doc_url(endpoint, model_id)).await?;
    let doc = ModelRepoDoc::parse(&doc_text)?;
    let sibling = select_sibling(&doc, quant)?;

    let target = model_dir.join(format!("{}.gguf", quant.to_lowercase()));
    let url = download_url(endpoint, &doc.model_id, &sibling.rfilename);
    info!(model_id, rfilename = %sibling.rfilename, "fetching model from repository");
    let digest = fetcher
        .download_to(&url, &target, HashAlgorithm::Sha256)
        .await?;
    debug!(%digest, path = %target.display(), "model downloaded");

    let source = ModelSource {
        model_id:  doc.model_id.clone(),
        rfilename: sibling.rfilename.clone(),
        endpoint:  endpoint.trim_end_matches('/').to_string(),
    };
    let sidecar = model_dir.join(format!("{}.json", quant.to_lowercase()));
    let body = serde_json::to_vec_pretty(&source).map_err(ModelError::Decode)?;
    tokio::fs::write(&sidecar, body)
        .await
        .map_err(|e| ModelError::Io {
            path:   sidecar.clone(),
            source: e,
        })?;

    Ok(ModelArtifact {
        path: target,
        sidecar,
        restored_from: None,
    })
}

async fn save_to_cache<B: CacheBackend>(
    backend: &B,
    artifact: &ModelArtifact,
    prefix: &str,
) -> std::result::Result<(), B::Error> {
    // The key addresses the model payload; the sidecar rides along in the
    // saved file set.
    let key = match cache_key(prefix, &[artifact.path.clone()]) {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "could not derive cache key, skipping save");
            return Ok(());
        }
    };

    if backend.probe(&key).await? {
        debug!(%key, "exact key already cached, skipping save");
        return Ok(());
    }

    let paths = vec![artifact.path.clone(), artifact.sidecar.clone()];
    match backend.save(&paths, &key).await? {
        SaveOutcome::Saved => info!(%key, "model saved to remote cache"),
        SaveOutcome::AlreadyExists => debug!(%key, "lost save race, first writer wins"),
    }
    Ok(())
}
