//! Model repository document and sibling selection.

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// One file listed in a model repository.
#[derive(Debug, Clone, Deserialize)]
pub struct Sibling {
    pub rfilename: String,
}

/// The slice of the repository document the pipeline consumes. The document
/// carries far more (tags, card data, download counts); everything unknown
/// is ignored by the validating parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelRepoDoc {
    #[serde(rename = "modelId")]
    pub model_id: String,
    #[serde(default)]
    pub siblings: Vec<Sibling>,
}

impl ModelRepoDoc {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ModelError::Decode)
    }
}

/// Provenance sidecar written next to a fetched model file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSource {
    pub model_id:  String,
    pub rfilename: String,
    pub endpoint:  String,
}

/// URL of the repository document for a model.
pub fn repo_doc_url(endpoint: &str, model_id: &str) -> String {
    format!("{}/api/models/{model_id}", endpoint.trim_end_matches('/'))
}

/// Resolve-by-filename download URL; the query flag requests attachment-style
/// transfer.
pub fn download_url(endpoint: &str, model_id: &str, rfilename: &str) -> String {
    format!(
        "{}/{model_id}/resolve/main/{rfilename}?download=true",
        endpoint.trim_end_matches('/')
    )
}

/// Quantization token of a `.gguf` filename: the segment between the last
/// two dots (`model.Q4_K_M.gguf` → `Q4_K_M`).
fn quant_token(rfilename: &str) -> Option<&str> {
    let stem = rfilename.strip_suffix(".gguf")?;
    let (_, token) = stem.rsplit_once('.')?;
    Some(token)
}

/// Pick the unique sibling carrying the requested quantization method.
/// Zero and multiple candidates are both failures.
pub fn select_sibling<'a>(doc: &'a ModelRepoDoc, quant: &str) -> Result<&'a Sibling> {
    let matched: Vec<&Sibling> = doc
        .siblings
        .iter()
        .filter(|s| quant_token(&s.rfilename).is_some_and(|t| t.eq_ignore_ascii_case(quant)))
        .collect();

    match matched.as_slice() {
        [single] => Ok(single),
        _ => Err(ModelError::QuantNotFound {
            model_id: doc.model_id.clone(),
            quant:    quant.to_string(),
            matched:  matched.len(),
        }),
    }
}
