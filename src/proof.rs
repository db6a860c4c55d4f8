use std::path::Path;

use crate::constants::ALLOWED_PROOF_EXTENSIONS;
use crate::error::ClientError;

/// Admits a transaction to the proof-upload flow. Constructible only by the
/// lifecycle manager, and only while the transaction is pending, so the
/// flow is unreachable for settled transactions rather than rejected.
#[derive(Debug, Clone, Copy)]
pub struct ProofRequest {
    transaction_id: i64,
}

impl ProofRequest {
    pub(crate) fn new(transaction_id: i64) -> Self {
        ProofRequest { transaction_id }
    }

    pub fn transaction_id(&self) -> i64 {
        self.transaction_id
    }
}

/// One open proof-upload modal. Phase one stages an image URL in blob
/// storage; phase two attaches it to the transaction. The upload has no
/// durable effect until the attach succeeds: dropping this value between
/// the phases discards the staged URL with no transaction mutation.
#[derive(Debug)]
pub struct ProofUpload {
    transaction_id: i64,
    staged_url: Option<String>,
}

impl ProofUpload {
    pub(crate) fn new(transaction_id: i64) -> Self {
        ProofUpload {
            transaction_id,
            staged_url: None,
        }
    }

    pub fn transaction_id(&self) -> i64 {
        self.transaction_id
    }

    pub fn staged_url(&self) -> Option<&str> {
        self.staged_url.as_deref()
    }

    /// Holds the freshly uploaded URL, replacing any previous one. A single
    /// staged URL exists at a time; re-staging is last-write-wins.
    pub(crate) fn stage(&mut self, url: String) {
        self.staged_url = Some(url);
    }
}

/// Reads an image file into memory for staging. Non-image files are turned
/// away before any network traffic.
pub async fn read_proof_file(path: &Path) -> Result<(String, Vec<u8>), ClientError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    if !extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_PROOF_EXTENSIONS.contains(&ext))
    {
        return Err(ClientError::Validation(format!(
            "Unsupported proof file type: {}",
            path.display()
        )));
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("proof")
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| ClientError::Validation(format!("Cannot read {}: {}", path.display(), err)))?;

    Ok((file_name, bytes))
}
