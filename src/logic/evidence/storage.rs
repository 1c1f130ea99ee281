//! Evidence file storage
//!
//! Images are written once under a time-based, collision-resistant name and
//! never touched again.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Route prefix the evidence directory is served under
pub const PUBLIC_PREFIX: &str = "/static";

#[derive(Debug, Clone)]
pub struct EvidenceStore {
    dir: PathBuf,
    public_base_url: String,
}

impl EvidenceStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `evidence_<unix seconds>_<8 hex>.<ext>`
    pub fn storage_key(captured_at: DateTime<Utc>, extension: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("evidence_{}_{}.{}", captured_at.timestamp(), &suffix[..8], extension)
    }

    /// Externally resolvable link to a stored image
    pub fn public_url(&self, storage_key: &str) -> String {
        format!("{}{}/{}", self.public_base_url, PUBLIC_PREFIX, storage_key)
    }

    /// Write `bytes` under `storage_key`. Fails rather than overwrite an
    /// existing file; a partially written file is removed.
    pub async fn write(&self, storage_key: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(storage_key);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            fs::remove_file(&path).await.ok();
            return Err(e);
        }

        Ok(path)
    }
}
