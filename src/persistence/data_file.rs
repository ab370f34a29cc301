use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};

use super::codec;
use crate::domain::WarehouseSnapshot;
use crate::error::{InventoryError, InventoryResult};

/// The flat file holding the whole inventory.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing or unreadable file yields no warehouses.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Vec<WarehouseSnapshot> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No data file yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                error!(error = %e, "Error loading data, starting empty");
                return Vec::new();
            }
        };

        let decoded = codec::decode(&text);
        if decoded.skipped_lines > 0 {
            warn!(skipped = decoded.skipped_lines, "Skipped malformed records while loading");
        }
        info!(warehouses = decoded.warehouses.len(), "Data loaded");
        decoded.warehouses
    }

    /// Rewrites the whole file.
    ///
    /// The content goes to a sibling temporary file, which is flushed to disk
    /// before being renamed over the target. A crash at any point leaves
    /// either the old file or the new one, never a partial write.
    #[instrument(skip(self, warehouses), fields(path = %self.path.display(), warehouses = warehouses.len()))]
    pub async fn save(&self, warehouses: &[WarehouseSnapshot]) -> InventoryResult<()> {
        let text = codec::encode(warehouses);
        let tmp = self.tmp_path();

        if let Err(e) = write_and_replace(&tmp, &self.path, text.as_bytes()).await {
            error!(error = %e, "Error saving data");
            let _ = fs::remove_file(&tmp).await;
            return Err(InventoryError::PersistenceFailure(format!(
                "{}: {}",
                self.path.display(),
                e
            )));
        }
        debug!(bytes = text.len(), "Data saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "inventory".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

async fn write_and_replace(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, target).await
}
