use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::{debug, info};

/// Per-axis virtual-zero offsets: `virtual = absolute - offset`.
///
/// This map is the single owner of offset state; presentation layers only
/// display the derived values. Offsets are persisted as a JSON mapping
/// from axis index to offset. A missing file reads as all-zero offsets.
pub struct VirtualZeroMap {
    offsets: RwLock<HashMap<usize, f64>>,
    path: Option<PathBuf>,
}

impl VirtualZeroMap {
    /// In-memory map without persistence.
    pub fn new() -> Self {
        Self {
            offsets: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Loads offsets from `path`, which is also where `save` writes.
    pub async fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let offsets = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no offsets file, starting from zero");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            offsets: RwLock::new(offsets),
            path: Some(path),
        })
    }

    pub async fn offset(&self, axis: usize) -> f64 {
        self.offsets.read().await.get(&axis).copied().unwrap_or(0.0)
    }

    /// Declares the current absolute position to be virtual zero.
    pub async fn set_zero(&self, axis: usize, absolute_position: f64) {
        info!(axis, offset = absolute_position, "virtual zero set");
        self.offsets.write().await.insert(axis, absolute_position);
    }

    pub async fn reset(&self, axis: usize) {
        info!(axis, "virtual zero reset");
        self.offsets.write().await.remove(&axis);
    }

    pub async fn to_virtual(&self, axis: usize, absolute: f64) -> f64 {
        absolute - self.offset(axis).await
    }

    pub async fn to_absolute(&self, axis: usize, virtual_position: f64) -> f64 {
        virtual_position + self.offset(axis).await
    }

    /// Writes the mapping atomically (temp file, then rename). A no-op
    /// for maps created without a backing file.
    pub async fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot = self.offsets.read().await.clone();
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "offsets saved");
        Ok(())
    }
}

impl Default for VirtualZeroMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn virtual_position_tracks_offset() {
        let map = VirtualZeroMap::new();
        assert_eq!(map.to_virtual(0, 5.0).await, 5.0);

        map.set_zero(0, 2.5).await;
        assert_eq!(map.to_virtual(0, 5.0).await, 2.5);
        assert_eq!(map.to_absolute(0, 0.0).await, 2.5);

        map.reset(0).await;
        assert_eq!(map.to_virtual(0, 5.0).await, 5.0);
    }

    #[tokio::test]
    async fn offsets_are_independent_per_axis() {
        let map = VirtualZeroMap::new();
        map.set_zero(1, 10.0).await;
        assert_eq!(map.offset(0).await, 0.0);
        assert_eq!(map.offset(1).await, 10.0);
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offsets.json");

        let map = VirtualZeroMap::load(&path).await.unwrap();
        map.set_zero(0, 1.25).await;
        map.set_zero(3, -4.0).await;
        map.save().await.unwrap();

        let restored = VirtualZeroMap::load(&path).await.unwrap();
        assert_eq!(restored.offset(0).await, 1.25);
        assert_eq!(restored.offset(3).await, -4.0);
        assert_eq!(restored.offset(1).await, 0.0);
    }

    #[tokio::test]
    async fn missing_file_means_all_zero() {
        let dir = tempfile::tempdir().unwrap();
        let map = VirtualZeroMap::load(dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(map.offset(2).await, 0.0);
    }
}
