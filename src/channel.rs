use crate::errors::TrackerError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const DOWNLOAD_FILE_NAME: &str = "data.json";

/// Result of handing the saved document to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Overwritten in place.
    Written { path: PathBuf },
    /// The caller has to hand the bytes back to the user as a new file.
    Download { file_name: String, bytes: Vec<u8> },
}

/// Where the document comes from and goes to. Which implementation is used
/// is decided when the user picks a file, not on every save.
#[async_trait]
pub trait ByteChannel: Send + Sync {
    fn describe(&self) -> String;

    /// Whether `write` replaces the source in place.
    fn direct_save(&self) -> bool;

    async fn read(&self) -> Result<Vec<u8>, TrackerError>;

    async fn write(&self, bytes: Vec<u8>) -> Result<SaveOutcome, TrackerError>;
}

/// Persistent handle on a local file.
#[derive(Debug, Clone)]
pub struct FileChannel {
    path: PathBuf,
}

impl FileChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ByteChannel for FileChannel {
    fn describe(&self) -> String {
        format!("Connected to {} (direct save enabled)", self.path.display())
    }

    fn direct_save(&self) -> bool {
        true
    }

    async fn read(&self) -> Result<Vec<u8>, TrackerError> {
        debug!(path = %self.path.display(), "reading data file");
        Ok(fs::read(&self.path).await?)
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<SaveOutcome, TrackerError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, bytes).await?;
        Ok(SaveOutcome::Written {
            path: self.path.clone(),
        })
    }
}

/// A file the user uploaded once. It can be re-read but not written back,
/// so saving produces a download instead.
#[derive(Debug, Clone)]
pub struct UploadChannel {
    name: String,
    bytes: Vec<u8>,
}

impl UploadChannel {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl ByteChannel for UploadChannel {
    fn describe(&self) -> String {
        format!("Loaded {} (saving downloads a new file)", self.name)
    }

    fn direct_save(&self) -> bool {
        false
    }

    async fn read(&self) -> Result<Vec<u8>, TrackerError> {
        Ok(self.bytes.clone())
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<SaveOutcome, TrackerError> {
        Ok(SaveOutcome::Download {
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            bytes,
        })
    }
}
