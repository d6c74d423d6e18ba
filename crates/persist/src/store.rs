//! File-backed element store.
//!
//! Layout inside the store directory:
//! ```text
//! store.meta.json  - schema version, element count, data digest
//! elements.nbt     - append-only run of encoded elements
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use voxelesque_nbt::{DecodeConfig, Element, NbtError, ReadError};

/// Current store schema version.
const STORE_SCHEMA_VERSION: u32 = 1;

const META_FILE: &str = "store.meta.json";
const DATA_FILE: &str = "elements.nbt";

/// Errors from file-backed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoding error: {0}")]
    Codec(#[from] NbtError),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
}

/// Metadata stored in store.meta.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMeta {
    pub schema_version: u32,
    pub element_count: u64,
    pub data_len: u64,
    /// SHA-256 of elements.nbt, lowercase hex.
    pub sha256: String,
}

/// Everything a load recovered, plus what it had to skip.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub elements: Vec<Element>,
    pub skipped: Vec<ReadError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Append-only store of encoded elements with integrity metadata.
pub struct ElementStore {
    root: PathBuf,
    meta: StoreMeta,
    /// Running digest of the data file as this handle has seen it.
    hasher: Sha256,
    config: DecodeConfig,
}

impl ElementStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(path, DecodeConfig::default())
    }

    /// Open or create a store, decoding with the given limits.
    pub fn open_with(path: impl AsRef<Path>, config: DecodeConfig) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        let _span = tracing::info_span!("store_open", root = %root.display()).entered();

        let meta_path = root.join(META_FILE);
        let data_path = root.join(DATA_FILE);

        let (meta, hasher) = if meta_path.exists() {
            let meta: StoreMeta = serde_json::from_reader(std::fs::File::open(&meta_path)?)?;
            if meta.schema_version != STORE_SCHEMA_VERSION {
                return Err(StoreError::SchemaMismatch {
                    file_version: meta.schema_version,
                    expected_version: STORE_SCHEMA_VERSION,
                });
            }
            let mut hasher = Sha256::new();
            if data_path.exists() {
                hasher.update(std::fs::read(&data_path)?);
            }
            tracing::debug!(elements = meta.element_count, "reopened store");
            (meta, hasher)
        } else {
            let hasher = Sha256::new();
            let meta = StoreMeta {
                schema_version: STORE_SCHEMA_VERSION,
                element_count: 0,
                data_len: 0,
                sha256: hex_digest(&hasher),
            };
            std::fs::File::create(&data_path)?;
            serde_json::to_writer_pretty(std::fs::File::create(&meta_path)?, &meta)?;
            tracing::debug!("created store");
            (meta, hasher)
        };

        Ok(Self {
            root,
            meta,
            hasher,
            config,
        })
    }

    /// Append one element to the data file.
    ///
    /// Refuses to extend a data file whose contents no longer match the
    /// recorded digest. The data file is synced before the metadata is
    /// rewritten, so a crash in between leaves data the metadata does not
    /// describe; [`rehash`](Self::rehash) adopts it again.
    pub fn append(&mut self, element: &Element) -> Result<(), StoreError> {
        self.append_all(std::slice::from_ref(element))
    }

    /// Append several elements in one write.
    pub fn append_all(&mut self, elements: &[Element]) -> Result<(), StoreError> {
        if elements.is_empty() {
            return Ok(());
        }
        let current = hex_digest(&self.hasher);
        if current != self.meta.sha256 {
            return Err(StoreError::IntegrityMismatch {
                expected: self.meta.sha256.clone(),
                actual: current,
            });
        }

        let mut bytes = Vec::new();
        for element in elements {
            element.encode_into(&mut bytes)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(DATA_FILE))?;
        file.write_all(&bytes)?;
        file.sync_data()?;

        self.hasher.update(&bytes);
        self.meta.element_count += elements.len() as u64;
        self.meta.data_len += bytes.len() as u64;
        self.meta.sha256 = hex_digest(&self.hasher);
        self.save_meta()?;

        tracing::debug!(
            appended = elements.len(),
            bytes = bytes.len(),
            total = self.meta.element_count,
            "appended elements"
        );
        Ok(())
    }

    /// Decode every element in the data file.
    ///
    /// Malformed elements are reported in the result rather than failing the
    /// load; only I/O problems are errors here.
    pub fn load(&self) -> Result<LoadReport, StoreError> {
        let _span = tracing::info_span!("store_load").entered();
        let data = std::fs::read(self.root.join(DATA_FILE))?;
        Ok(self.load_bytes(&data))
    }

    fn load_bytes(&self, data: &[u8]) -> LoadReport {
        let mut report = LoadReport::default();
        for result in self.config.reader(data) {
            match result {
                Ok(element) => report.elements.push(element),
                Err(err) => {
                    tracing::warn!(offset = err.offset, error = %err.error, "skipped element");
                    report.skipped.push(err);
                }
            }
        }
        tracing::debug!(
            loaded = report.elements.len(),
            skipped = report.skipped.len(),
            "load complete"
        );
        report
    }

    /// Rebuild the metadata from the data file as it is on disk.
    ///
    /// Recounts decodable elements and records the file's current length and
    /// digest, so appends are accepted again after an interrupted write or a
    /// deliberate edit. The returned report lists anything that failed to
    /// decode; those bytes stay in the file.
    pub fn rehash(&mut self) -> Result<LoadReport, StoreError> {
        let _span = tracing::info_span!("store_rehash").entered();
        let data = std::fs::read(self.root.join(DATA_FILE))?;
        let report = self.load_bytes(&data);

        let mut hasher = Sha256::new();
        hasher.update(&data);
        self.meta.element_count = report.elements.len() as u64;
        self.meta.data_len = data.len() as u64;
        self.meta.sha256 = hex_digest(&hasher);
        self.hasher = hasher;
        self.save_meta()?;

        tracing::info!(
            elements = self.meta.element_count,
            bytes = self.meta.data_len,
            skipped = report.skipped.len(),
            "rebuilt store metadata"
        );
        Ok(report)
    }

    /// Check the data file on disk against the recorded length and digest.
    pub fn verify_integrity(&self) -> Result<(), StoreError> {
        let data = std::fs::read(self.root.join(DATA_FILE))?;
        if data.len() as u64 != self.meta.data_len {
            return Err(StoreError::IntegrityMismatch {
                expected: format!("{} bytes", self.meta.data_len),
                actual: format!("{} bytes", data.len()),
            });
        }
        let actual = sha256_hex(&data);
        if actual != self.meta.sha256 {
            return Err(StoreError::IntegrityMismatch {
                expected: self.meta.sha256.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Get the path to the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the metadata.
    pub fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    /// Path of the element data file.
    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    fn save_meta(&self) -> Result<(), StoreError> {
        let path = self.root.join(META_FILE);
        serde_json::to_writer_pretty(std::fs::File::create(path)?, &self.meta)?;
        Ok(())
    }
}

fn hex_digest(hasher: &Sha256) -> String {
    format!("{:x}", hasher.clone().finalize())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
