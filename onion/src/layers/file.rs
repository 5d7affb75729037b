//! Configuration files, folder discovery and polling refresh.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::StreamLayer;
use crate::cipher::Cipher;
use crate::decoder::DecoderRegistry;
use crate::layer::LayerUpdates;
use crate::{ConfigMap, Layer, OnionError, OnionResult};

/// A layer read from a file whose extension names its format.
///
/// The file is read once on construction. [`FileLayer::refresh`] rereads it
/// and [`FileLayer::spawn_polling`] does so whenever the file's modification
/// time or size changes.
pub struct FileLayer {
    path: PathBuf,
    stream: StreamLayer,
    cipher: Option<Arc<dyn Cipher>>,
}

impl FileLayer {
    /// Open and decode `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::File`] when the file cannot be opened, has no
    /// extension or cannot be decoded.
    pub fn open(
        path: impl AsRef<Path>,
        cipher: Option<Arc<dyn Cipher>>,
        decoders: &DecoderRegistry,
    ) -> OnionResult<Self> {
        let path = path.as_ref();
        let format = extension(path)?;
        let mut file = File::open(path).map_err(|err| OnionError::file(path, err))?;
        let stream = StreamLayer::new(
            path.display().to_string(),
            &format,
            &mut file,
            cipher.clone(),
            decoders,
        )
        .map_err(|err| OnionError::file(path, err))?;
        debug!(path = %path.display(), format = %format, "loaded configuration file");
        Ok(Self {
            path: path.to_path_buf(),
            stream,
            cipher,
        })
    }

    /// Load the first decodable `<name>.<ext>` file in `folder`.
    ///
    /// Candidates are tried in file-name order; files that fail to decode,
    /// or whose extension has no decoder, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::File`] when `folder` cannot be listed and
    /// [`OnionError::NoConfigFound`] when no candidate loads.
    pub fn discover(
        folder: impl AsRef<Path>,
        name: &str,
        cipher: Option<Arc<dyn Cipher>>,
        decoders: &DecoderRegistry,
    ) -> OnionResult<Self> {
        let folder = folder.as_ref();
        let entries = fs::read_dir(folder).map_err(|err| OnionError::file(folder, err))?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_named(path, name))
            .collect();
        candidates.sort();

        for candidate in candidates {
            match Self::open(&candidate, cipher.clone(), decoders) {
                Ok(layer) => return Ok(layer),
                Err(err) => debug!(path = %candidate.display(), error = %err, "skipping candidate"),
            }
        }
        Err(Arc::new(OnionError::NoConfigFound {
            folder: folder.to_path_buf(),
            name: name.to_owned(),
        }))
    }

    /// Path the layer reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reread the file and publish its content.
    ///
    /// This reads the file synchronously; inside a runtime prefer
    /// [`FileLayer::refresh_async`].
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::File`]; the failure is also published so
    /// registries report it and keep the previous snapshot.
    pub fn refresh(&self) -> OnionResult<()> {
        let bytes = fs::read(&self.path);
        self.apply(bytes)
    }

    /// Reread the file without blocking the runtime and publish its content.
    ///
    /// # Errors
    ///
    /// Same as [`FileLayer::refresh`].
    pub async fn refresh_async(&self) -> OnionResult<()> {
        let bytes = tokio::fs::read(&self.path).await;
        self.apply(bytes)
    }

    fn apply(&self, read: std::io::Result<Vec<u8>>) -> OnionResult<()> {
        match read {
            Ok(bytes) => self
                .stream
                .reload(&mut Cursor::new(bytes))
                .map_err(|err| OnionError::file(&self.path, err)),
            Err(io) => {
                let err = OnionError::file(&self.path, io);
                self.stream.publish_failure(Arc::clone(&err));
                Err(err)
            }
        }
    }

    /// Poll the file every `every` and refresh it when it changes.
    ///
    /// The task ends when `cancel` is cancelled. Refresh failures are logged
    /// and published; polling continues.
    pub fn spawn_polling(
        self: &Arc<Self>,
        every: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let layer = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last = fingerprint(&layer.path).await;
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    _ = ticker.tick() => {}
                }
                let current = fingerprint(&layer.path).await;
                if current == last {
                    continue;
                }
                last = current;
                if let Err(err) = layer.refresh_async().await {
                    warn!(path = %layer.path.display(), error = %err, "file refresh failed");
                }
            }
        })
    }

    /// Whether the layer decrypts the file before decoding it.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }
}

impl std::fmt::Debug for FileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLayer")
            .field("path", &self.path)
            .field("format", &self.stream.format())
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Layer for FileLayer {
    fn name(&self) -> &str {
        self.stream.name()
    }

    async fn load(&self) -> OnionResult<ConfigMap> {
        self.stream.load().await
    }

    fn watch(&self) -> Option<LayerUpdates> {
        self.stream.watch()
    }
}

fn extension(path: &Path) -> OnionResult<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| {
            OnionError::file(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no extension to select a decoder",
                ),
            )
        })
}

fn is_named(path: &Path, name: &str) -> bool {
    path.extension().is_some() && path.file_stem().and_then(|stem| stem.to_str()) == Some(name)
}

async fn fingerprint(path: &Path) -> Option<(Option<SystemTime>, u64)> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    Some((meta.modified().ok(), meta.len()))
}
