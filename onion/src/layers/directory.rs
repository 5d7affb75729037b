//! Every file of one format in a folder, merged into a single layer.

use std::cmp::Ordering;
use std::fs;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;
use std::sync::Arc;

use tracing::debug;

use super::{FileLayer, MapLayer};
use crate::cipher::Cipher;
use crate::decoder::DecoderRegistry;
use crate::{ConfigMap, Layer, OnionError, OnionResult, merge_maps};

impl MapLayer {
    /// Deep-merge every `*.<extension>` file in `folder` into one layer.
    ///
    /// Files are merged in natural order of their names, so `10.json`
    /// overrides `9.json`; extensions match case-insensitively. A folder
    /// without matching files gives an empty layer. The result is a snapshot:
    /// it does not follow later edits.
    ///
    /// # Errors
    ///
    /// Returns [`OnionError::File`] when `folder` cannot be listed or any
    /// matching file fails to load.
    pub async fn from_directory(
        folder: impl AsRef<Path>,
        extension: &str,
        cipher: Option<Arc<dyn Cipher>>,
        decoders: &DecoderRegistry,
    ) -> OnionResult<Self> {
        let folder = folder.as_ref();
        let mut snapshots: Vec<ConfigMap> = Vec::new();
        for path in files_in_order(folder, extension)? {
            let layer = FileLayer::open(&path, cipher.clone(), decoders)?;
            snapshots.push(layer.load().await?);
        }
        debug!(
            folder = %folder.display(),
            files = snapshots.len(),
            "merged configuration folder"
        );
        Ok(Self::new(
            folder.display().to_string(),
            merge_maps(snapshots.iter()),
        ))
    }
}

fn files_in_order(folder: &Path, extension: &str) -> OnionResult<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
    let entries = fs::read_dir(folder).map_err(|err| OnionError::file(folder, err))?;
    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.to_ascii_lowercase() == wanted)
        })
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_owned();
            Some((name, path))
        })
        .collect();
    files.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Compare names treating runs of ASCII digits as numbers.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let order = compare_numbers(&digits(&mut left), &digits(&mut right));
                if order != Ordering::Equal {
                    return order;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
}
