//! # Artifact Loading
//!
//! Turns a classified input into the bytes the registry expects.
//!
//! - Files are read as-is.
//! - Directories are packed into an in-memory tar.gz.
//! - CSV sets are read file by file.
//! - URLs need no local bytes.

use flate2::Compression;
use flate2::write::GzEncoder;
use meshport_core::{CsvSet, FileSource, ImportError, IngestionRequest, InputMode};
use std::path::Path;

/// Maximum size of a single file read for upload (500 MB).
const MAX_ARTIFACT_SIZE: u64 = 500 * 1024 * 1024;

// =============================================================================
// REQUEST ASSEMBLY
// =============================================================================

/// Load whatever `mode` points at and wrap it into a request.
pub fn build_request(mode: &InputMode, register: bool) -> Result<IngestionRequest, ImportError> {
    match mode {
        InputMode::Url(url) => Ok(IngestionRequest::url(url.clone(), register)),
        InputMode::Csv(set) => {
            let CsvSet {
                model,
                component,
                relationship,
            } = set;
            tracing::debug!(
                "Reading CSV set: model={:?} component={:?} relationship={:?}",
                model,
                component,
                relationship
            );
            Ok(IngestionRequest::csv(
                read_file(model)?,
                read_file(component)?,
                read_file(relationship)?,
                register,
            ))
        }
        InputMode::File(source) => {
            let bytes = match source {
                FileSource::File(path) => read_file(path)?,
                FileSource::Directory(path) => archive_directory(path)?,
            };
            Ok(IngestionRequest::file(bytes, source.file_name(), register))
        }
    }
}

// =============================================================================
// FILESYSTEM
// =============================================================================

/// Read a whole file, refusing anything above the size limit.
pub fn read_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    let file_read = |reason: String| ImportError::FileRead {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(path).map_err(|e| file_read(e.to_string()))?;
    if metadata.len() > MAX_ARTIFACT_SIZE {
        return Err(file_read(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_ARTIFACT_SIZE
        )));
    }

    std::fs::read(path).map_err(|e| file_read(e.to_string()))
}

/// Pack a directory into a gzip-compressed tarball held in memory.
///
/// Entries are rooted at the directory's own name, so `k8s/model.json`
/// inside `/tmp/k8s` is stored as `k8s/model.json`.
pub fn archive_directory(path: &Path) -> Result<Vec<u8>, ImportError> {
    let archive_error = |e: std::io::Error| ImportError::FileRead {
        path: path.to_path_buf(),
        reason: format!("cannot archive directory: {e}"),
    };

    let root = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            let canonical = path.canonicalize().ok()?;
            canonical
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "model".to_string());

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    builder.follow_symlinks(false);
    builder.append_dir_all(&root, path).map_err(archive_error)?;
    let encoder = builder.into_inner().map_err(archive_error)?;
    let bytes = encoder.finish().map_err(archive_error)?;

    tracing::debug!("Archived {:?} into {} bytes", path, bytes.len());
    Ok(bytes)
}

// =============================================================================
// TESTS
// =============================================================================
