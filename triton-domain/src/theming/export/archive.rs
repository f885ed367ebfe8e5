//! Zip packing and unpacking, run on the blocking pool under a deadline.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::time::Duration;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::theming::errors::ThemingError;

/// Text entries of an archive keyed by their path inside it.
pub type ArchiveFiles = BTreeMap<String, String>;

async fn run_blocking<T, F>(operation: &str, limit: Duration, job: F) -> Result<T, ThemingError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ThemingError> + Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ThemingError::Internal {
            context: format!("{} task failed: {}", operation, join_error),
        }),
        Err(_) => Err(ThemingError::Timeout {
            operation: operation.to_string(),
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}

fn pack(files: ArchiveFiles) -> Result<Vec<u8>, ThemingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (path, contents) in files {
        writer.start_file(path.as_str(), options)?;
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| ThemingError::archive(format!("Failed to write '{}': {}", path, e)))?;
    }
    Ok(writer.finish()?.into_inner())
}

fn unpack(bytes: Vec<u8>, max_unpacked: u64) -> Result<ArchiveFiles, ThemingError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut files = ArchiveFiles::new();
    let mut remaining = max_unpacked;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        if entry.size() > remaining {
            return Err(ThemingError::archive("Archive too large"));
        }
        let name = entry.name().trim_start_matches("./").to_string();
        let mut buffer = Vec::new();
        // The declared size can lie; the reader is capped one byte past the budget.
        entry
            .by_ref()
            .take(remaining.saturating_add(1))
            .read_to_end(&mut buffer)
            .map_err(|e| ThemingError::archive(format!("Failed to read '{}': {}", name, e)))?;
        let read = buffer.len() as u64;
        if read > remaining {
            return Err(ThemingError::archive("Archive too large"));
        }
        remaining -= read;
        files.insert(name, String::from_utf8_lossy(&buffer).into_owned());
    }
    Ok(files)
}

/// Packs `files` into a deflated zip.
pub async fn build_archive(files: ArchiveFiles, limit: Duration) -> Result<Vec<u8>, ThemingError> {
    run_blocking("Archive generation", limit, move || pack(files)).await
}

/// Reads every file entry of a zip. Binary entries are decoded lossily.
///
/// Fails with "Archive too large" once the decompressed entries exceed
/// `max_unpacked` bytes in total.
pub async fn read_archive(bytes: Vec<u8>, limit: Duration, max_unpacked: u64) -> Result<ArchiveFiles, ThemingError> {
    run_blocking("Archive parsing", limit, move || unpack(bytes, max_unpacked)).await
}
