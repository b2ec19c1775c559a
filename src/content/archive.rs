use crate::error::PrepError;
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const ARCHIVE_PREFIX: &str = "qr-filetransfer";

/// Zip `inputs` into a new file inside `dir` and return its path.
///
/// Directories are stored under their own name. Nothing is left in `dir`
/// when this fails.
pub fn create_archive(inputs: &[PathBuf], dir: &Path) -> Result<PathBuf, PrepError> {
    let entries = collect_entries(inputs)?;
    if entries.is_empty() {
        return Err(PrepError::archive_failed("no files found to archive"));
    }

    let archive_path = dir.join(format!("{}-{}.zip", ARCHIVE_PREFIX, Uuid::new_v4()));
    tracing::debug!(
        "Archiving {} file(s) into {}",
        entries.len(),
        archive_path.display()
    );

    if let Err(e) = write_archive(&archive_path, &entries) {
        if let Err(cleanup) = std::fs::remove_file(&archive_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove partial archive {}: {}",
                    archive_path.display(),
                    cleanup
                );
            }
        }
        return Err(e);
    }

    Ok(archive_path)
}

fn collect_entries(inputs: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>, PrepError> {
    let mut entries = Vec::new();
    let mut names = HashSet::new();

    for input in inputs {
        if input.is_dir() {
            let root = PathBuf::from(
                input
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "dir".to_string()),
            );
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    PrepError::archive_failed(format!("failed to walk {}: {}", input.display(), e))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel = entry.path().strip_prefix(input).unwrap_or(entry.path());
                let name = unique_name(&root.join(rel), &mut names);
                entries.push((entry.path().to_path_buf(), name));
            }
        } else {
            let wanted = PathBuf::from(
                input
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "file".to_string()),
            );
            let name = unique_name(&wanted, &mut names);
            entries.push((input.clone(), name));
        }
    }

    Ok(entries)
}

/// `wanted`, or `stem-2.ext`, `stem-3.ext`... when the name is taken.
fn unique_name(wanted: &Path, names: &mut HashSet<PathBuf>) -> PathBuf {
    if names.insert(wanted.to_path_buf()) {
        return wanted.to_path_buf();
    }

    let stem = wanted
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    let ext = wanted.extension().map(|e| e.to_string_lossy().to_string());
    let parent = wanted.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut idx = 2usize;
    loop {
        let candidate = match &ext {
            Some(ext) if !ext.is_empty() => parent.join(format!("{}-{}.{}", stem, idx, ext)),
            _ => parent.join(format!("{}-{}", stem, idx)),
        };
        if names.insert(candidate.clone()) {
            return candidate;
        }
        idx += 1;
    }
}

fn write_archive(archive_path: &Path, entries: &[(PathBuf, PathBuf)]) -> Result<(), PrepError> {
    let file = File::create(archive_path).map_err(|e| {
        PrepError::archive_failed(format!("cannot create {}: {}", archive_path.display(), e))
    })?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (source_path, entry_path) in entries {
        let mut source = File::open(source_path).map_err(|source| PrepError::Unreadable {
            path: source_path.clone(),
            source,
        })?;
        let entry_name = entry_path.to_string_lossy().replace('\\', "/");
        writer.start_file(entry_name, options).map_err(|e| {
            PrepError::archive_failed(format!("cannot add {}: {}", entry_path.display(), e))
        })?;
        io::copy(&mut source, &mut writer).map_err(|e| {
            PrepError::archive_failed(format!("cannot write {}: {}", source_path.display(), e))
        })?;
    }

    writer
        .finish()
        .map_err(|e| PrepError::archive_failed(format!("cannot finalize archive: {}", e)))?;
    Ok(())
}
