use crate::content::Content;
use crate::content::archive::create_archive;
use crate::error::PrepError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Turn the input paths into one servable [`Content`].
///
/// A single regular file is served as is unless `archive` is set; anything
/// else is zipped into a temporary archive owned by this process.
pub fn prepare(paths: &[PathBuf], archive: bool) -> Result<Content, PrepError> {
    prepare_in(paths, archive, &std::env::temp_dir())
}

/// Like [`prepare`], placing any archive inside `archive_dir`.
pub fn prepare_in(
    paths: &[PathBuf],
    archive: bool,
    archive_dir: &Path,
) -> Result<Content, PrepError> {
    if paths.is_empty() {
        return Err(PrepError::NoInputs);
    }

    let mut all_files = true;
    for path in paths {
        all_files &= check_readable(path)?;
    }

    if !archive && all_files {
        if let [single] = paths {
            tracing::debug!("Serving {} directly", single.display());
            return Ok(Content::existing(single.clone()));
        }
    }

    let archive_path = create_archive(paths, archive_dir)?;
    Ok(Content::temporary(archive_path))
}

/// Check that `path` exists and can be read; returns whether it is a file.
fn check_readable(path: &Path) -> Result<bool, PrepError> {
    let metadata = fs::metadata(path).map_err(|e| classify(path, e))?;

    if metadata.is_dir() {
        fs::read_dir(path).map_err(|e| classify(path, e))?;
        Ok(false)
    } else {
        fs::File::open(path).map_err(|e| classify(path, e))?;
        Ok(true)
    }
}

fn classify(path: &Path, source: std::io::Error) -> PrepError {
    match source.kind() {
        ErrorKind::NotFound => PrepError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PrepError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    }
}
