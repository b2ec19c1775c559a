pub mod archive;
pub mod prepare;

pub use prepare::prepare;

use std::path::{Path, PathBuf};

/// The single file offered for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Content {
    pub path: PathBuf,
    /// File name suggested to the downloading client
    pub name: String,
    /// The file was created by this process and must be removed after use
    pub should_be_deleted: bool,
}

impl Content {
    /// Serve a file the user already owns.
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            name,
            should_be_deleted: false,
        }
    }

    /// Serve a file created for this transfer.
    pub fn temporary(path: impl Into<PathBuf>) -> Self {
        Self {
            should_be_deleted: true,
            ..Self::existing(path)
        }
    }

    pub fn delete(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("download"))
        .to_string_lossy()
        .to_string()
}
