//! Output sinks for generated page trees: files, the native save dialog and
//! the system clipboard.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while delivering output.
#[derive(Error, Debug)]
pub enum IoError {
    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system clipboard is unavailable or rejected the text.
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;

/// Writes `json` to `path`, creating missing parent directories.
pub fn write_to_file(path: &Path, json: &str) -> Result<()> {
    let write_error = |source| IoError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, json).map_err(write_error)?;
    log::info!("wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

/// Shows the native save dialog, pre-filled with `default_name`. Returns
/// `None` when the user cancels.
pub fn pick_save_path(default_name: &str) -> Option<PathBuf> {
    let path = rfd::FileDialog::new()
        .set_title("Save page tree")
        .set_file_name(default_name)
        .add_filter("JSON", &["json"])
        .save_file();
    if path.is_none() {
        log::debug!("save dialog cancelled");
    }
    path
}

/// Places `json` on the system clipboard.
pub fn copy_to_clipboard(json: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(json)?;
    log::info!("copied {} bytes to the clipboard", json.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_new_directories() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("out/nested/page.json");
        write_to_file(&path, "{\"version\":157}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"version\":157}");
    }

    #[test]
    fn write_errors_name_the_path() {
        let temp = tempfile::tempdir().unwrap();
        let err = write_to_file(temp.path(), "{}").unwrap_err();
        assert!(matches!(err, IoError::Write { .. }));
        assert!(err.to_string().contains(&temp.path().display().to_string()));
    }
}
