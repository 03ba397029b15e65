use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("The file {0:?} could not be read: {1}")]
    /// The file could not be opened or read
    UnableToReadFile(PathBuf, io::Error),
    #[error("The file {0:?} could not be created: {1}")]
    /// The temporary file could not be created
    UnableToCreateFile(PathBuf, io::Error),
    #[error("Failed to write bytes to {0:?}: {1}")]
    /// Failed to write bytes to file
    UnableToWriteFile(PathBuf, io::Error),
    #[error("The file {0:?} could not be renamed: {1}")]
    /// The temporary file could not be moved into place
    UnableToRenameFile(PathBuf, io::Error),
}

/// Reads a whole file as UTF-8 text.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String, FsError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FsError::UnableToReadFile(path.to_path_buf(), e))
}

/// Write a file atomically by using a temporary sibling file as an intermediate.
///
/// Readers of `file_path` observe either the previous contents or `bytes`, never a
/// partially written proposal.
pub fn write_atomic<P: AsRef<Path>>(file_path: P, bytes: &[u8]) -> Result<(), FsError> {
    let file_path = file_path.as_ref();
    let temp_path = temp_path_for(file_path);

    let mut file =
        File::create(&temp_path).map_err(|e| FsError::UnableToCreateFile(temp_path.clone(), e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| FsError::UnableToWriteFile(temp_path.clone(), e))?;

    // With the temporary file written, perform an atomic rename.
    fs::rename(&temp_path, file_path)
        .map_err(|e| FsError::UnableToRenameFile(file_path.to_path_buf(), e))?;

    tracing::trace!(target: "proposer::fs", "wrote {} bytes to {:?}", bytes.len(), file_path);

    Ok(())
}

fn temp_path_for(file_path: &Path) -> PathBuf {
    let mut name = file_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    file_path.with_file_name(name)
}
