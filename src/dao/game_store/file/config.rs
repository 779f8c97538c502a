use std::path::{Path, PathBuf};

/// Runtime configuration describing where the snapshot file lives.
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    pub path: PathBuf,
}

impl FileStoreConfig {
    /// Construct a configuration pointing at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling path used to stage writes before the atomic rename.
    pub fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Directory holding the snapshot, if the path has one.
    pub fn directory(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }
}
