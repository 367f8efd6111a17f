//! In-memory staging filesystem for text files
//!
//! Project files are read in full before any step runs, edited in memory,
//! and written back once at the end. Each file remembers the content it had
//! on disk so only files that actually changed get written.

use crate::error::{Error, Result};
use glob::Pattern;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A staged text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Current content
    pub content: String,
    /// Content on disk when the file was loaded, `None` for new files
    original: Option<String>,
}

impl File {
    /// A file that does not exist on disk yet
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            original: None,
        }
    }

    /// A file loaded from disk
    pub fn loaded(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            original: Some(content.clone()),
            content,
        }
    }

    /// Whether the staged content differs from what is on disk
    pub fn is_dirty(&self) -> bool {
        self.original.as_deref() != Some(self.content.as_str())
    }

    /// Whether the file existed on disk when it was loaded
    pub fn is_on_disk(&self) -> bool {
        self.original.is_some()
    }
}

/// In-memory filesystem keyed by project-relative paths
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: BTreeMap<PathBuf, File>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `relative` under `root` into the filesystem. Missing files are
    /// skipped; returns whether the file was found.
    pub fn load<P: AsRef<Path>>(&mut self, root: &Path, relative: P) -> Result<bool> {
        let relative = relative.as_ref();
        if self.files.contains_key(relative) {
            return Ok(true);
        }

        let full_path = root.join(relative);
        if !full_path.is_file() {
            return Ok(false);
        }

        let content = fs::read_to_string(&full_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read '{}': {}", full_path.display(), e),
        })?;
        self.files.insert(relative.to_path_buf(), File::loaded(content));
        Ok(true)
    }

    /// Add or replace a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) {
        self.files.insert(path.as_ref().to_path_buf(), file);
    }

    /// Add a new file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        self.add_file(path, File::new(content));
    }

    /// Replace the content of a file, keeping its on-disk state.
    pub fn set_content<P: AsRef<Path>>(&mut self, path: P, content: String) {
        match self.files.get_mut(path.as_ref()) {
            Some(file) => file.content = content,
            None => self.add_file(path, File::new(content)),
        }
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        self.files.get(path.as_ref())
    }

    /// Get the content of a file by path
    pub fn content<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        self.get_file(path).map(|file| file.content.as_str())
    }

    /// Check if a file exists
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.files.contains_key(path.as_ref())
    }

    /// List files matching a glob pattern
    pub fn list_files_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(pattern)?;
        Ok(self
            .files
            .keys()
            .filter(|path| path.to_str().is_some_and(|path| pattern.matches(path)))
            .cloned()
            .collect())
    }

    /// Files whose content differs from disk, in path order
    pub fn changed_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|(_, file)| file.is_dirty())
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_loaded_file_is_clean_until_edited() {
        let mut fs = MemoryFS::new();
        fs.add_file("app/User.php", File::loaded("<?php\n"));
        assert!(fs.changed_files().is_empty());

        fs.set_content("app/User.php", "<?php\n// edited\n".to_string());
        assert_eq!(fs.changed_files(), vec![PathBuf::from("app/User.php")]);
    }

    #[test]
    fn test_edit_back_to_original_is_clean() {
        let mut fs = MemoryFS::new();
        fs.add_file(".env", File::loaded("APP_KEY=\n"));
        fs.set_content(".env", "APP_KEY=\nX=\n".to_string());
        fs.set_content(".env", "APP_KEY=\n".to_string());
        assert!(fs.changed_files().is_empty());
    }

    #[test]
    fn test_new_file_is_dirty() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("stub.php", "");
        let file = fs.get_file("stub.php").unwrap();
        assert!(file.is_dirty());
        assert!(!file.is_on_disk());
    }

    #[test]
    fn test_load_reads_existing_and_skips_missing() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("app")).unwrap();
        std::fs::write(temp.path().join("app/User.php"), "<?php\n").unwrap();

        let mut fs = MemoryFS::new();
        assert!(fs.is_empty());
        assert!(fs.load(temp.path(), "app/User.php").unwrap());
        assert!(!fs.load(temp.path(), "app/Team.php").unwrap());
        assert_eq!(fs.content("app/User.php"), Some("<?php\n"));
        assert!(fs.get_file("app/User.php").unwrap().is_on_disk());
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_load_keeps_staged_content() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), "disk").unwrap();

        let mut fs = MemoryFS::new();
        fs.add_file_string("a.txt", "staged");
        fs.load(temp.path(), "a.txt").unwrap();
        assert_eq!(fs.content("a.txt"), Some("staged"));
    }

    #[test]
    fn test_list_files_glob() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("app/Providers/SparkServiceProvider.php", "");
        fs.add_file_string("app/User.php", "");
        fs.add_file_string("config/app.php", "");

        let matches = fs.list_files_glob("app/Providers/*.php").unwrap();
        assert_eq!(matches, vec![PathBuf::from("app/Providers/SparkServiceProvider.php")]);
        assert!(fs.list_files_glob("app/[").is_err());
    }
}
