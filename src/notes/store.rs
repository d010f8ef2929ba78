//! Filesystem access for the notes tree.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tokio::fs;

use super::{Entry, NotesError};
use crate::config::NotesConfig;
use crate::logger;

/// Resolves note paths against the base directory
#[derive(Debug, Clone)]
pub struct NotesStore {
    base_dir: PathBuf,
    notes_dir: String,
    extension: String,
}

impl NotesStore {
    pub fn new(config: &NotesConfig) -> Self {
        Self {
            base_dir: PathBuf::from(&config.base_dir),
            notes_dir: config.notes_dir.trim_matches('/').to_string(),
            extension: config.extension.clone(),
        }
    }

    /// Absolute-or-relative location of the listed notes directory
    pub fn notes_path(&self) -> PathBuf {
        self.base_dir.join(&self.notes_dir)
    }

    /// Display name of the notes directory (its last path segment)
    pub fn notes_name(&self) -> &str {
        self.notes_dir
            .rsplit('/')
            .next()
            .unwrap_or(self.notes_dir.as_str())
    }

    /// List the notes directory as a single directory entry.
    ///
    /// Only names ending in the configured extension are kept. Children are
    /// sorted by name so repeated calls over the same tree are identical.
    pub async fn list(&self) -> Result<Vec<Entry>, NotesError> {
        let dir = self.notes_path();
        if !fs::try_exists(&dir).await? {
            return Err(NotesError::DirectoryNotFound);
        }

        let mut names = Vec::new();
        let mut reader = fs::read_dir(&dir).await?;
        while let Some(item) = reader.next_entry().await? {
            let file_name = item.file_name();
            let Some(name) = file_name.to_str() else {
                logger::log_warning(&format!(
                    "Skipping non UTF-8 file name in {}: {}",
                    dir.display(),
                    file_name.to_string_lossy()
                ));
                continue;
            };
            if name.ends_with(&self.extension) {
                names.push(name.to_string());
            }
        }
        names.sort_unstable();

        let children = names
            .into_iter()
            .map(|name| {
                let path = format!("{}/{name}", self.notes_dir);
                Entry::file(name, path)
            })
            .collect();

        Ok(vec![Entry::directory(self.notes_name(), children)])
    }

    /// Load one file relative to the base directory and parse it as JSON
    pub async fn read(&self, relative: &str) -> Result<Value, NotesError> {
        let path = self.resolve(relative).await?;
        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => NotesError::FileNotFound,
            _ => NotesError::Io(e),
        })?;
        let text = String::from_utf8(bytes)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Map a client supplied relative path to an existing path inside the base directory.
    ///
    /// Absolute paths are refused outright. Everything else, `..` segments and
    /// symlinks included, is judged by its canonical form, which must stay
    /// inside the canonical base directory.
    pub async fn resolve(&self, relative: &str) -> Result<PathBuf, NotesError> {
        if relative.is_empty() {
            return Err(NotesError::FileNotFound);
        }

        let rel = Path::new(relative);
        let absolute = rel
            .components()
            .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
        if absolute {
            return Err(self.escape_attempt(relative));
        }

        let joined = self.base_dir.join(rel);
        // Unreadable metadata counts as missing
        if !matches!(fs::try_exists(&joined).await, Ok(true)) {
            return Err(NotesError::FileNotFound);
        }

        let base = fs::canonicalize(&self.base_dir).await?;
        let resolved = fs::canonicalize(&joined).await?;
        if !resolved.starts_with(&base) {
            return Err(self.escape_attempt(relative));
        }

        Ok(resolved)
    }

    fn escape_attempt(&self, relative: &str) -> NotesError {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} (base {})",
            self.base_dir.display()
        ));
        NotesError::OutsideBase(relative.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::EntryKind;
    use tempfile::TempDir;

    const NOTES: &str = "side_story/Notes on Shuori";

    fn fixture() -> (TempDir, NotesStore) {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join(NOTES);
        std::fs::create_dir_all(&notes).unwrap();
        std::fs::write(notes.join("b.json"), r#"{"chapter": 2}"#).unwrap();
        std::fs::write(notes.join("a.json"), r#"{"x": 1}"#).unwrap();
        std::fs::write(notes.join("readme.txt"), "not listed").unwrap();
        std::fs::write(notes.join("upper.JSON"), "{}").unwrap();
        std::fs::write(notes.join("broken.json"), "{ not json").unwrap();

        let store = NotesStore::new(&NotesConfig {
            base_dir: dir.path().to_string_lossy().into_owned(),
            ..NotesConfig::default()
        });
        (dir, store)
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (_dir, store) = fixture();
        let tree = store.list().await.unwrap();

        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.name, "Notes on Shuori");
        assert_eq!(root.kind, EntryKind::Directory);
        assert!(root.path.is_none());

        let children = root.children.as_ref().unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a.json", "b.json", "broken.json"]);
        assert_eq!(
            children[0].path.as_deref(),
            Some("side_story/Notes on Shuori/a.json")
        );
        assert!(children.iter().all(|c| c.kind == EntryKind::File));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_list_skips_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let (dir, store) = fixture();
        let name = std::ffi::OsStr::from_bytes(b"bad\xff.json");
        std::fs::write(dir.path().join(NOTES).join(name), "{}").unwrap();

        let tree = store.list().await.unwrap();
        let names: Vec<_> = tree[0]
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["a.json", "b.json", "broken.json"]);
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = NotesStore::new(&NotesConfig {
            base_dir: dir.path().to_string_lossy().into_owned(),
            ..NotesConfig::default()
        });
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, NotesError::DirectoryNotFound));
    }

    #[tokio::test]
    async fn test_list_notes_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("side_story")).unwrap();
        std::fs::write(dir.path().join(NOTES), "plain file").unwrap();
        let store = NotesStore::new(&NotesConfig {
            base_dir: dir.path().to_string_lossy().into_owned(),
            ..NotesConfig::default()
        });
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, NotesError::Io(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_valid_file() {
        let (_dir, store) = fixture();
        let value = store
            .read("side_story/Notes on Shuori/a.json")
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let (_dir, store) = fixture();
        let err = store.read("does/not/exist.json").await.unwrap_err();
        assert!(matches!(err, NotesError::FileNotFound));
        assert!(store.read("").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let (_dir, store) = fixture();
        let err = store
            .read("side_story/Notes on Shuori/broken.json")
            .await
            .unwrap_err();
        assert!(matches!(err, NotesError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_read_invalid_utf8() {
        let (dir, store) = fixture();
        std::fs::write(dir.path().join(NOTES).join("latin1.json"), [b'"', 0xE9, b'"']).unwrap();
        let err = store
            .read("side_story/Notes on Shuori/latin1.json")
            .await
            .unwrap_err();
        assert!(matches!(err, NotesError::InvalidUtf8(_)));
    }

    #[tokio::test]
    async fn test_read_directory_is_internal_failure() {
        let (_dir, store) = fixture();
        let err = store.read("side_story").await.unwrap_err();
        assert!(matches!(err, NotesError::Io(_)));
    }

    #[tokio::test]
    async fn test_parent_segments_inside_base_resolve() {
        let (_dir, store) = fixture();
        let value = store
            .read("side_story/../side_story/Notes on Shuori/./a.json")
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_parent_segments_escaping_base_rejected() {
        let (dir, _) = fixture();
        // a sibling of the base directory that must stay unreachable
        let base = dir.path().join("base");
        std::fs::create_dir_all(base.join("side_story")).unwrap();
        std::fs::write(dir.path().join("secret.json"), r#"{"secret": true}"#).unwrap();
        let store = NotesStore::new(&NotesConfig {
            base_dir: base.to_string_lossy().into_owned(),
            ..NotesConfig::default()
        });

        let err = store.read("../secret.json").await.unwrap_err();
        assert!(matches!(err, NotesError::OutsideBase(_)));
        let err = store.read("side_story/../../secret.json").await.unwrap_err();
        assert!(matches!(err, NotesError::OutsideBase(_)));
        // escaping towards nothing is just missing
        let err = store.read("../absent.json").await.unwrap_err();
        assert!(matches!(err, NotesError::FileNotFound));
    }

    #[tokio::test]
    async fn test_absolute_path_rejected() {
        let (dir, store) = fixture();
        let absolute = dir.path().join(NOTES).join("a.json");
        let err = store
            .read(&absolute.to_string_lossy())
            .await
            .unwrap_err();
        assert!(matches!(err, NotesError::OutsideBase(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_rejected() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.json"), "{}").unwrap();
        let (dir, store) = fixture();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let err = store.read("link/secret.json").await.unwrap_err();
        assert!(matches!(err, NotesError::OutsideBase(_)));
    }
}
