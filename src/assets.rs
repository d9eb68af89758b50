use std::path::{Path, PathBuf};

/// Local directories that receive generated stamps and reference photos.
#[derive(Debug, Clone)]
pub struct AssetStore {
    stamps_dir: PathBuf,
    images_dir: PathBuf,
}

impl AssetStore {
    pub fn new(stamps_dir: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            stamps_dir: stamps_dir.into(),
            images_dir: images_dir.into(),
        }
    }

    pub fn stamps_dir(&self) -> &Path {
        &self.stamps_dir
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Writes (or overwrites) a stamp image and returns its path.
    pub async fn write_stamp(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        write_file(&self.stamps_dir, file_name, bytes).await
    }

    pub async fn write_reference_image(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> anyhow::Result<PathBuf> {
        write_file(&self.images_dir, file_name, bytes).await
    }
}

/// True for a plain file name that cannot escape its directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

async fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    if !is_plain_file_name(file_name) {
        return Err(anyhow::anyhow!("refusing to write {file_name:?}"));
    }

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote asset");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("griffith_observatory.png"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../etc/passwd"));
        assert!(!is_plain_file_name("nested/stamp.png"));
        assert!(!is_plain_file_name("c:\\stamp.png"));
    }

    #[tokio::test]
    async fn test_write_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path().join("stamps"), dir.path().join("images"));

        let path = store.write_stamp("a.png", b"first").await.unwrap();
        store.write_stamp("a.png", b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(path, dir.path().join("stamps").join("a.png"));
    }

    #[tokio::test]
    async fn test_write_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path().join("stamps"), dir.path().join("images"));

        tokio_test::assert_err!(store.write_reference_image("../x.jpg", b"x").await);
    }
}
