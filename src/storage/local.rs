//! Filesystem blob store rooted at `<storage_dir>/<bucket>/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{validate_key, BlobStore, Bucket, StorageError, StorageResult};

/// Stores each blob as a plain file.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.as_str())
    }

    fn full_path(&self, bucket: Bucket, path: &str) -> StorageResult<PathBuf> {
        validate_key(path)?;
        Ok(self.bucket_dir(bucket).join(path))
    }

    /// Remove now-empty directories between `start` and the bucket root.
    async fn prune_empty_dirs(&self, bucket: Bucket, start: Option<&Path>) {
        let stop = self.bucket_dir(bucket);
        let mut current = start.map(Path::to_path_buf);
        while let Some(dir) = current {
            if dir == stop || !dir.starts_with(&stop) {
                break;
            }
            match fs::read_dir(&dir).await {
                Ok(mut entries) => match entries.next_entry().await {
                    Ok(None) => {
                        if fs::remove_dir(&dir).await.is_err() {
                            break;
                        }
                    }
                    _ => break,
                },
                Err(_) => break,
            }
            current = dir.parent().map(Path::to_path_buf);
        }
    }
}

/// Directory levels below a bucket (scope, year, category), and so the
/// most prunes a single remove can make.
const CREATE_ATTEMPTS: usize = 3;

/// Create the parent directories and a new file at `full_path`.
///
/// A concurrent remove can prune the parent between the two steps, so a
/// missing directory is recreated and the open retried.
async fn create_new_file(full_path: &Path) -> std::io::Result<fs::File> {
    let mut attempt = 1;
    loop {
        let result = async {
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(full_path)
                .await
        }
        .await;

        match result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && attempt < CREATE_ATTEMPTS => {
                tracing::debug!("Parent of {:?} vanished, retrying", full_path);
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, bucket: Bucket, path: &str, data: Bytes) -> StorageResult<()> {
        let full_path = self.full_path(bucket, path)?;
        let mut file = create_new_file(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::AlreadyExists {
                    bucket,
                    path: path.to_string(),
                }
            } else {
                StorageError::Io(e)
            }
        })?;
        file.write_all(&data).await?;
        file.flush().await?;

        tracing::debug!("Stored {} bytes at {:?}", data.len(), full_path);
        Ok(())
    }

    async fn get(&self, bucket: Bucket, path: &str) -> StorageResult<Bytes> {
        let full_path = self.full_path(bucket, path)?;
        match fs::read(&full_path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket,
                path: path.to_string(),
            }),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn remove(&self, bucket: Bucket, path: &str) -> StorageResult<()> {
        let full_path = self.full_path(bucket, path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::debug!("Removed {:?}", full_path);
                self.prune_empty_dirs(bucket, full_path.parent()).await;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Remove of missing blob {}/{} ignored", bucket, path);
                Ok(())
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn exists(&self, bucket: Bucket, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(bucket, path)?;
        Ok(fs::try_exists(&full_path).await?)
    }

    async fn list(&self, bucket: Bucket) -> StorageResult<Vec<String>> {
        let base = self.bucket_dir(bucket);
        let mut keys = Vec::new();
        if !fs::try_exists(&base).await? {
            return Ok(keys);
        }

        let mut stack = vec![base.clone()];
        while let Some(dir) = stack.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    stack.push(path);
                } else if let Ok(rel) = path.strip_prefix(&base) {
                    let key: Vec<String> = rel
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    keys.push(key.join("/"));
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn storage_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_get_remove() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        let key = "U1/2024/W2s/1_w2_2024.pdf";

        store
            .put(Bucket::UserDocuments, key, Bytes::from_static(b"pdf bytes"))
            .await
            .unwrap();
        assert!(store.exists(Bucket::UserDocuments, key).await.unwrap());
        assert!(!store.exists(Bucket::TaxForms, key).await.unwrap());

        let data = store.get(Bucket::UserDocuments, key).await.unwrap();
        assert_eq!(&data[..], b"pdf bytes");

        store.remove(Bucket::UserDocuments, key).await.unwrap();
        assert!(matches!(
            store.get(Bucket::UserDocuments, key).await,
            Err(StorageError::NotFound { .. })
        ));
        // Empty scope directories are pruned, the bucket dir stays.
        assert!(!dir.path().join("user-documents/U1").exists());
        assert!(dir.path().join("user-documents").exists());
    }

    #[tokio::test]
    async fn test_put_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store
            .put(Bucket::TaxForms, "tax-forms/2025/1_f.pdf", Bytes::from_static(b"a"))
            .await
            .unwrap();
        let err = store
            .put(Bucket::TaxForms, "tax-forms/2025/1_f.pdf", Bytes::from_static(b"b"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
        let data = store.get(Bucket::TaxForms, "tax-forms/2025/1_f.pdf").await.unwrap();
        assert_eq!(&data[..], b"a");
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store
            .remove(Bucket::UserDocuments, "U1/2024/W2s/nope.pdf")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        let err = store
            .put(Bucket::UserDocuments, "../escape.txt", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_list_keys() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        assert!(store.list(Bucket::UserDocuments).await.unwrap().is_empty());

        for key in ["U2/2023/Final/2_b.pdf", "U1/2024/W2s/1_a.pdf"] {
            store
                .put(Bucket::UserDocuments, key, Bytes::from_static(b"x"))
                .await
                .unwrap();
        }
        let keys = store.list(Bucket::UserDocuments).await.unwrap();
        assert_eq!(keys, vec!["U1/2024/W2s/1_a.pdf", "U2/2023/Final/2_b.pdf"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_put_survives_concurrent_prune() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(LocalBlobStore::new(dir.path()));

        for round in 0..50 {
            let seed = format!("U1/2024/W2s/{}_seed.pdf", round);
            store
                .put(Bucket::UserDocuments, &seed, Bytes::from_static(b"s"))
                .await
                .unwrap();

            let remover = {
                let store = store.clone();
                tokio::spawn(async move { store.remove(Bucket::UserDocuments, &seed).await })
            };
            let writer = {
                let store = store.clone();
                let key = format!("U1/2024/W2s/{}_new.pdf", round);
                tokio::spawn(async move {
                    store
                        .put(Bucket::UserDocuments, &key, Bytes::from_static(b"n"))
                        .await
                })
            };
            remover.await.unwrap().unwrap();
            writer.await.unwrap().unwrap();
            assert!(store
                .exists(Bucket::UserDocuments, &format!("U1/2024/W2s/{}_new.pdf", round))
                .await
                .unwrap());
        }
    }
}
