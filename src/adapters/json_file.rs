use crate::adapters::memory::{CacheSnapshot, MemoryStore};
use crate::domain::model::{Aggregate, CacheScope};
use crate::domain::ports::LocalStore;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 以 JSON 檔保存的快取，每種聚合一個檔案（`{dir}/{kind}.json`）。
///
/// 讀取走記憶體快照。寫入時先組出下一份快照，寫暫存檔再 rename，成功後才換上記憶體快照，
/// 所以讀取端看不到沒有寫進檔案的資料。
pub struct JsonFileStore<T: Aggregate> {
    path: PathBuf,
    memory: MemoryStore<T>,
    writer: Mutex<()>,
}

impl<T: Aggregate> JsonFileStore<T> {
    pub async fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        tokio::fs::create_dir_all(directory).await?;

        let path = directory.join(format!("{}.json", T::KIND));
        let snapshot: CacheSnapshot<T> = match tokio::fs::read(&path).await {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CacheSnapshot::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Opened {} with {} cached rows",
            path.display(),
            snapshot.rows.len()
        );
        Ok(Self {
            path,
            memory: MemoryStore::with_snapshot(snapshot),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, snapshot: &CacheSnapshot<T>) -> Result<()> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, &data).await.map_err(|e| {
            SyncError::cache(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            SyncError::cache(format!("failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }

    /// 在 writer 鎖內以目前快照組出下一份，寫檔成功後才公開；`build` 回傳 `None` 代表不需要寫入
    async fn commit<F>(&self, build: F) -> Result<bool>
    where
        F: FnOnce(&CacheSnapshot<T>) -> Option<CacheSnapshot<T>>,
    {
        let _writer = self.writer.lock().await;
        let current = self.memory.snapshot().await;
        let Some(next) = build(&current) else {
            return Ok(false);
        };

        self.persist(&next).await?;
        self.memory.publish(Arc::new(next)).await;
        Ok(true)
    }
}

#[async_trait]
impl<T: Aggregate> LocalStore<T> for JsonFileStore<T> {
    async fn get_all(&self, owner: Option<&str>) -> Result<Vec<T>> {
        self.memory.get_all(owner).await
    }

    async fn get_one(&self, id: &str) -> Result<Option<T>> {
        self.memory.get_one(id).await
    }

    async fn replace_all(&self, scope: &CacheScope, items: Vec<T>) -> Result<()> {
        self.commit(|current| Some(current.replaced(scope, items)))
            .await?;
        Ok(())
    }

    async fn upsert(&self, item: T) -> Result<()> {
        self.commit(|current| Some(current.upserted(item))).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.commit(|current| current.without(id)).await
    }

    async fn clear(&self) -> Result<()> {
        self.commit(|_| Some(CacheSnapshot::default())).await?;
        Ok(())
    }

    async fn count(&self, scope: &CacheScope) -> Result<usize> {
        self.memory.count(scope).await
    }

    async fn is_complete(&self, scope: &CacheScope) -> Result<bool> {
        self.memory.is_complete(scope).await
    }
}
