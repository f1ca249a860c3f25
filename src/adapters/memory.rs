use crate::domain::model::{Aggregate, CacheScope};
use crate::domain::ports::LocalStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 某種聚合在快取中的完整內容。
///
/// `complete` 記錄哪些 scope 曾經由 `replace_all` 整批寫入；只靠 `upsert` 寫進來的
/// 資料不會讓 scope 變成完整。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot<T> {
    pub rows: Vec<T>,
    #[serde(default)]
    pub complete: HashSet<CacheScope>,
}

impl<T> Default for CacheSnapshot<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            complete: HashSet::new(),
        }
    }
}

impl<T: Aggregate> CacheSnapshot<T> {
    /// 只有資料列，沒有任何完整的 scope
    pub fn partial(rows: Vec<T>) -> Self {
        Self {
            rows,
            complete: HashSet::new(),
        }
    }

    /// 一次完整同步的結果
    pub fn synced(rows: Vec<T>) -> Self {
        Self {
            rows,
            complete: HashSet::from([CacheScope::All]),
        }
    }

    pub fn rows_for(&self, owner: Option<&str>) -> Vec<T> {
        self.rows
            .iter()
            .filter(|item| owner.map_or(true, |owner| item.owner_id() == owner))
            .cloned()
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|item| item.id() == id)
    }

    pub fn count(&self, scope: &CacheScope) -> usize {
        self.rows.iter().filter(|item| scope.contains(*item)).count()
    }

    pub fn is_complete(&self, scope: &CacheScope) -> bool {
        self.complete.iter().any(|done| done.covers(scope))
    }

    pub fn replaced(&self, scope: &CacheScope, items: Vec<T>) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|item| !scope.contains(*item))
            .cloned()
            .chain(items)
            .collect();
        let mut complete = self.complete.clone();
        complete.insert(scope.clone());
        Self { rows, complete }
    }

    pub fn upserted(&self, item: T) -> Self {
        let mut rows = self.rows.clone();
        match rows.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => rows.push(item),
        }
        Self {
            rows,
            complete: self.complete.clone(),
        }
    }

    /// 沒有符合的資料時回傳 `None`
    pub fn without(&self, id: &str) -> Option<Self> {
        let rows: Vec<T> = self
            .rows
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        if rows.len() == self.rows.len() {
            return None;
        }
        Some(Self {
            rows,
            complete: self.complete.clone(),
        })
    }
}

/// 記憶體快取。資料以不可變快照保存，寫入時在寫鎖內組出新快照後整個替換，
/// 讀取端拿到的永遠是某一個完整快照。
pub struct MemoryStore<T: Aggregate> {
    snapshot: RwLock<Arc<CacheSnapshot<T>>>,
}

impl<T: Aggregate> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Aggregate> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_snapshot(CacheSnapshot::default())
    }

    /// 預先放入資料列，但不視為任何 scope 的完整同步結果
    pub fn with_items(items: Vec<T>) -> Self {
        Self::with_snapshot(CacheSnapshot::partial(items))
    }

    /// 以一次完整同步的結果建立（`CacheScope::All` 視為完整）
    pub fn synced(items: Vec<T>) -> Self {
        Self::with_snapshot(CacheSnapshot::synced(items))
    }

    pub fn with_snapshot(snapshot: CacheSnapshot<T>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> Arc<CacheSnapshot<T>> {
        self.snapshot.read().await.clone()
    }

    /// 換上已經準備好的快照
    pub(crate) async fn publish(&self, snapshot: Arc<CacheSnapshot<T>>) {
        *self.snapshot.write().await = snapshot;
    }

    async fn swap<F>(&self, build: F) -> bool
    where
        F: FnOnce(&CacheSnapshot<T>) -> Option<CacheSnapshot<T>>,
    {
        let mut guard = self.snapshot.write().await;
        match build(&**guard) {
            Some(next) => {
                *guard = Arc::new(next);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl<T: Aggregate> LocalStore<T> for MemoryStore<T> {
    async fn get_all(&self, owner: Option<&str>) -> Result<Vec<T>> {
        Ok(self.snapshot().await.rows_for(owner))
    }

    async fn get_one(&self, id: &str) -> Result<Option<T>> {
        Ok(self.snapshot().await.find(id).cloned())
    }

    async fn replace_all(&self, scope: &CacheScope, items: Vec<T>) -> Result<()> {
        self.swap(|current| Some(current.replaced(scope, items))).await;
        Ok(())
    }

    async fn upsert(&self, item: T) -> Result<()> {
        self.swap(|current| Some(current.upserted(item))).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.swap(|current| current.without(id)).await)
    }

    async fn clear(&self) -> Result<()> {
        self.swap(|_| Some(CacheSnapshot::default())).await;
        Ok(())
    }

    async fn count(&self, scope: &CacheScope) -> Result<usize> {
        Ok(self.snapshot().await.count(scope))
    }

    async fn is_complete(&self, scope: &CacheScope) -> Result<bool> {
        Ok(self.snapshot().await.is_complete(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SavedRecipe;

    fn bookmarks() -> Vec<SavedRecipe> {
        vec![
            SavedRecipe::new("u1", "r1"),
            SavedRecipe::new("u1", "r2"),
            SavedRecipe::new("u2", "r1"),
        ]
    }

    #[tokio::test]
    async fn test_owner_filter() {
        let store = MemoryStore::with_items(bookmarks());
        assert_eq!(store.get_all(None).await.unwrap().len(), 3);
        assert_eq!(store.get_all(Some("u1")).await.unwrap().len(), 2);
        assert_eq!(store.count(&CacheScope::owner("u2")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_owner_scope_keeps_other_owners() {
        let store = MemoryStore::with_items(bookmarks());
        store
            .replace_all(&CacheScope::owner("u1"), vec![SavedRecipe::new("u1", "r9")])
            .await
            .unwrap();

        let u1 = store.get_all(Some("u1")).await.unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].recipe_id, "r9");
        assert_eq!(store.get_all(Some("u2")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_all_scope_replaces_everything() {
        let store = MemoryStore::with_items(bookmarks());
        store
            .replace_all(&CacheScope::All, vec![SavedRecipe::new("u3", "r4")])
            .await
            .unwrap();
        let all = store.get_all(None).await.unwrap();
        assert_eq!(all, vec![SavedRecipe::new("u3", "r4")]);
    }

    #[tokio::test]
    async fn test_upsert_and_delete() {
        let store = MemoryStore::new();
        store.upsert(SavedRecipe::new("u1", "r1")).await.unwrap();
        store.upsert(SavedRecipe::new("u1", "r1")).await.unwrap();
        assert_eq!(store.get_all(None).await.unwrap().len(), 1);

        assert!(store.delete("u1_r1").await.unwrap());
        assert!(!store.delete("u1_r1").await.unwrap());
        assert!(store.get_one("u1_r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_only_replace_all_marks_scope_complete() {
        let store = MemoryStore::new();
        store.upsert(SavedRecipe::new("u1", "r1")).await.unwrap();
        assert!(!store.is_complete(&CacheScope::owner("u1")).await.unwrap());

        store
            .replace_all(&CacheScope::owner("u1"), vec![SavedRecipe::new("u1", "r2")])
            .await
            .unwrap();
        assert!(store.is_complete(&CacheScope::owner("u1")).await.unwrap());
        assert!(!store.is_complete(&CacheScope::owner("u2")).await.unwrap());
        assert!(!store.is_complete(&CacheScope::All).await.unwrap());

        store.replace_all(&CacheScope::All, Vec::new()).await.unwrap();
        assert!(store.is_complete(&CacheScope::owner("u2")).await.unwrap());

        store.clear().await.unwrap();
        assert!(!store.is_complete(&CacheScope::All).await.unwrap());
    }

    #[tokio::test]
    async fn test_readers_keep_old_snapshot_during_swap() {
        let store = MemoryStore::synced(bookmarks());
        let before = store.snapshot().await;
        store.clear().await.unwrap();
        assert_eq!(before.rows.len(), 3);
        assert!(before.is_complete(&CacheScope::All));
        assert!(store.snapshot().await.rows.is_empty());
    }
}
