//! 快取與遠端的同步策略。
//!
//! 每個請求：`DecideSource -> {ReadCache | Refresh} -> Done`。
//! 刷新時依序執行 `fetch_all -> replace_all -> 讀取快取`，並以 scope 為單位互斥，
//! 所以同一個 scope 的讀取只會看到刷新前或刷新後的完整快照。

use crate::core::cancel::CancelToken;
use crate::domain::model::{Aggregate, CacheScope};
use crate::domain::ports::{LocalStore, RemoteFilter, RemoteStore};
use crate::utils::error::{Result, SyncError};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    CacheFirst,
    ForceRefresh,
}

impl FetchMode {
    pub fn from_force_refresh(force_refresh: bool) -> Self {
        if force_refresh {
            FetchMode::ForceRefresh
        } else {
            FetchMode::CacheFirst
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Refresh,
}

/// scope 在快取中的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheState {
    /// 是否曾由 `replace_all` 完整寫入過
    pub complete: bool,
    pub rows: usize,
}

/// 強制刷新，或 scope 沒有完整同步過、沒有資料時才去遠端
pub fn decide_source(mode: FetchMode, state: CacheState) -> Source {
    match mode {
        FetchMode::ForceRefresh => Source::Refresh,
        FetchMode::CacheFirst if !state.complete || state.rows == 0 => Source::Refresh,
        FetchMode::CacheFirst => Source::Cache,
    }
}

/// 每個 scope 一把刷新鎖；沒有人持有或等待時就從表中移除
#[derive(Default)]
struct ScopeLocks {
    locks: std::sync::Mutex<HashMap<CacheScope, Arc<Mutex<()>>>>,
}

impl ScopeLocks {
    fn lease(&self, scope: &CacheScope) -> ScopeLease<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(scope.clone()).or_default().clone();
        ScopeLease {
            locks: self,
            scope: scope.clone(),
            lock,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct ScopeLease<'a> {
    locks: &'a ScopeLocks,
    scope: CacheScope,
    lock: Arc<Mutex<()>>,
}

impl Drop for ScopeLease<'_> {
    fn drop(&mut self) {
        let mut locks = self
            .locks
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // 只剩表中與自己這兩份時，沒有其他請求在等
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.scope);
        }
    }
}

pub struct SyncPolicy<T: Aggregate> {
    local: Arc<dyn LocalStore<T>>,
    remote: Arc<dyn RemoteStore<T>>,
    scope_locks: ScopeLocks,
}

impl<T: Aggregate> SyncPolicy<T> {
    pub fn new(local: Arc<dyn LocalStore<T>>, remote: Arc<dyn RemoteStore<T>>) -> Self {
        Self {
            local,
            remote,
            scope_locks: ScopeLocks::default(),
        }
    }

    pub fn local(&self) -> &Arc<dyn LocalStore<T>> {
        &self.local
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore<T>> {
        &self.remote
    }

    /// 依 `mode` 決定資料來源，最後一律從快取讀出並套用 `filter`
    pub async fn load<F>(
        &self,
        scope: &CacheScope,
        mode: FetchMode,
        cancel: &CancelToken,
        filter: F,
    ) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        let state = self.cache_state(scope).await?;
        if decide_source(mode, state) == Source::Cache {
            tracing::debug!("{} [{}]: serving {} cached rows", T::KIND, scope, state.rows);
            return self.read_cache(scope, &filter).await;
        }
        if !state.complete {
            tracing::debug!("{} [{}]: scope never fully synced", T::KIND, scope);
        }

        let lease = self.scope_locks.lease(scope);
        let _guard = lease.lock.lock().await;

        // 等鎖期間可能已有其他請求完成刷新
        if mode == FetchMode::CacheFirst
            && decide_source(mode, self.cache_state(scope).await?) == Source::Cache
        {
            tracing::debug!("{} [{}]: refreshed by a concurrent request", T::KIND, scope);
            return self.read_cache(scope, &filter).await;
        }

        self.refresh_locked(scope, cancel).await?;
        self.read_cache(scope, &filter).await
    }

    async fn cache_state(&self, scope: &CacheScope) -> Result<CacheState> {
        Ok(CacheState {
            complete: self.local.is_complete(scope).await?,
            rows: self.local.count(scope).await?,
        })
    }

    /// 只讀快取，不碰遠端
    pub async fn read_cache<F>(&self, scope: &CacheScope, filter: &F) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        let rows = self.local.get_all(scope.owner_id()).await?;
        Ok(rows.into_iter().filter(|item| filter(item)).collect())
    }

    async fn refresh_locked(&self, scope: &CacheScope, cancel: &CancelToken) -> Result<usize> {
        tracing::debug!("{} [{}]: fetching from remote", T::KIND, scope);
        let remote_filter = RemoteFilter::from(scope);

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled::<T>(scope)),
            fetched = self.remote.fetch_all(&remote_filter) => fetched?,
        };

        let total = fetched.len();
        let in_scope: Vec<T> = fetched
            .into_iter()
            .filter(|item| scope.contains(item))
            .collect();
        if in_scope.len() != total {
            tracing::warn!(
                "{} [{}]: dropped {} rows outside the requested scope",
                T::KIND,
                scope,
                total - in_scope.len()
            );
        }

        if cancel.is_cancelled() {
            return Err(cancelled::<T>(scope));
        }

        let written = in_scope.len();
        self.local.replace_all(scope, in_scope).await?;
        tracing::info!("🔄 {} [{}]: cache replaced with {} rows", T::KIND, scope, written);
        Ok(written)
    }

    /// 先查快取，沒有的話向遠端取單筆並寫回快取
    pub async fn get_one(&self, id: &str, cancel: &CancelToken) -> Result<Option<T>> {
        if let Some(cached) = self.local.get_one(id).await? {
            return Ok(Some(cached));
        }

        tracing::debug!("{} {}: cache miss, asking remote", T::KIND, id);
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled::<T>(&CacheScope::All)),
            fetched = self.remote.fetch_one(id) => fetched?,
        };

        match fetched {
            Some(item) => {
                if cancel.is_cancelled() {
                    return Err(cancelled::<T>(&CacheScope::All));
                }
                self.local.upsert(item.clone()).await?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    /// 寫入遠端，成功後同步更新快取
    pub async fn put(&self, item: T) -> Result<T> {
        self.remote.put(&item).await?;
        self.local.upsert(item.clone()).await?;
        tracing::debug!("{} {}: written through", T::KIND, item.id());
        Ok(item)
    }

    /// 從遠端刪除，成功後在同一個操作內移除快取資料
    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.remote.delete(id).await?;
        let removed = self.local.delete(id).await?;
        tracing::debug!("{} {}: deleted (cached row removed: {})", T::KIND, id, removed);
        Ok(removed)
    }
}

fn cancelled<T: Aggregate>(scope: &CacheScope) -> SyncError {
    SyncError::Cancelled {
        scope: format!("{}/{}", T::KIND, scope),
    }
}
