use crate::domain::model::{Aggregate, CacheScope};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 裝置上的快取，每種聚合一個
#[async_trait]
pub trait LocalStore<T: Aggregate>: Send + Sync {
    /// `owner` 為 `None` 時回傳全部資料
    async fn get_all(&self, owner: Option<&str>) -> Result<Vec<T>>;

    async fn get_one(&self, id: &str) -> Result<Option<T>>;

    /// 以單一原子操作取代 `scope` 內的全部資料，讀取端只會看到舊的或新的快照
    async fn replace_all(&self, scope: &CacheScope, items: Vec<T>) -> Result<()>;

    async fn upsert(&self, item: T) -> Result<()>;

    /// 回傳是否真的刪除了資料
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn clear(&self) -> Result<()>;

    /// `scope` 是否已經由 `replace_all` 完整寫入過；單筆 `upsert` 不算
    async fn is_complete(&self, scope: &CacheScope) -> Result<bool>;

    async fn count(&self, scope: &CacheScope) -> Result<usize> {
        Ok(self.get_all(scope.owner_id()).await?.len())
    }
}

/// 遠端的資料來源（權威資料）
#[async_trait]
pub trait RemoteStore<T: Aggregate>: Send + Sync {
    async fn fetch_all(&self, filter: &RemoteFilter) -> Result<Vec<T>>;

    async fn fetch_one(&self, id: &str) -> Result<Option<T>>;

    /// 以 id 新增或覆寫文件
    async fn put(&self, item: &T) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFilter {
    pub owner_id: Option<String>,
}

impl From<&CacheScope> for RemoteFilter {
    fn from(scope: &CacheScope) -> Self {
        Self {
            owner_id: scope.owner_id().map(str::to_string),
        }
    }
}

pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// 固定身分，CLI 與測試使用
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn remote_base_url(&self) -> &str;
    fn cache_directory(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn user_id(&self) -> Option<&str>;
}
