use crate::domain::model::Aggregate;
use crate::domain::ports::{ConfigProvider, RemoteFilter, RemoteStore};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::marker::PhantomData;
use std::time::Duration;
use url::Url;

/// 以 REST 風格 JSON API 存取遠端文件集合：
///
/// - `GET    {base}/{kind}`（`?owner=` 篩選擁有者）
/// - `GET    {base}/{kind}/{id}`（404 視為不存在）
/// - `PUT    {base}/{kind}/{id}`
/// - `DELETE {base}/{kind}/{id}`
pub struct HttpRemoteStore<T: Aggregate> {
    client: Client,
    collection_url: Url,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Aggregate> HttpRemoteStore<T> {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let invalid = |reason: String| SyncError::InvalidConfigValueError {
            field: "remote.base_url".to_string(),
            value: base_url.to_string(),
            reason,
        };

        let mut collection_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        collection_url
            .path_segments_mut()
            .map_err(|_| invalid("URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .push(T::KIND);

        Ok(Self {
            client,
            collection_url,
            _marker: PhantomData,
        })
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::new(client, base_url)
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_timeout(config.remote_base_url(), config.request_timeout())
    }

    pub fn collection_url(&self) -> &str {
        self.collection_url.as_str()
    }

    /// id 當作單一路徑片段，`/`、`?`、`#` 等字元會被編碼
    fn item_url(&self, id: &str) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }
}

fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SyncError::remote(format!("{} returned HTTP {}", action, status)))
    }
}

#[async_trait]
impl<T: Aggregate> RemoteStore<T> for HttpRemoteStore<T> {
    async fn fetch_all(&self, filter: &RemoteFilter) -> Result<Vec<T>> {
        let mut request = self.client.get(self.collection_url.clone());
        if let Some(owner) = &filter.owner_id {
            request = request.query(&[("owner", owner)]);
        }

        tracing::debug!("GET {} (owner: {:?})", self.collection_url, filter.owner_id);
        let response = ensure_success(request.send().await?, "fetch_all")?;
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<T>> {
        let url = self.item_url(id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, "fetch_one")?;
        Ok(Some(response.json::<T>().await?))
    }

    async fn put(&self, item: &T) -> Result<()> {
        let url = self.item_url(item.id());
        tracing::debug!("PUT {}", url);
        ensure_success(self.client.put(url).json(item).send().await?, "put")?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        // 已經不存在也算刪除成功
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success(response, "delete")?;
        Ok(())
    }
}
