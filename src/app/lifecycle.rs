//! 請求的生命週期事件：開始、成功、失敗。
//!
//! 不綁定任何串流型別，呼叫端傳入一般的 callback 即可。

use crate::utils::error::{Result, SyncError};
use std::future::Future;

#[derive(Debug)]
pub enum LoadEvent<'a, T> {
    Started,
    Succeeded(&'a T),
    Failed(&'a SyncError),
}

/// 執行 `operation`，依序把事件送給 `sink`，並原樣回傳結果
pub async fn observe<T, Fut, F>(operation: Fut, mut sink: F) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
    F: FnMut(LoadEvent<'_, T>),
{
    sink(LoadEvent::Started);
    let result = operation.await;
    match &result {
        Ok(value) => sink(LoadEvent::Succeeded(value)),
        Err(error) => sink(LoadEvent::Failed(error)),
    }
    result
}

/// 畫面可直接持有的載入狀態
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T: Clone> LoadState<T> {
    pub fn apply(&mut self, event: LoadEvent<'_, T>) {
        *self = match event {
            LoadEvent::Started => LoadState::Loading,
            LoadEvent::Succeeded(value) => LoadState::Ready(value.clone()),
            LoadEvent::Failed(error) => LoadState::Failed(error.user_friendly_message()),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}
