#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use recipe_sync::{
    Aggregate, CacheScope, CancelToken, Ingredient, IngredientLine, LocalStore, MemoryStore,
    Recipe, RemoteFilter, RemoteStore, Result, SavedRecipe, ShoppingList, ShoppingListItem,
    SyncError,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// 可控制失敗、延遲與取消時機的遠端
pub struct FakeRemote<T: Aggregate> {
    items: Mutex<Vec<T>>,
    failing: AtomicBool,
    gate: Option<Arc<Notify>>,
    cancel_on_fetch: Option<CancelToken>,
    fetch_all_calls: AtomicUsize,
    fetch_one_calls: AtomicUsize,
    put_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl<T: Aggregate> FakeRemote<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            failing: AtomicBool::new(false),
            gate: None,
            cancel_on_fetch: None,
            fetch_all_calls: AtomicUsize::new(0),
            fetch_one_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// fetch_all 會等到 gate 被通知才回傳
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// fetch_all / fetch_one 回傳前先取消 token，模擬資料到達時呼叫端剛好離開
    pub fn cancelling(mut self, token: CancelToken) -> Self {
        self.cancel_on_fetch = Some(token);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn set_items(&self, items: Vec<T>) {
        *self.items.lock().await = items;
    }

    pub async fn items(&self) -> Vec<T> {
        self.items.lock().await.clone()
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_one_calls(&self) -> usize {
        self.fetch_one_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::remote("simulated network failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Aggregate> RemoteStore<T> for FakeRemote<T> {
    async fn fetch_all(&self, filter: &RemoteFilter) -> Result<Vec<T>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.check_available()?;

        let items = self.items.lock().await.clone();
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }
        Ok(items
            .into_iter()
            .filter(|item| {
                filter
                    .owner_id
                    .as_deref()
                    .map_or(true, |owner| item.owner_id() == owner)
            })
            .collect())
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<T>> {
        self.fetch_one_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let found = self
            .items
            .lock()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned();
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }
        Ok(found)
    }

    async fn put(&self, item: &T) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut items = self.items.lock().await;
        items.retain(|existing| existing.id() != item.id());
        items.push(item.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.items.lock().await.retain(|item| item.id() != id);
        Ok(())
    }
}

/// 計算 replace_all 次數的本地快取
pub struct CountingLocal<T: Aggregate> {
    inner: MemoryStore<T>,
    replace_calls: AtomicUsize,
}

impl<T: Aggregate> CountingLocal<T> {
    /// 資料列只是零散寫入，沒有任何 scope 完整同步過
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: MemoryStore::with_items(items),
            replace_calls: AtomicUsize::new(0),
        }
    }

    /// 快取內容來自一次完整同步
    pub fn synced(items: Vec<T>) -> Self {
        Self {
            inner: MemoryStore::synced(items),
            replace_calls: AtomicUsize::new(0),
        }
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Aggregate> LocalStore<T> for CountingLocal<T> {
    async fn get_all(&self, owner: Option<&str>) -> Result<Vec<T>> {
        self.inner.get_all(owner).await
    }

    async fn get_one(&self, id: &str) -> Result<Option<T>> {
        self.inner.get_one(id).await
    }

    async fn replace_all(&self, scope: &CacheScope, items: Vec<T>) -> Result<()> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_all(scope, items).await
    }

    async fn upsert(&self, item: T) -> Result<()> {
        self.inner.upsert(item).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.inner.delete(id).await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }

    async fn count(&self, scope: &CacheScope) -> Result<usize> {
        self.inner.count(scope).await
    }

    async fn is_complete(&self, scope: &CacheScope) -> Result<bool> {
        self.inner.is_complete(scope).await
    }
}

pub fn ingredient(id: &str) -> Ingredient {
    Ingredient {
        id: id.to_string(),
        name: id.to_string(),
        image: format!("https://img.example.com/{}.png", id),
        category: "pantry".to_string(),
    }
}

pub fn recipe(id: &str, name: &str, owner: &str, categories: &[&str]) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        prep_time: 30,
        servings: 4,
        vegetarian: false,
        vegan: false,
        gluten_free: false,
        created_by: owner.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ingredients: vec![
            IngredientLine::new(ingredient("flour"), "200 g"),
            IngredientLine::new(ingredient("potato"), "5 kg"),
        ],
    }
}

pub fn shopping_list(id: &str, owner: &str) -> ShoppingList {
    ShoppingList {
        id: id.to_string(),
        name: format!("List {}", id),
        owner_id: owner.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
        items: vec![
            ShoppingListItem {
                ingredient: ingredient("milk"),
                quantity: "1 l".to_string(),
                checked: false,
            },
            ShoppingListItem {
                ingredient: ingredient("eggs"),
                quantity: "12".to_string(),
                checked: false,
            },
        ],
    }
}

pub fn bookmark(owner: &str, recipe_id: &str) -> SavedRecipe {
    SavedRecipe::new(owner, recipe_id)
}

pub fn ids<T: Aggregate>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}
