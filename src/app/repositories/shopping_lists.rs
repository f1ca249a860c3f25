use crate::app::recipe_detail::ShoppingListWithIngredients;
use crate::core::cancel::CancelToken;
use crate::core::sync_policy::{FetchMode, SyncPolicy};
use crate::domain::model::{CacheScope, ShoppingList};
use crate::domain::ports::{LocalStore, RemoteStore};
use crate::utils::error::Result;
use crate::utils::monitor::RequestMonitor;
use std::sync::Arc;

pub struct ShoppingListRepository {
    policy: SyncPolicy<ShoppingList>,
    monitor: RequestMonitor,
}

impl ShoppingListRepository {
    pub fn new(
        local: Arc<dyn LocalStore<ShoppingList>>,
        remote: Arc<dyn RemoteStore<ShoppingList>>,
    ) -> Self {
        Self {
            policy: SyncPolicy::new(local, remote),
            monitor: RequestMonitor::new("shopping_lists"),
        }
    }

    pub fn monitor(&self) -> &RequestMonitor {
        &self.monitor
    }

    pub async fn get_user_shopping_lists(
        &self,
        owner_id: &str,
        force_refresh: bool,
    ) -> Result<Vec<ShoppingList>> {
        self.get_user_shopping_lists_with_cancel(owner_id, force_refresh, &CancelToken::new())
            .await
    }

    pub async fn get_user_shopping_lists_with_cancel(
        &self,
        owner_id: &str,
        force_refresh: bool,
        cancel: &CancelToken,
    ) -> Result<Vec<ShoppingList>> {
        let _in_flight = self.monitor.begin("get_user_shopping_lists");
        self.policy
            .load(
                &CacheScope::owner(owner_id),
                FetchMode::from_force_refresh(force_refresh),
                cancel,
                |_| true,
            )
            .await
    }

    pub async fn get_shopping_list(&self, id: &str) -> Result<Option<ShoppingListWithIngredients>> {
        self.get_shopping_list_with_cancel(id, &CancelToken::new())
            .await
    }

    pub async fn get_shopping_list_with_cancel(
        &self,
        id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<ShoppingListWithIngredients>> {
        let _in_flight = self.monitor.begin("get_shopping_list");
        Ok(self
            .policy
            .get_one(id, cancel)
            .await?
            .map(ShoppingListWithIngredients::new))
    }

    pub async fn add_shopping_list(&self, list: ShoppingList) -> Result<ShoppingList> {
        let _in_flight = self.monitor.begin("add_shopping_list");
        self.policy.put(list).await
    }

    pub async fn delete_shopping_list(&self, id: &str) -> Result<bool> {
        let _in_flight = self.monitor.begin("delete_shopping_list");
        self.policy.remove(id).await
    }

    /// 勾選或取消勾選清單中的食材；清單或食材不存在時回傳 `None`
    pub async fn set_item_checked(
        &self,
        list_id: &str,
        ingredient_id: &str,
        checked: bool,
    ) -> Result<Option<ShoppingListWithIngredients>> {
        let _in_flight = self.monitor.begin("set_item_checked");
        let Some(mut list) = self.policy.get_one(list_id, &CancelToken::new()).await? else {
            return Ok(None);
        };

        let Some(item) = list
            .items
            .iter_mut()
            .find(|item| item.ingredient.id == ingredient_id)
        else {
            return Ok(None);
        };
        if item.checked == checked {
            return Ok(Some(ShoppingListWithIngredients::new(list)));
        }
        item.checked = checked;

        let list = self.policy.put(list).await?;
        Ok(Some(ShoppingListWithIngredients::new(list)))
    }
}
