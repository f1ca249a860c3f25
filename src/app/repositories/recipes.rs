use crate::app::recipe_detail::RecipeWithIngredients;
use crate::core::cancel::CancelToken;
use crate::core::sync_policy::{FetchMode, SyncPolicy};
use crate::domain::model::{CacheScope, Recipe};
use crate::domain::ports::{LocalStore, RemoteStore};
use crate::utils::error::Result;
use crate::utils::monitor::RequestMonitor;
use std::sync::Arc;

pub struct RecipeRepository {
    policy: SyncPolicy<Recipe>,
    monitor: RequestMonitor,
}

impl RecipeRepository {
    pub fn new(local: Arc<dyn LocalStore<Recipe>>, remote: Arc<dyn RemoteStore<Recipe>>) -> Self {
        Self {
            policy: SyncPolicy::new(local, remote),
            monitor: RequestMonitor::new("recipes"),
        }
    }

    pub fn monitor(&self) -> &RequestMonitor {
        &self.monitor
    }

    /// 全部公開食譜，依名稱（不分大小寫的子字串）與分類篩選；空字串代表不篩選
    pub async fn get_recipes(
        &self,
        force_refresh: bool,
        query: &str,
        category: &str,
    ) -> Result<Vec<Recipe>> {
        self.get_recipes_with_cancel(force_refresh, query, category, &CancelToken::new())
            .await
    }

    pub async fn get_recipes_with_cancel(
        &self,
        force_refresh: bool,
        query: &str,
        category: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Recipe>> {
        let _in_flight = self.monitor.begin("get_recipes");
        self.policy
            .load(
                &CacheScope::All,
                FetchMode::from_force_refresh(force_refresh),
                cancel,
                |recipe| recipe.name_matches(query) && recipe.in_category(category),
            )
            .await
    }

    /// 使用者自己建立的食譜，一律快取優先
    pub async fn get_user_recipes(&self, owner_id: &str) -> Result<Vec<Recipe>> {
        self.get_user_recipes_with_cancel(owner_id, &CancelToken::new())
            .await
    }

    pub async fn get_user_recipes_with_cancel(
        &self,
        owner_id: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Recipe>> {
        let _in_flight = self.monitor.begin("get_user_recipes");
        self.policy
            .load(
                &CacheScope::owner(owner_id),
                FetchMode::CacheFirst,
                cancel,
                |_| true,
            )
            .await
    }

    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Option<RecipeWithIngredients>> {
        self.get_recipe_with_cancel(recipe_id, &CancelToken::new())
            .await
    }

    pub async fn get_recipe_with_cancel(
        &self,
        recipe_id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<RecipeWithIngredients>> {
        let _in_flight = self.monitor.begin("get_recipe");
        Ok(self
            .find_recipe(recipe_id, cancel)
            .await?
            .map(RecipeWithIngredients::new))
    }

    pub(crate) async fn find_recipe(
        &self,
        recipe_id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Recipe>> {
        self.policy.get_one(recipe_id, cancel).await
    }

    pub async fn add_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        let _in_flight = self.monitor.begin("add_recipe");
        self.policy.put(recipe).await
    }

    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<bool> {
        let _in_flight = self.monitor.begin("delete_recipe");
        self.policy.remove(recipe_id).await
    }
}
