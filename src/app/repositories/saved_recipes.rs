use crate::app::repositories::recipes::RecipeRepository;
use crate::core::cancel::CancelToken;
use crate::core::sync_policy::{FetchMode, SyncPolicy};
use crate::domain::model::{CacheScope, Recipe, SavedRecipe};
use crate::domain::ports::{LocalStore, RemoteStore};
use crate::utils::error::Result;
use crate::utils::monitor::RequestMonitor;
use std::sync::Arc;

/// 收藏的食譜。書籤本身只記錄 recipe id，內容透過 `RecipeRepository` 取得。
pub struct SavedRecipeRepository {
    policy: SyncPolicy<SavedRecipe>,
    recipes: Arc<RecipeRepository>,
    monitor: RequestMonitor,
}

impl SavedRecipeRepository {
    pub fn new(
        local: Arc<dyn LocalStore<SavedRecipe>>,
        remote: Arc<dyn RemoteStore<SavedRecipe>>,
        recipes: Arc<RecipeRepository>,
    ) -> Self {
        Self {
            policy: SyncPolicy::new(local, remote),
            recipes,
            monitor: RequestMonitor::new("saved_recipes"),
        }
    }

    pub fn monitor(&self) -> &RequestMonitor {
        &self.monitor
    }

    pub async fn get_user_saved_recipes(
        &self,
        owner_id: &str,
        query: &str,
        force_refresh: bool,
    ) -> Result<Vec<Recipe>> {
        self.get_user_saved_recipes_with_cancel(owner_id, query, force_refresh, &CancelToken::new())
            .await
    }

    pub async fn get_user_saved_recipes_with_cancel(
        &self,
        owner_id: &str,
        query: &str,
        force_refresh: bool,
        cancel: &CancelToken,
    ) -> Result<Vec<Recipe>> {
        let _in_flight = self.monitor.begin("get_user_saved_recipes");
        let bookmarks = self
            .policy
            .load(
                &CacheScope::owner(owner_id),
                FetchMode::from_force_refresh(force_refresh),
                cancel,
                |_| true,
            )
            .await?;

        let mut recipes = Vec::with_capacity(bookmarks.len());
        for bookmark in bookmarks {
            match self.recipes.find_recipe(&bookmark.recipe_id, cancel).await? {
                Some(recipe) if recipe.name_matches(query) => recipes.push(recipe),
                Some(_) => {}
                None => tracing::debug!(
                    "Bookmark {} points at missing recipe {}",
                    bookmark.id,
                    bookmark.recipe_id
                ),
            }
        }
        Ok(recipes)
    }

    pub async fn save_recipe(&self, owner_id: &str, recipe_id: &str) -> Result<SavedRecipe> {
        let _in_flight = self.monitor.begin("save_recipe");
        self.policy.put(SavedRecipe::new(owner_id, recipe_id)).await
    }

    pub async fn unsave_recipe(&self, owner_id: &str, recipe_id: &str) -> Result<bool> {
        let _in_flight = self.monitor.begin("unsave_recipe");
        self.policy
            .remove(&SavedRecipe::bookmark_id(owner_id, recipe_id))
            .await
    }

    /// 只看快取
    pub async fn is_recipe_saved(&self, owner_id: &str, recipe_id: &str) -> Result<bool> {
        let bookmark_id = SavedRecipe::bookmark_id(owner_id, recipe_id);
        Ok(self.policy.local().get_one(&bookmark_id).await?.is_some())
    }
}
