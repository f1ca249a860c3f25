use crate::adapters::{HttpRemoteStore, JsonFileStore};
use crate::app::repositories::{RecipeRepository, SavedRecipeRepository, ShoppingListRepository};
use crate::core::scaler::{self, ScaleReport};
use crate::domain::model::{IngredientLine, Recipe, SavedRecipe, ShoppingList};
use crate::domain::ports::{ConfigProvider, IdentityProvider, LocalStore, RemoteStore};
use crate::utils::error::{Result, SyncError};
use std::sync::Arc;

/// 三種聚合各自的本地與遠端存放處
pub struct Stores {
    pub recipes_local: Arc<dyn LocalStore<Recipe>>,
    pub recipes_remote: Arc<dyn RemoteStore<Recipe>>,
    pub shopping_lists_local: Arc<dyn LocalStore<ShoppingList>>,
    pub shopping_lists_remote: Arc<dyn RemoteStore<ShoppingList>>,
    pub saved_recipes_local: Arc<dyn LocalStore<SavedRecipe>>,
    pub saved_recipes_remote: Arc<dyn RemoteStore<SavedRecipe>>,
}

impl Stores {
    /// JSON 檔快取 + HTTP 遠端
    pub async fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let dir = config.cache_directory();
        Ok(Self {
            recipes_local: Arc::new(JsonFileStore::<Recipe>::open(dir).await?),
            recipes_remote: Arc::new(HttpRemoteStore::<Recipe>::from_config(config)?),
            shopping_lists_local: Arc::new(JsonFileStore::<ShoppingList>::open(dir).await?),
            shopping_lists_remote: Arc::new(HttpRemoteStore::<ShoppingList>::from_config(config)?),
            saved_recipes_local: Arc::new(JsonFileStore::<SavedRecipe>::open(dir).await?),
            saved_recipes_remote: Arc::new(HttpRemoteStore::<SavedRecipe>::from_config(config)?),
        })
    }
}

/// 程式啟動時組裝一次，之後以參考傳給使用端
pub struct RecipeBook {
    recipes: Arc<RecipeRepository>,
    shopping_lists: ShoppingListRepository,
    saved_recipes: SavedRecipeRepository,
    identity: Arc<dyn IdentityProvider>,
}

impl RecipeBook {
    pub fn new(stores: Stores, identity: Arc<dyn IdentityProvider>) -> Self {
        let recipes = Arc::new(RecipeRepository::new(
            stores.recipes_local,
            stores.recipes_remote,
        ));
        let shopping_lists =
            ShoppingListRepository::new(stores.shopping_lists_local, stores.shopping_lists_remote);
        let saved_recipes = SavedRecipeRepository::new(
            stores.saved_recipes_local,
            stores.saved_recipes_remote,
            recipes.clone(),
        );

        Self {
            recipes,
            shopping_lists,
            saved_recipes,
            identity,
        }
    }

    pub async fn open<C: ConfigProvider>(config: &C, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
        Ok(Self::new(Stores::from_config(config).await?, identity))
    }

    pub fn recipes(&self) -> &RecipeRepository {
        &self.recipes
    }

    pub fn shopping_lists(&self) -> &ShoppingListRepository {
        &self.shopping_lists
    }

    pub fn saved_recipes(&self) -> &SavedRecipeRepository {
        &self.saved_recipes
    }

    /// 任一 repository 有請求進行中
    pub fn is_busy(&self) -> bool {
        self.recipes.monitor().is_in_flight()
            || self.shopping_lists.monitor().is_in_flight()
            || self.saved_recipes.monitor().is_in_flight()
    }

    pub fn current_user(&self) -> Result<String> {
        self.identity.current_user_id().ok_or(SyncError::NotSignedIn)
    }

    pub async fn my_recipes(&self) -> Result<Vec<Recipe>> {
        let user = self.current_user()?;
        self.recipes.get_user_recipes(&user).await
    }

    pub async fn my_shopping_lists(&self, force_refresh: bool) -> Result<Vec<ShoppingList>> {
        let user = self.current_user()?;
        self.shopping_lists
            .get_user_shopping_lists(&user, force_refresh)
            .await
    }

    pub async fn my_saved_recipes(&self, query: &str, force_refresh: bool) -> Result<Vec<Recipe>> {
        let user = self.current_user()?;
        self.saved_recipes
            .get_user_saved_recipes(&user, query, force_refresh)
            .await
    }

    pub async fn save_for_me(&self, recipe_id: &str) -> Result<SavedRecipe> {
        let user = self.current_user()?;
        self.saved_recipes.save_recipe(&user, recipe_id).await
    }

    pub async fn unsave_for_me(&self, recipe_id: &str) -> Result<bool> {
        let user = self.current_user()?;
        self.saved_recipes.unsave_recipe(&user, recipe_id).await
    }

    pub fn scale_ingredients(
        &self,
        lines: &[IngredientLine],
        baseline_servings: u32,
        target_servings: u32,
    ) -> Result<ScaleReport> {
        scaler::scale_ingredients(lines, baseline_servings, target_servings)
    }
}
