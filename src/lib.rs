pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{HttpRemoteStore, JsonFileStore, MemoryStore};
pub use app::lifecycle::{observe, LoadEvent, LoadState};
pub use app::recipe_book::{RecipeBook, Stores};
pub use app::recipe_detail::{RecipeWithIngredients, ShoppingListWithIngredients};
pub use app::repositories::{RecipeRepository, SavedRecipeRepository, ShoppingListRepository};
pub use config::TomlConfig;
pub use crate::core::cancel::CancelToken;
pub use crate::core::quantity::{QuantityParseError, QuantityValue};
pub use crate::core::scaler::{scale_ingredients, QuantityScaler, ScaleReport};
pub use crate::core::sync_policy::{FetchMode, SyncPolicy};
pub use domain::model::{
    Aggregate, CacheScope, Ingredient, IngredientLine, Recipe, SavedRecipe, ShoppingList,
    ShoppingListItem,
};
pub use domain::ports::{IdentityProvider, LocalStore, RemoteFilter, RemoteStore, StaticIdentity};
pub use utils::error::{Result, SyncError};
