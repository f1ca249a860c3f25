pub mod recipes;
pub mod saved_recipes;
pub mod shopping_lists;

pub use recipes::RecipeRepository;
pub use saved_recipes::SavedRecipeRepository;
pub use shopping_lists::ShoppingListRepository;
