use crate::core::scaler::{self, QuantityScaler, ScaleReport, UnparsedLine};
use crate::domain::model::{IngredientLine, Recipe, ShoppingList, ShoppingListItem};
use crate::utils::error::Result;
use crate::utils::validation::validate_servings;
use serde::Serialize;

/// 食譜詳細頁的資料：儲存的食譜（基準份量）加上目前顯示的份量與換算後的食材。
///
/// 顯示份量只存在記憶體中，換算永遠從 `recipe.ingredients` 重新計算。
#[derive(Debug, Clone, Serialize)]
pub struct RecipeWithIngredients {
    recipe: Recipe,
    displayed_servings: u32,
    ingredients: Vec<IngredientLine>,
    #[serde(skip)]
    unparsed: Vec<UnparsedLine>,
}

impl RecipeWithIngredients {
    pub fn new(recipe: Recipe) -> Self {
        if recipe.servings == 0 {
            tracing::warn!(
                "⚠️ Recipe {} has no baseline servings, treating it as 1",
                recipe.id
            );
        }
        let baseline = recipe.servings.max(1);
        let mut detail = Self {
            recipe,
            displayed_servings: baseline,
            ingredients: Vec::new(),
            unparsed: Vec::new(),
        };
        detail.rescale();
        detail
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn baseline_servings(&self) -> u32 {
        self.recipe.servings.max(1)
    }

    pub fn displayed_servings(&self) -> u32 {
        self.displayed_servings
    }

    pub fn ingredients(&self) -> &[IngredientLine] {
        &self.ingredients
    }

    /// 無法換算、以原字串顯示的食材
    pub fn unparsed(&self) -> &[UnparsedLine] {
        &self.unparsed
    }

    pub fn more_servings(&mut self) -> u32 {
        self.displayed_servings = scaler::more_servings(self.displayed_servings);
        self.rescale();
        self.displayed_servings
    }

    pub fn less_servings(&mut self) -> u32 {
        self.displayed_servings = scaler::less_servings(self.displayed_servings);
        self.rescale();
        self.displayed_servings
    }

    pub fn set_servings(&mut self, servings: u32) -> Result<u32> {
        self.displayed_servings = validate_servings(servings)?;
        self.rescale();
        Ok(self.displayed_servings)
    }

    fn rescale(&mut self) {
        let ScaleReport { lines, unparsed } =
            QuantityScaler::clamped(self.baseline_servings(), self.displayed_servings)
                .scale(&self.recipe.ingredients);
        self.ingredients = lines;
        self.unparsed = unparsed;
    }
}

/// 購物清單詳細頁。數量是絕對值，不做換算。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListWithIngredients {
    pub list: ShoppingList,
}

impl ShoppingListWithIngredients {
    pub fn new(list: ShoppingList) -> Self {
        Self { list }
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.list.items
    }

    pub fn pending(&self) -> impl Iterator<Item = &ShoppingListItem> {
        self.list.items.iter().filter(|item| !item.checked)
    }

    pub fn checked(&self) -> impl Iterator<Item = &ShoppingListItem> {
        self.list.items.iter().filter(|item| item.checked)
    }

    pub fn is_complete(&self) -> bool {
        self.list.items.iter().all(|item| item.checked)
    }
}
