use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 可在本地快取與遠端之間同步的聚合
pub trait Aggregate: Clone + Send + Sync + Serialize + for<'de> Deserialize<'de> + 'static {
    /// 用於日誌與 scope 名稱
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn owner_id(&self) -> &str;
}

/// 快取中被視為權威資料的範圍
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheScope {
    All,
    Owner(String),
}

impl CacheScope {
    pub fn owner(owner_id: impl Into<String>) -> Self {
        CacheScope::Owner(owner_id.into())
    }

    pub fn owner_id(&self) -> Option<&str> {
        match self {
            CacheScope::All => None,
            CacheScope::Owner(id) => Some(id),
        }
    }

    /// `other` 的資料是否全部落在這個範圍內
    pub fn covers(&self, other: &CacheScope) -> bool {
        matches!(self, CacheScope::All) || self == other
    }

    pub fn contains<T: Aggregate>(&self, item: &T) -> bool {
        match self {
            CacheScope::All => true,
            CacheScope::Owner(id) => item.owner_id() == id,
        }
    }
}

impl fmt::Display for CacheScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheScope::All => write!(f, "all"),
            CacheScope::Owner(id) => write!(f, "owner:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

/// 食材與數量字串的對應，數量以 "200 g" 這類格式儲存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    pub ingredient: Ingredient,
    pub quantity: String,
}

impl IngredientLine {
    pub fn new(ingredient: Ingredient, quantity: impl Into<String>) -> Self {
        Self {
            ingredient,
            quantity: quantity.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 準備時間（分鐘）
    #[serde(default)]
    pub prep_time: u32,
    /// 所有數量字串對應的基準份量
    pub servings: u32,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

impl Recipe {
    pub fn name_matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }

    pub fn in_category(&self, category: &str) -> bool {
        let category = category.trim();
        category.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
    }
}

impl Aggregate for Recipe {
    const KIND: &'static str = "recipes";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.created_by
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub ingredient: Ingredient,
    pub quantity: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<ShoppingListItem>,
}

impl Aggregate for ShoppingList {
    const KIND: &'static str = "shopping_lists";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// 使用者收藏的食譜（純關聯）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
}

impl SavedRecipe {
    pub fn new(user_id: &str, recipe_id: &str) -> Self {
        Self {
            id: Self::bookmark_id(user_id, recipe_id),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
        }
    }

    pub fn bookmark_id(user_id: &str, recipe_id: &str) -> String {
        format!("{}_{}", user_id, recipe_id)
    }
}

impl Aggregate for SavedRecipe {
    const KIND: &'static str = "saved_recipes";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, categories: &[&str]) -> Recipe {
        Recipe {
            id: "r1".to_string(),
            name: name.to_string(),
            description: String::new(),
            prep_time: 10,
            servings: 2,
            vegetarian: false,
            vegan: false,
            gluten_free: false,
            created_by: "u1".to_string(),
            created_at: Utc::now(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ingredients: vec![],
        }
    }

    #[test]
    fn test_name_match_is_case_insensitive_substring() {
        let r = recipe("Creamy Tomato Pasta", &[]);
        assert!(r.name_matches("pasta"));
        assert!(r.name_matches("TOMATO"));
        assert!(r.name_matches(""));
        assert!(!r.name_matches("soup"));
    }

    #[test]
    fn test_category_membership() {
        let r = recipe("Pancakes", &["Breakfast", "Sweet"]);
        assert!(r.in_category("breakfast"));
        assert!(r.in_category(""));
        assert!(!r.in_category("Dinner"));
    }

    #[test]
    fn test_owner_scope_contains() {
        let r = recipe("Soup", &[]);
        assert!(CacheScope::All.contains(&r));
        assert!(CacheScope::owner("u1").contains(&r));
        assert!(!CacheScope::owner("u2").contains(&r));
        assert_eq!(CacheScope::owner("u1").to_string(), "owner:u1");
    }

    #[test]
    fn test_recipe_deserializes_from_document() {
        let doc = serde_json::json!({
            "id": "r9",
            "name": "Omelette",
            "servings": 1,
            "createdBy": "u7",
            "createdAt": "2024-03-01T08:00:00Z",
            "ingredients": [
                {"ingredient": {"id": "egg", "name": "Egg"}, "quantity": "3"}
            ]
        });
        let r: Recipe = serde_json::from_value(doc).unwrap();
        assert_eq!(r.owner_id(), "u7");
        assert_eq!(r.ingredients[0].quantity, "3");
        assert!(r.categories.is_empty());
    }

    #[test]
    fn test_bookmark_id_is_deterministic() {
        let saved = SavedRecipe::new("u1", "r5");
        assert_eq!(saved.id, "u1_r5");
        assert_eq!(saved.owner_id(), "u1");
    }
}
