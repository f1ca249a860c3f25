//! 依份量等比例縮放食材數量。
//!
//! 每次縮放都從儲存的基準數量重新計算，不會從上一次縮放結果累積。

use crate::core::quantity::{QuantityParseError, QuantityValue};
use crate::domain::model::{Ingredient, IngredientLine};
use crate::utils::error::Result;
use crate::utils::validation::validate_servings;

/// 無法解析而原樣保留的食材
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedLine {
    pub ingredient: Ingredient,
    pub quantity: String,
    pub error: QuantityParseError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScaleReport {
    /// 與輸入順序相同，無法解析的項目保留原字串
    pub lines: Vec<IngredientLine>,
    pub unparsed: Vec<UnparsedLine>,
}

impl ScaleReport {
    pub fn is_clean(&self) -> bool {
        self.unparsed.is_empty()
    }

    pub fn quantity_of(&self, ingredient_id: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.ingredient.id == ingredient_id)
            .map(|line| line.quantity.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityScaler {
    baseline_servings: u32,
    target_servings: u32,
}

impl QuantityScaler {
    pub fn new(baseline_servings: u32, target_servings: u32) -> Result<Self> {
        Ok(Self {
            baseline_servings: validate_servings(baseline_servings)?,
            target_servings: validate_servings(target_servings)?,
        })
    }

    /// 份量小於 1 時以 1 計算
    pub fn clamped(baseline_servings: u32, target_servings: u32) -> Self {
        Self {
            baseline_servings: baseline_servings.max(1),
            target_servings: target_servings.max(1),
        }
    }

    pub fn baseline_servings(&self) -> u32 {
        self.baseline_servings
    }

    pub fn target_servings(&self) -> u32 {
        self.target_servings
    }

    pub fn scale_quantity(&self, raw: &str) -> std::result::Result<String, QuantityParseError> {
        let value = QuantityValue::parse(raw)?;
        Ok(value
            .scaled(self.target_servings, self.baseline_servings)?
            .format())
    }

    pub fn scale(&self, lines: &[IngredientLine]) -> ScaleReport {
        let mut report = ScaleReport {
            lines: Vec::with_capacity(lines.len()),
            unparsed: Vec::new(),
        };

        for line in lines {
            match self.scale_quantity(&line.quantity) {
                Ok(quantity) => report
                    .lines
                    .push(IngredientLine::new(line.ingredient.clone(), quantity)),
                Err(error) => {
                    tracing::warn!(
                        "⚠️ Leaving '{}' unscaled: {}",
                        line.ingredient.name,
                        error
                    );
                    report.lines.push(line.clone());
                    report.unparsed.push(UnparsedLine {
                        ingredient: line.ingredient.clone(),
                        quantity: line.quantity.clone(),
                        error,
                    });
                }
            }
        }

        report
    }
}

/// 將 `lines`（對應 `baseline_servings` 份）縮放成 `target_servings` 份
pub fn scale_ingredients(
    lines: &[IngredientLine],
    baseline_servings: u32,
    target_servings: u32,
) -> Result<ScaleReport> {
    Ok(QuantityScaler::new(baseline_servings, target_servings)?.scale(lines))
}

/// 份量加一
pub fn more_servings(current: u32) -> u32 {
    current.saturating_add(1).max(1)
}

/// 份量減一，最少為 1
pub fn less_servings(current: u32) -> u32 {
    current.saturating_sub(1).max(1)
}
