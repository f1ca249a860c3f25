//! 數量字串（例如 `"200 g"`、`"1.5 cup"`、`"4"`）的解析與格式化。
//!
//! 文法：開頭為數字（整數或小數，`.` 為小數點），後面可接以空白分隔的單位。
//! 單位 `-` 代表「沒有單位」。格式化時數字固定兩位小數。

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// 代表「沒有單位」的佔位符
pub const NO_UNIT: &str = "-";

const DISPLAY_SCALE: u32 = 2;

static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-)?(\d+(?:\.\d*)?|\.\d+)(?:\s+(.*?))?\s*$").expect("quantity pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityParseError {
    #[error("quantity is empty")]
    Empty,

    #[error("quantity '{0}' has no leading amount")]
    MissingAmount(String),

    #[error("quantity '{0}' is negative")]
    Negative(String),

    #[error("quantity '{0}' has an amount that cannot be represented")]
    InvalidNumber(String),

    #[error("quantity '{0}' is too large to scale")]
    Overflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityValue {
    pub amount: Decimal,
    /// 空字串代表沒有單位
    pub unit: String,
}

impl QuantityValue {
    pub fn new(amount: Decimal, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self {
            amount,
            unit: normalize_unit(&unit),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, QuantityParseError> {
        if raw.trim().is_empty() {
            return Err(QuantityParseError::Empty);
        }

        let caps = QUANTITY_PATTERN
            .captures(raw)
            .ok_or_else(|| QuantityParseError::MissingAmount(raw.to_string()))?;

        let number = &caps[2];
        if caps.get(1).is_some() {
            // "-0" 也一律視為負數輸入
            return Err(QuantityParseError::Negative(raw.to_string()));
        }

        let amount = parse_amount(number)
            .ok_or_else(|| QuantityParseError::InvalidNumber(raw.to_string()))?;
        let unit = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

        Ok(Self::new(amount, unit))
    }

    /// 以 `numerator / denominator` 縮放，先乘後除以保留精度；超出 `Decimal` 範圍時回傳 `Overflow`
    pub fn scaled(&self, numerator: u32, denominator: u32) -> Result<Self, QuantityParseError> {
        let denominator = denominator.max(1);
        let amount = self
            .amount
            .checked_mul(Decimal::from(numerator))
            .and_then(|product| product.checked_div(Decimal::from(denominator)))
            .ok_or_else(|| QuantityParseError::Overflow(self.to_string()))?;

        Ok(Self {
            amount,
            unit: self.unit.clone(),
        })
    }

    pub fn has_unit(&self) -> bool {
        !self.unit.is_empty()
    }

    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl FromStr for QuantityValue {
    type Err = QuantityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .amount
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if self.has_unit() {
            write!(f, "{:.2} {}", rounded, self.unit)
        } else {
            write!(f, "{:.2}", rounded)
        }
    }
}

fn parse_amount(number: &str) -> Option<Decimal> {
    let mut normalized = String::with_capacity(number.len() + 2);
    if number.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(number);
    if normalized.ends_with('.') {
        normalized.push('0');
    }
    Decimal::from_str(&normalized).ok()
}

fn normalize_unit(unit: &str) -> String {
    let unit = unit.trim();
    if unit == NO_UNIT {
        String::new()
    } else {
        unit.to_string()
    }
}
