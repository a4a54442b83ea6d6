use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;

use crate::iso_date;

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    #[default]
    Lunch,
    Dinner,
}

/// A slot as the remote meal store reports it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MealRecord {
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(rename = "type", default)]
    pub meal_type: MealType,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub recipe_cost: Option<i64>,
}

impl MealRecord {
    pub fn new(date: Date, meal_type: MealType, recipe_name: Option<String>) -> Self {
        Self {
            date,
            meal_type,
            recipe_name,
            recipe_id: None,
            recipe_cost: None,
        }
    }

    /// Assigned recipe; the empty-string clear marker reads as `None`.
    pub fn recipe(&self) -> Option<&str> {
        self.recipe_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// A slot as written to the remote meal store. An empty `recipe_name`
/// marks a slot the user explicitly cleared.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MealWrite {
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub recipe_id: Option<String>,
    pub recipe_name: String,
    pub recipe_cost: i64,
}

impl From<MealWrite> for MealRecord {
    fn from(value: MealWrite) -> Self {
        Self {
            date: value.date,
            meal_type: value.meal_type,
            recipe_name: Some(value.recipe_name),
            recipe_id: value.recipe_id,
            recipe_cost: Some(value.recipe_cost),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveAck {
    #[serde(default)]
    pub count: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TemplateItem {
    pub day_offset: u8,
    pub recipe_name: String,
}

/// Reusable weekly lunch pattern. Offsets count from the Monday of the week
/// it was captured from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
}
