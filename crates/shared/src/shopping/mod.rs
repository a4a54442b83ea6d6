use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub estimated_cost: i64,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub is_checked: bool,
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
pub struct NewShoppingItem {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 0))]
    pub estimated_cost: i64,
    #[validate(custom(function = "validate_month"))]
    pub month: String,
}

impl NewShoppingItem {
    pub fn new(name: impl Into<String>, estimated_cost: i64, month: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_owned(),
            estimated_cost,
            month: month.into().trim().to_owned(),
        }
    }

    pub fn into_item(self, id: impl Into<String>) -> ShoppingItem {
        ShoppingItem {
            id: id.into(),
            name: self.name,
            estimated_cost: self.estimated_cost,
            month: self.month,
            is_checked: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ShoppingItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
}

impl ShoppingItemPatch {
    pub fn checked(is_checked: bool) -> Self {
        Self {
            is_checked: Some(is_checked),
            ..Default::default()
        }
    }

    pub fn apply(&self, item: &mut ShoppingItem) {
        if let Some(name) = &self.name {
            item.name = name.to_owned();
        }
        if let Some(cost) = self.estimated_cost {
            item.estimated_cost = cost;
        }
        if let Some(checked) = self.is_checked {
            item.is_checked = checked;
        }
    }
}

fn validate_month(value: &str) -> Result<(), ValidationError> {
    crate::parse_month(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("month"))
}
