use serde::{Deserialize, Serialize};

/// A dish from the household catalog. `name` is the catalog key.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, cost: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            cost,
            ingredients: vec![],
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }
}

/// Key used to compare ingredient and item names: trimmed, lower-cased,
/// inner whitespace collapsed.
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
