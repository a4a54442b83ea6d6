use std::{collections::HashSet, sync::Arc};

use mealcal_mealplan::PlannedIngredient;
use mealcal_shared::{
    KeyValueStore, Result, ShoppingStore, parse_month, read_json,
    recipe::normalize_key,
    shopping::{NewShoppingItem, ShoppingItem, ShoppingItemPatch},
    write_json,
};
use validator::Validate;

pub const CACHE_KEY_PREFIX: &str = "shopping_list_cache_v1";

pub fn cache_key(month: &str) -> String {
    format!("{CACHE_KEY_PREFIX}:{month}")
}

/// Monthly shopping list backed by the remote store.
///
/// The local list is only changed after the remote call succeeded. When a
/// cache is attached, the last list seen for each month is kept there.
pub struct ShoppingList {
    store: Arc<dyn ShoppingStore>,
    cache: Option<Arc<dyn KeyValueStore>>,
    month: Option<String>,
    items: Vec<ShoppingItem>,
}

impl ShoppingList {
    pub fn new(store: Arc<dyn ShoppingStore>) -> Self {
        Self {
            store,
            cache: None,
            month: None,
            items: vec![],
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn KeyValueStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn estimated_total(&self) -> i64 {
        self.items.iter().map(|item| item.estimated_cost).sum()
    }

    pub async fn list(&mut self, month: &str) -> Result<&[ShoppingItem]> {
        let month = month.trim();
        parse_month(month)?;

        let items = self
            .store
            .fetch_shopping_list(month)
            .await
            .inspect_err(|err| tracing::warn!(month, error = %err, "failed to load shopping list"))?;

        tracing::debug!(month, count = items.len(), "shopping list loaded");

        self.month = Some(month.to_owned());
        self.items = items;
        self.refresh_cache().await;

        Ok(&self.items)
    }

    /// Last list stored for `month`, without touching the remote store.
    pub async fn cached(&self, month: &str) -> Result<Option<Vec<ShoppingItem>>> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };

        read_json(cache.as_ref(), &cache_key(month.trim())).await
    }

    pub async fn add(&mut self, input: NewShoppingItem) -> Result<ShoppingItem> {
        input.validate()?;

        let created = self.store.add_shopping_item(&input).await?;
        tracing::info!(
            id = %created.id,
            name = %created.name,
            month = %created.month,
            "shopping item added"
        );

        if self.month.as_deref() == Some(created.month.as_str()) {
            self.items.push(created.clone());
            self.refresh_cache().await;
        }

        Ok(created)
    }

    pub async fn remove(&mut self, id: &str) -> Result<()> {
        self.store.delete_shopping_item(id).await?;
        tracing::info!(id, "shopping item removed");

        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.refresh_cache().await;
        }

        Ok(())
    }

    pub async fn set_checked(&mut self, id: &str, checked: bool) -> Result<()> {
        let patch = ShoppingItemPatch::checked(checked);
        self.store.update_shopping_item(id, &patch).await?;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            patch.apply(item);
            self.refresh_cache().await;
        }

        Ok(())
    }

    /// Adds every planned ingredient missing from the month's list, matched
    /// by normalized name. Returns the items created.
    pub async fn sync_planned(
        &mut self,
        planned: &[PlannedIngredient],
        month: &str,
    ) -> Result<Vec<ShoppingItem>> {
        self.list(month).await?;

        let mut present: HashSet<String> = self
            .items
            .iter()
            .map(|item| normalize_key(&item.name))
            .collect();

        let mut added = vec![];
        for ingredient in planned {
            if !present.insert(ingredient.key.to_owned()) {
                continue;
            }

            let item = self
                .add(NewShoppingItem::new(&ingredient.name, 0, month))
                .await?;
            added.push(item);
        }

        tracing::info!(month, added = added.len(), "planned ingredients synced");

        Ok(added)
    }

    async fn refresh_cache(&self) {
        let (Some(cache), Some(month)) = (&self.cache, &self.month) else {
            return;
        };

        if let Err(err) = write_json(cache.as_ref(), &cache_key(month), &self.items).await {
            tracing::warn!(month = %month, error = %err, "failed to cache shopping list");
        }
    }
}
