use async_trait::async_trait;
use time::Date;

use crate::{
    RemoteError,
    mealplan::{MealRecord, MealWrite, SaveAck},
    recipe::Recipe,
    shopping::{NewShoppingItem, ShoppingItem, ShoppingItemPatch},
};

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn fetch_recipes(&self, limit: usize) -> RemoteResult<Vec<Recipe>>;
}

#[async_trait]
pub trait MealStore: Send + Sync {
    /// Meals with `start <= date <= end`.
    async fn fetch_meals(&self, start: Date, end: Date) -> RemoteResult<Vec<MealRecord>>;

    /// Upserts every slot in `meals`, keyed by date and meal type.
    async fn save_meals(&self, meals: Vec<MealWrite>) -> RemoteResult<SaveAck>;
}

#[async_trait]
pub trait ShoppingStore: Send + Sync {
    async fn fetch_shopping_list(&self, month: &str) -> RemoteResult<Vec<ShoppingItem>>;

    async fn add_shopping_item(&self, item: &NewShoppingItem) -> RemoteResult<ShoppingItem>;

    async fn update_shopping_item(&self, id: &str, patch: &ShoppingItemPatch)
    -> RemoteResult<()>;

    async fn delete_shopping_item(&self, id: &str) -> RemoteResult<()>;
}
