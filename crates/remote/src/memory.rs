use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use mealcal_shared::{
    MealStore, RecipeCatalog, RemoteError, RemoteResult, ShoppingStore,
    mealplan::{MealRecord, MealType, MealWrite, SaveAck},
    recipe::Recipe,
    shopping::{NewShoppingItem, ShoppingItem, ShoppingItemPatch},
};
use time::Date;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchRecipes,
    FetchMeals,
    SaveMeals,
    FetchShoppingList,
    AddShoppingItem,
    UpdateShoppingItem,
    DeleteShoppingItem,
}

#[derive(Default)]
struct State {
    recipes: Vec<Recipe>,
    meals: BTreeMap<(Date, MealType), MealRecord>,
    shopping: Vec<ShoppingItem>,
    next_id: u64,
    failures: HashMap<Operation, VecDeque<RemoteError>>,
    calls: HashMap<Operation, usize>,
}

impl State {
    fn enter(&mut self, operation: Operation) -> RemoteResult<()> {
        *self.calls.entry(operation).or_default() += 1;

        match self
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-process stand-in for the household API.
///
/// Meals are upserted by `(date, type)` like the real store. Failures can be
/// queued per operation; each queued error is returned once, in order.
#[derive(Default)]
pub struct MemoryRemote {
    state: Mutex<State>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            state: Mutex::new(State {
                recipes,
                ..Default::default()
            }),
        }
    }

    pub async fn set_recipes(&self, recipes: Vec<Recipe>) {
        self.state.lock().await.recipes = recipes;
    }

    pub async fn insert_meal(&self, record: MealRecord) {
        self.state
            .lock()
            .await
            .meals
            .insert((record.date, record.meal_type), record);
    }

    pub async fn meals(&self) -> Vec<MealRecord> {
        self.state.lock().await.meals.values().cloned().collect()
    }

    pub async fn shopping_items(&self) -> Vec<ShoppingItem> {
        self.state.lock().await.shopping.clone()
    }

    pub async fn fail_next(&self, operation: Operation, err: RemoteError) {
        self.state
            .lock()
            .await
            .failures
            .entry(operation)
            .or_default()
            .push_back(err);
    }

    pub async fn calls(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecipeCatalog for MemoryRemote {
    async fn fetch_recipes(&self, limit: usize) -> RemoteResult<Vec<Recipe>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::FetchRecipes)?;

        Ok(state.recipes.iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl MealStore for MemoryRemote {
    async fn fetch_meals(&self, start: Date, end: Date) -> RemoteResult<Vec<MealRecord>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::FetchMeals)?;

        Ok(state
            .meals
            .values()
            .filter(|m| start <= m.date && m.date <= end)
            .cloned()
            .collect())
    }

    async fn save_meals(&self, meals: Vec<MealWrite>) -> RemoteResult<SaveAck> {
        let mut state = self.state.lock().await;
        state.enter(Operation::SaveMeals)?;

        let count = meals.len();
        for meal in meals {
            state
                .meals
                .insert((meal.date, meal.meal_type), MealRecord::from(meal));
        }

        Ok(SaveAck { count })
    }
}

#[async_trait]
impl ShoppingStore for MemoryRemote {
    async fn fetch_shopping_list(&self, month: &str) -> RemoteResult<Vec<ShoppingItem>> {
        let mut state = self.state.lock().await;
        state.enter(Operation::FetchShoppingList)?;

        Ok(state
            .shopping
            .iter()
            .filter(|item| item.month == month)
            .cloned()
            .collect())
    }

    async fn add_shopping_item(&self, item: &NewShoppingItem) -> RemoteResult<ShoppingItem> {
        let mut state = self.state.lock().await;
        state.enter(Operation::AddShoppingItem)?;

        state.next_id += 1;
        let created = item.clone().into_item(format!("item-{}", state.next_id));
        state.shopping.push(created.clone());

        Ok(created)
    }

    async fn update_shopping_item(
        &self,
        id: &str,
        patch: &ShoppingItemPatch,
    ) -> RemoteResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::UpdateShoppingItem)?;

        let Some(item) = state.shopping.iter_mut().find(|item| item.id == id) else {
            return Err(RemoteError::server(404, "Item not found"));
        };
        patch.apply(item);

        Ok(())
    }

    async fn delete_shopping_item(&self, id: &str) -> RemoteResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Operation::DeleteShoppingItem)?;

        let before = state.shopping.len();
        state.shopping.retain(|item| item.id != id);
        if state.shopping.len() == before {
            return Err(RemoteError::server(404, "Item not found"));
        }

        Ok(())
    }
}
