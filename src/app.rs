use std::{sync::Arc, time::Duration};

use anyhow::Result;
use mealcal_mealplan::{Planner, TemplateLibrary};
use mealcal_remote::{HttpRemote, MemoryRemote};
use mealcal_shared::{KeyValueStore, MealStore, RecipeCatalog, ShoppingStore};
use mealcal_shopping::ShoppingList;
use mealcal_storage::SqliteStore;
use time::Date;

use crate::config::Config;

/// Concrete stores behind the engine for one CLI invocation.
#[derive(Clone)]
pub struct App {
    pub meals: Arc<dyn MealStore>,
    pub recipes: Arc<dyn RecipeCatalog>,
    pub shopping: Arc<dyn ShoppingStore>,
    pub local: Arc<dyn KeyValueStore>,
    pub recipe_limit: usize,
}

impl App {
    /// Wires the HTTP remote, or an in-process one when `offline`, and the
    /// SQLite local store.
    ///
    /// The offline remote starts empty and lives only as long as the
    /// process, so offline plan and shopping changes are a dry run. Templates
    /// still go to the local store.
    pub async fn connect(config: &Config, offline: bool) -> Result<Self> {
        let local = SqliteStore::connect(&config.storage.url, config.storage.max_connections).await?;

        let app = if offline {
            tracing::info!("offline dry run, remote changes are not kept");
            Self::with_remote(Arc::new(MemoryRemote::new()), Arc::new(local))
        } else {
            let remote = HttpRemote::new(
                &config.api.base_url,
                Duration::from_secs(config.api.timeout_secs),
            )?;
            tracing::info!(base_url = %remote.base_url(), "using remote api");
            Self::with_remote(Arc::new(remote), Arc::new(local))
        };

        Ok(Self {
            recipe_limit: config.api.recipe_limit,
            ..app
        })
    }

    pub fn with_remote<R>(remote: Arc<R>, local: Arc<dyn KeyValueStore>) -> Self
    where
        R: MealStore + RecipeCatalog + ShoppingStore + 'static,
    {
        Self {
            meals: remote.clone(),
            recipes: remote.clone(),
            shopping: remote,
            local,
            recipe_limit: mealcal_mealplan::DEFAULT_RECIPE_LIMIT,
        }
    }

    /// A planner pivoted on `pivot`, with the recipe catalog loaded.
    ///
    /// Fails when the catalog cannot be fetched: a save without it would
    /// snapshot every lunch at cost 0 with no recipe id.
    pub async fn planner(&self, pivot: Date) -> Result<Planner> {
        let mut planner = Planner::new(self.meals.clone(), self.recipes.clone(), pivot);
        if let Err(err) = planner.load_recipes(self.recipe_limit).await {
            tracing::warn!(error = %err, "recipe catalog unavailable");
            return Err(anyhow::Error::new(err).context("failed to load the recipe catalog"));
        }

        Ok(planner)
    }

    pub async fn templates(&self) -> Result<TemplateLibrary> {
        Ok(TemplateLibrary::load(self.local.clone()).await?)
    }

    pub fn shopping_list(&self) -> ShoppingList {
        ShoppingList::new(self.shopping.clone()).with_cache(self.local.clone())
    }
}
