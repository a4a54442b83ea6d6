#![allow(dead_code)]

use std::sync::Arc;

use mealcal_mealplan::Planner;
use mealcal_remote::MemoryRemote;
use mealcal_shared::{
    mealplan::{MealRecord, MealType},
    recipe::Recipe,
};
use time::Date;

pub fn recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Pastel de Choclo", 5200)
            .with_id("r-1")
            .with_ingredients(["Choclo", "Carne molida", "Cebolla"]),
        Recipe::new("Cazuela", 4500)
            .with_id("r-2")
            .with_ingredients(["Zapallo", "Papa", "cebolla "]),
        Recipe::new("Porotos con Riendas", 3000)
            .with_id("r-3")
            .with_ingredients(["Porotos", "Tallarines", "Zapallo"]),
    ]
}

pub fn remote() -> Arc<MemoryRemote> {
    Arc::new(MemoryRemote::with_recipes(recipes()))
}

pub async fn setup_planner(remote: &Arc<MemoryRemote>, pivot: Date) -> anyhow::Result<Planner> {
    let mut planner = Planner::new(remote.clone(), remote.clone(), pivot);
    planner.load_recipes(mealcal_mealplan::DEFAULT_RECIPE_LIMIT).await?;

    Ok(planner)
}

pub fn lunch(date: Date, name: &str) -> MealRecord {
    MealRecord::new(date, MealType::Lunch, Some(name.to_owned()))
}
