use std::{collections::HashMap, sync::Arc};

use mealcal_calendar::{Period, ViewMode, week_boundary};
use mealcal_shared::{
    Error, MealStore, RecipeCatalog, RemoteError, RemoteResult, Result,
    mealplan::{MealRecord, MealType, MealWrite, SaveAck, Template, TemplateItem},
    recipe::{Recipe, normalize_key},
};
use time::{Date, Duration};

use crate::{Assignments, SlotKey, SlotState};

pub const DEFAULT_RECIPE_LIMIT: usize = 200;

/// Handle for an in-flight period load, tagged with the view that was
/// visible when it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: u64,
    pub start: Date,
    pub end: Date,
    pub view: Period,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Server records merged into the map.
    Merged(Vec<MealRecord>),
    /// The view moved on before the response arrived; nothing was applied.
    Stale,
    /// The fetch failed; the map is untouched.
    Failed(RemoteError),
}

impl LoadOutcome {
    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            LoadOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn records(&self) -> &[MealRecord] {
        match self {
            LoadOutcome::Merged(records) => records,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(usize),
    NothingToCopy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedIngredient {
    pub name: String,
    pub key: String,
    pub count: usize,
}

/// Snapshot of the map taken at save time.
pub struct SaveRequest {
    store: Arc<dyn MealStore>,
    batch: Vec<MealWrite>,
}

impl SaveRequest {
    pub fn batch(&self) -> &[MealWrite] {
        &self.batch
    }

    pub async fn send(self) -> Result<SaveAck> {
        let count = self.batch.len();

        match self.store.save_meals(self.batch).await {
            Ok(ack) => {
                tracing::info!(count, "meal plan saved");
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(count, error = %err, "meal plan save rejected");
                Err(Error::Persistence(err))
            }
        }
    }
}

/// In-memory meal calendar for one household session.
pub struct Planner {
    meals: Arc<dyn MealStore>,
    recipes: Arc<dyn RecipeCatalog>,
    catalog: Vec<Recipe>,
    by_name: HashMap<String, usize>,
    assignments: Assignments,
    view_mode: ViewMode,
    pivot: Date,
    next_request: u64,
}

impl Planner {
    pub fn new(meals: Arc<dyn MealStore>, recipes: Arc<dyn RecipeCatalog>, pivot: Date) -> Self {
        Self {
            meals,
            recipes,
            catalog: vec![],
            by_name: HashMap::new(),
            assignments: Assignments::new(),
            view_mode: ViewMode::Week,
            pivot,
            next_request: 0,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn pivot(&self) -> Date {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: Date) {
        self.pivot = pivot;
    }

    pub fn visible_period(&self) -> Period {
        Period::of(self.view_mode, self.pivot)
    }

    pub fn go_next(&mut self) -> Period {
        self.pivot = self.visible_period().next().start;
        self.visible_period()
    }

    pub fn go_previous(&mut self) -> Period {
        self.pivot = self.visible_period().previous().start;
        self.visible_period()
    }

    pub fn catalog(&self) -> &[Recipe] {
        &self.catalog
    }

    pub fn set_catalog(&mut self, recipes: Vec<Recipe>) {
        let mut by_name = HashMap::with_capacity(recipes.len());
        for (index, recipe) in recipes.iter().enumerate() {
            by_name.entry(recipe.name.trim().to_owned()).or_insert(index);
        }

        self.catalog = recipes;
        self.by_name = by_name;
    }

    /// Replaces the catalog with the remote one. On failure the current
    /// catalog is kept.
    pub async fn load_recipes(&mut self, limit: usize) -> Result<usize> {
        match self.recipes.fetch_recipes(limit).await {
            Ok(recipes) => {
                let count = recipes.len();
                self.set_catalog(recipes);
                tracing::debug!(count, "recipe catalog loaded");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load recipe catalog");
                Err(Error::Remote(err))
            }
        }
    }

    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.by_name
            .get(name.trim())
            .and_then(|index| self.catalog.get(*index))
    }

    pub fn recipe_cost(&self, name: &str) -> i64 {
        self.recipe(name).map(|r| r.cost).unwrap_or_default()
    }

    pub fn search_recipes(&self, query: &str) -> Vec<&Recipe> {
        let query = query.trim().to_lowercase();

        self.catalog
            .iter()
            .filter(|r| query.is_empty() || r.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    pub fn slot(&self, date: Date, meal_type: MealType) -> SlotState<'_> {
        self.assignments.slot(SlotKey::new(date, meal_type))
    }

    pub fn assign(&mut self, date: Date, meal_type: MealType, recipe_name: Option<String>) {
        self.assignments
            .set(SlotKey::new(date, meal_type), recipe_name);
    }

    /// Assigns `recipe_name`, or clears the slot when it already holds it.
    pub fn toggle(&mut self, date: Date, meal_type: MealType, recipe_name: &str) {
        let key = SlotKey::new(date, meal_type);
        if self.assignments.recipe(key) == Some(recipe_name.trim()) {
            self.assignments.set(key, None);
        } else {
            self.assignments.set(key, Some(recipe_name.to_owned()));
        }
    }

    pub fn begin_load(&mut self, start: Date, end: Date) -> LoadTicket {
        self.next_request += 1;

        LoadTicket {
            id: self.next_request,
            start,
            end,
            view: self.visible_period(),
        }
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        response: RemoteResult<Vec<MealRecord>>,
    ) -> LoadOutcome {
        let records = match response {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    request = ticket.id,
                    start = %ticket.start,
                    end = %ticket.end,
                    error = %err,
                    "failed to load meals"
                );
                return LoadOutcome::Failed(err);
            }
        };

        if ticket.view != self.visible_period() {
            tracing::debug!(
                request = ticket.id,
                issued_for = %ticket.view,
                visible = %self.visible_period(),
                "discarding stale meal response"
            );
            return LoadOutcome::Stale;
        }

        let records: Vec<MealRecord> = records
            .into_iter()
            .filter(|r| ticket.start <= r.date && r.date <= ticket.end)
            .collect();

        self.assignments.merge(&records);
        tracing::debug!(request = ticket.id, count = records.len(), "meals merged");

        LoadOutcome::Merged(records)
    }

    /// Fetches `[start, end]` and merges it into the map.
    pub async fn load_period(&mut self, start: Date, end: Date) -> LoadOutcome {
        let ticket = self.begin_load(start, end);
        let response = self.meals.fetch_meals(start, end).await;

        self.complete_load(ticket, response)
    }

    pub async fn load_visible(&mut self) -> LoadOutcome {
        let period = self.visible_period();
        self.load_period(period.start, period.end).await
    }

    /// Every slot in the map, with the recipe cost resolved against the
    /// current catalog.
    pub fn save_batch(&self) -> Vec<MealWrite> {
        self.assignments
            .iter()
            .map(|(key, name)| {
                let recipe = name.and_then(|name| self.recipe(name));

                MealWrite {
                    date: key.date,
                    meal_type: key.meal_type,
                    recipe_id: recipe.and_then(|r| r.id.clone()),
                    recipe_name: name.unwrap_or_default().to_owned(),
                    recipe_cost: recipe.map(|r| r.cost).unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Captures the whole map for saving. The returned request owns its
    /// batch, so the planner may keep changing while it is in flight.
    pub fn save_request(&self) -> SaveRequest {
        SaveRequest {
            store: self.meals.clone(),
            batch: self.save_batch(),
        }
    }

    /// Persists the whole map. The map is never touched, so a failed save
    /// can simply be retried.
    pub async fn save(&self) -> Result<SaveAck> {
        self.save_request().send().await
    }

    /// Sum of catalog costs of the lunches assigned inside `period`.
    pub fn total_cost(&self, period: Period) -> i64 {
        self.assignments
            .assigned_in(period, MealType::Lunch)
            .map(|(_, name)| self.recipe_cost(name))
            .sum()
    }

    /// Copies last week's lunches onto the week of `current`, by weekday.
    /// All seven lunch slots are overwritten; days without a source lunch
    /// end up cleared.
    pub async fn copy_previous_week(&mut self, current: Date) -> Result<CopyOutcome> {
        let start = week_boundary(current).start;
        let Some(previous_start) = start.checked_sub(Duration::days(7)) else {
            return Ok(CopyOutcome::NothingToCopy);
        };
        let previous_end = start - Duration::days(1);

        let records = self
            .meals
            .fetch_meals(previous_start, previous_end)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "failed to fetch previous week"))?;

        let mut source: [Option<String>; 7] = Default::default();
        for record in &records {
            if record.meal_type != MealType::Lunch {
                continue;
            }
            let offset = (record.date - previous_start).whole_days();
            if let (Ok(offset @ 0..=6), Some(name)) = (usize::try_from(offset), record.recipe()) {
                source[offset] = Some(name.to_owned());
            }
        }

        let copied = source.iter().flatten().count();
        if copied == 0 {
            tracing::info!(week = %start, "previous week has nothing to copy");
            return Ok(CopyOutcome::NothingToCopy);
        }

        for (offset, name) in source.into_iter().enumerate() {
            if let Some(day) = start.checked_add(Duration::days(offset as i64)) {
                self.assignments.set(SlotKey::lunch(day), name);
            }
        }

        Ok(CopyOutcome::Copied(copied))
    }

    /// Copies the non-empty lunches of one week onto another, by weekday.
    pub fn copy_week(&mut self, from: Date, to: Date) -> usize {
        let from = week_boundary(from);
        let to = week_boundary(to);

        let mut copied = 0;
        for (source, target) in from.days.iter().zip(to.days.iter()) {
            if let Some(name) = self.assignments.recipe(SlotKey::lunch(*source)) {
                let name = name.to_owned();
                self.assignments.set(SlotKey::lunch(*target), Some(name));
                copied += 1;
            }
        }

        copied
    }

    pub fn clear_week(&mut self, week_start: Date) {
        for day in week_boundary(week_start).days {
            self.assignments.set(SlotKey::lunch(day), None);
        }
    }

    /// Lunch entries of the week holding `week_start`, as Monday offsets.
    pub fn capture_week(&self, week_start: Date) -> Vec<TemplateItem> {
        week_boundary(week_start)
            .days
            .iter()
            .enumerate()
            .filter_map(|(offset, day)| {
                self.assignments
                    .recipe(SlotKey::lunch(*day))
                    .map(|name| TemplateItem {
                        day_offset: offset as u8,
                        recipe_name: name.to_owned(),
                    })
            })
            .collect()
    }

    /// Replaces the week's lunch plan with `template`. Other meal types and
    /// other weeks are left alone.
    pub fn apply_template(&mut self, template: &Template, week_start: Date) -> Result<()> {
        if let Some(item) = template.items.iter().find(|item| item.day_offset > 6) {
            mealcal_shared::bail!(
                "template `{}` has day offset {} outside the week",
                template.name,
                item.day_offset
            );
        }

        let week = week_boundary(week_start);
        self.clear_week(week.start);

        for item in &template.items {
            let day = week.days[usize::from(item.day_offset)];
            self.assignments
                .set(SlotKey::lunch(day), Some(item.recipe_name.to_owned()));
        }

        tracing::debug!(template = %template.name, week = %week.start, "template applied");

        Ok(())
    }

    /// Ingredients of the lunches assigned inside `period`, merged by
    /// normalized name in first-seen order. A recipe planned twice counts
    /// its ingredients twice.
    pub fn planned_ingredients(&self, period: Period) -> Vec<PlannedIngredient> {
        let mut planned: Vec<PlannedIngredient> = vec![];
        let mut index: HashMap<String, usize> = HashMap::new();

        for (_, name) in self.assignments.assigned_in(period, MealType::Lunch) {
            let Some(recipe) = self.recipe(name) else {
                continue;
            };

            for ingredient in &recipe.ingredients {
                let key = normalize_key(ingredient);
                if key.is_empty() {
                    continue;
                }

                match index.get(&key) {
                    Some(position) => planned[*position].count += 1,
                    None => {
                        index.insert(key.clone(), planned.len());
                        planned.push(PlannedIngredient {
                            name: ingredient.trim().to_owned(),
                            key,
                            count: 1,
                        });
                    }
                }
            }
        }

        planned
    }
}
