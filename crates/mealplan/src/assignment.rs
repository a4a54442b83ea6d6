use std::collections::BTreeMap;

use mealcal_calendar::Period;
use mealcal_shared::mealplan::{MealRecord, MealType};
use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub date: Date,
    pub meal_type: MealType,
}

impl SlotKey {
    pub fn new(date: Date, meal_type: MealType) -> Self {
        Self { date, meal_type }
    }

    pub fn lunch(date: Date) -> Self {
        Self::new(date, MealType::Lunch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState<'a> {
    Unplanned,
    Cleared,
    Assigned(&'a str),
}

impl<'a> SlotState<'a> {
    pub fn recipe(&self) -> Option<&'a str> {
        match self {
            SlotState::Assigned(name) => Some(name),
            _ => None,
        }
    }
}

/// Sparse date/meal-type map. A missing key is an unplanned slot, `None` is
/// a slot the user cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments(BTreeMap<SlotKey, Option<String>>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, key: SlotKey) -> SlotState<'_> {
        match self.0.get(&key) {
            None => SlotState::Unplanned,
            Some(None) => SlotState::Cleared,
            Some(Some(name)) => SlotState::Assigned(name),
        }
    }

    pub fn recipe(&self, key: SlotKey) -> Option<&str> {
        self.slot(key).recipe()
    }

    pub fn set(&mut self, key: SlotKey, recipe_name: Option<String>) {
        let recipe_name = recipe_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        self.0.insert(key, recipe_name);
    }

    /// Writes server records over the matching keys and leaves every other
    /// key alone. Applying the same records again is a no-op.
    pub fn merge(&mut self, records: &[MealRecord]) {
        for record in records {
            self.0.insert(
                SlotKey::new(record.date, record.meal_type),
                record.recipe().map(str::to_owned),
            );
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, Option<&str>)> {
        self.0.iter().map(|(key, name)| (*key, name.as_deref()))
    }

    /// Assigned recipes of one meal type inside `period`, in date order.
    pub fn assigned_in(
        &self,
        period: Period,
        meal_type: MealType,
    ) -> impl Iterator<Item = (Date, &str)> {
        self.0
            .range(SlotKey::new(period.start, MealType::Breakfast)..)
            .take_while(move |(key, _)| key.date <= period.end)
            .filter(move |(key, _)| key.meal_type == meal_type)
            .filter_map(|(key, name)| name.as_deref().map(|name| (key.date, name)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
