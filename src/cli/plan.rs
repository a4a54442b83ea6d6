use anyhow::Result;
use clap::Subcommand;
use mealcal::App;
use mealcal_calendar::ViewMode;
use mealcal_mealplan::{CopyOutcome, LoadOutcome, Planner, SlotState};
use mealcal_shared::{format_date, mealplan::MealType};
use strum::VariantArray;
use time::Date;

#[derive(Subcommand)]
pub enum PlanCommand {
    /// Print the week (or month) holding a date with its lunch cost total
    Show {
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Option<Date>,
        #[arg(long)]
        month: bool,
    },
    /// Assign a recipe to a slot and save
    Assign {
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Date,
        #[arg(long)]
        recipe: String,
        #[arg(long, default_value = "lunch")]
        meal_type: MealType,
    },
    /// Clear a slot and save
    Clear {
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Date,
        #[arg(long, default_value = "lunch")]
        meal_type: MealType,
    },
    /// Copy last week's lunches onto the week holding a date and save
    CopyPrevious {
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Option<Date>,
    },
}

pub async fn run(app: &App, command: PlanCommand) -> Result<()> {
    match command {
        PlanCommand::Show { date, month } => {
            let mut planner = app.planner(date.unwrap_or_else(super::today)).await?;
            if month {
                planner.set_view_mode(ViewMode::Month);
            }
            load(&mut planner).await?;
            print_period(&planner);
        }
        PlanCommand::Assign {
            date,
            recipe,
            meal_type,
        } => {
            let mut planner = app.planner(date).await?;
            load(&mut planner).await?;

            if planner.recipe(&recipe).is_none() {
                tracing::warn!(recipe = %recipe, "recipe not in catalog, cost will be 0");
            }
            planner.assign(date, meal_type, Some(recipe));
            planner.save().await?;
            print_period(&planner);
        }
        PlanCommand::Clear { date, meal_type } => {
            let mut planner = app.planner(date).await?;
            load(&mut planner).await?;

            planner.assign(date, meal_type, None);
            planner.save().await?;
            print_period(&planner);
        }
        PlanCommand::CopyPrevious { date } => {
            let date = date.unwrap_or_else(super::today);
            let mut planner = app.planner(date).await?;
            load(&mut planner).await?;

            match planner.copy_previous_week(date).await? {
                CopyOutcome::NothingToCopy => println!("Previous week has no lunches to copy."),
                CopyOutcome::Copied(count) => {
                    planner.save().await?;
                    println!("Copied {count} lunches from the previous week.");
                    print_period(&planner);
                }
            }
        }
    }

    Ok(())
}

/// Loads the visible period. Mutating commands must not save over a plan
/// they could not read.
pub async fn load(planner: &mut Planner) -> Result<()> {
    match planner.load_visible().await {
        LoadOutcome::Failed(err) => Err(err.into()),
        LoadOutcome::Stale => anyhow::bail!("view changed while loading"),
        LoadOutcome::Merged(_) => Ok(()),
    }
}

pub fn print_period(planner: &Planner) {
    let period = planner.visible_period();
    println!("{period}");

    for day in period.days() {
        let slots: Vec<String> = MealType::VARIANTS
            .iter()
            .filter_map(|meal_type| match planner.slot(day, *meal_type) {
                SlotState::Assigned(name) => Some(format!("{meal_type}: {name}")),
                _ => None,
            })
            .collect();

        if slots.is_empty() {
            println!("  {} {:<9} -", format_date(day), day.weekday());
        } else {
            println!(
                "  {} {:<9} {}",
                format_date(day),
                day.weekday(),
                slots.join(", ")
            );
        }
    }

    println!("Lunch total: {}", planner.total_cost(period));
}
