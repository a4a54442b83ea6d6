use anyhow::Result;
use clap::Subcommand;
use mealcal::App;
use mealcal_calendar::ViewMode;
use mealcal_shared::{
    month_key, parse_month,
    shopping::{NewShoppingItem, ShoppingItem},
};
use time::Date;

#[derive(Subcommand)]
pub enum ShoppingCommand {
    /// Print the shopping list of a month (YYYY-MM)
    List {
        #[arg(long)]
        month: Option<String>,
    },
    /// Add an item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: i64,
        #[arg(long)]
        month: Option<String>,
    },
    /// Remove an item
    Remove {
        #[arg(long)]
        id: String,
    },
    /// Mark an item as bought
    Check {
        #[arg(long)]
        id: String,
        #[arg(long)]
        unchecked: bool,
    },
    /// Add the ingredients of the month's planned lunches
    Sync {
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Option<Date>,
    },
}

fn current_month() -> String {
    month_key(super::today())
}

pub async fn run(app: &App, command: ShoppingCommand) -> Result<()> {
    let mut list = app.shopping_list();

    match command {
        ShoppingCommand::List { month } => {
            let month = month.unwrap_or_else(current_month);
            parse_month(&month)?;

            let fetched = list.list(&month).await.map(<[ShoppingItem]>::to_vec);
            match fetched {
                Ok(items) => print_items(&items),
                Err(err) => {
                    let Some(cached) = list.cached(&month).await? else {
                        return Err(err.into());
                    };
                    tracing::warn!(error = %err, "showing cached shopping list");
                    print_items(&cached);
                }
            }
        }
        ShoppingCommand::Add { name, cost, month } => {
            let month = month.unwrap_or_else(current_month);
            let item = list.add(NewShoppingItem::new(name, cost, month)).await?;
            println!("Added {} ({})", item.name, item.id);
        }
        ShoppingCommand::Remove { id } => {
            list.remove(&id).await?;
            println!("Removed {id}");
        }
        ShoppingCommand::Check { id, unchecked } => {
            list.set_checked(&id, !unchecked).await?;
        }
        ShoppingCommand::Sync { date } => {
            let date = date.unwrap_or_else(super::today);
            let mut planner = app.planner(date).await?;
            planner.set_view_mode(ViewMode::Month);
            super::plan::load(&mut planner).await?;

            let planned = planner.planned_ingredients(planner.visible_period());
            let added = list.sync_planned(&planned, &month_key(date)).await?;

            println!("Added {} planned ingredients.", added.len());
            print_items(list.items());
        }
    }

    Ok(())
}

fn print_items(items: &[ShoppingItem]) {
    if items.is_empty() {
        println!("Shopping list is empty.");
        return;
    }

    for item in items {
        let mark = if item.is_checked { "x" } else { " " };
        println!(
            "[{mark}] {:<24} {:>8}  {}",
            item.name, item.estimated_cost, item.id
        );
    }

    let total: i64 = items.iter().map(|item| item.estimated_cost).sum();
    println!("Estimated total: {total}");
}
