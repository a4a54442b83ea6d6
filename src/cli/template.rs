use anyhow::Result;
use clap::Subcommand;
use mealcal::App;
use time::Date;

#[derive(Subcommand)]
pub enum TemplateCommand {
    /// List saved templates
    List,
    /// Save the lunches of the week holding a date as a template
    Save {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Option<Date>,
    },
    /// Replace the lunches of the week holding a date with a template
    Apply {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = super::parse_date_arg)]
        date: Option<Date>,
        /// Confirm that the week's current lunches are replaced
        #[arg(long)]
        yes: bool,
    },
    /// Delete a template
    Delete {
        #[arg(long)]
        name: String,
    },
}

pub async fn run(app: &App, command: TemplateCommand) -> Result<()> {
    let mut library = app.templates().await?;

    match command {
        TemplateCommand::List => {
            if library.list().is_empty() {
                println!("No templates saved.");
            }
            for template in library.list() {
                let recipes: Vec<&str> = template
                    .items
                    .iter()
                    .map(|item| item.recipe_name.as_str())
                    .collect();
                println!("{}: {}", template.name, recipes.join(", "));
            }
        }
        TemplateCommand::Save { name, date } => {
            let date = date.unwrap_or_else(super::today);
            let mut planner = app.planner(date).await?;
            super::plan::load(&mut planner).await?;

            let template = library.save(&name, &planner, date).await?;
            println!(
                "Saved template `{}` with {} lunches.",
                template.name,
                template.items.len()
            );
        }
        TemplateCommand::Apply { name, date, yes } => {
            if !yes {
                anyhow::bail!("applying `{name}` replaces the week's lunches; pass --yes to confirm");
            }

            let date = date.unwrap_or_else(super::today);
            let mut planner = app.planner(date).await?;
            super::plan::load(&mut planner).await?;

            library.apply(&name, &mut planner, date).await?;
            planner.save().await?;
            super::plan::print_period(&planner);
        }
        TemplateCommand::Delete { name } => {
            library.delete(&name).await?;
            println!("Deleted template `{}`.", name.trim());
        }
    }

    Ok(())
}
