use anyhow::Result;
use clap::{Parser, Subcommand};
use mealcal::config::Config;

mod cli;

/// mealcal - household meal planning calendar
#[derive(Parser)]
#[command(name = "mealcal")]
#[command(about = "Plan lunches by week or month and keep the shopping list in sync", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Dry run against an empty in-process remote store instead of the HTTP
    /// API. Plan and shopping changes are not kept after exit
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Monday-start week holding a date
    Week {
        #[arg(long, value_parser = cli::parse_date_arg)]
        date: Option<time::Date>,
    },
    /// Print the month grid holding a date
    Month {
        #[arg(long, value_parser = cli::parse_date_arg)]
        date: Option<time::Date>,
    },
    /// Print the week-of-month number of a date
    WeekNumber {
        #[arg(long, value_parser = cli::parse_date_arg)]
        date: time::Date,
    },
    /// Show and edit the meal plan
    #[command(subcommand)]
    Plan(cli::plan::PlanCommand),
    /// Manage weekly templates
    #[command(subcommand)]
    Template(cli::template::TemplateCommand),
    /// Manage the monthly shopping list
    #[command(subcommand)]
    Shopping(cli::shopping::ShoppingCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealcal::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Week { date } => cli::calendar::week(date),
        Commands::Month { date } => cli::calendar::month(date),
        Commands::WeekNumber { date } => cli::calendar::week_number(date),
        Commands::Plan(command) => {
            let app = mealcal::App::connect(&config, cli.offline).await?;
            cli::plan::run(&app, command).await
        }
        Commands::Template(command) => {
            let app = mealcal::App::connect(&config, cli.offline).await?;
            cli::template::run(&app, command).await
        }
        Commands::Shopping(command) => {
            let app = mealcal::App::connect(&config, cli.offline).await?;
            cli::shopping::run(&app, command).await
        }
    }
}
