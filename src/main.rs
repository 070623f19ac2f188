//! budget-cli: command-line front end for the budgeting API.
//!
//! ```text
//! budget-cli login --email ana@example.com --password ...
//! budget-cli budgets list
//! budget-cli entries create --category 2 --description Rent --amount 950
//! budget-cli indicators 3
//! ```
//!
//! Tokens and preferences live in the file named by `storage.path` (or
//! `--store`); without one they only last for a single invocation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use budget_client::api::models::{
    BudgetInput, CategoryInput, Credentials, EntryInput, EntryType, Registration,
};
use budget_client::config::loader::config_from_env;
use budget_client::config::{load_config, ClientConfig};
use budget_client::observability::logging::init_logging;
use budget_client::session::LogRedirect;
use budget_client::storage::{open_store, Preferences, Theme};
use budget_client::{BudgetApi, ClassifiedError, RequestClient, SessionController, TokenStore};

#[derive(Parser)]
#[command(name = "budget-cli")]
#[command(about = "Command-line client for the personal budgeting API", long_about = None)]
struct Cli {
    /// TOML configuration file; BUDGET_* variables still apply on top
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Token and preference file, overriding `storage.path`
    #[arg(short, long)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the tokens
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Manage budgets
    #[command(subcommand)]
    Budgets(BudgetCommand),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Manage entries
    #[command(subcommand)]
    Entries(EntryCommand),
    /// Show financial indicators for a budget
    Indicators {
        /// Budget id; defaults to the last budget opened
        budget_id: Option<i64>,
    },
    /// Show or change local preferences
    #[command(subcommand)]
    Preferences(PreferenceCommand),
}

#[derive(Subcommand)]
enum BudgetCommand {
    List,
    /// Show one budget and remember it as the last opened
    Get { id: i64 },
    Create(BudgetArgs),
    Update {
        id: i64,
        #[command(flatten)]
        budget: BudgetArgs,
    },
    Delete { id: i64 },
}

#[derive(Args)]
struct BudgetArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    currency: Option<String>,
}

#[derive(Subcommand)]
enum CategoryCommand {
    List {
        #[arg(long)]
        budget: Option<i64>,
    },
    Create {
        #[arg(long)]
        budget: i64,
        #[arg(long)]
        name: String,
        /// income, expense or saving
        #[arg(long = "type")]
        category_type: EntryType,
        #[arg(long)]
        color: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum EntryCommand {
    List {
        #[arg(long)]
        budget: Option<i64>,
    },
    /// Add an entry to a category; its type follows the category
    Create {
        #[arg(long)]
        category: i64,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: f64,
        /// Checked against the category's type when given
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
        #[arg(long)]
        date: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PreferenceCommand {
    Show,
    Theme { theme: String },
    Currency { code: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => config_from_env()?,
    };
    if let Some(store) = &cli.store {
        config.storage.path = Some(store.clone());
    }

    init_logging(&config.observability);
    tracing::debug!(
        environment = ?config.environment,
        base_url = %config.base_url(),
        "Configuration loaded"
    );

    match run(cli.command, &config).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<ClassifiedError>() {
            Some(classified) => {
                print_error(classified);
                std::process::exit(1);
            }
            None => Err(e),
        },
    }
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config.storage.path.as_deref());
    let preferences = Preferences::new(store.clone());
    let session = Arc::new(SessionController::new(Arc::new(LogRedirect::new(
        config.api.login_path.clone(),
    ))));
    let client = RequestClient::from_config(config, TokenStore::new(store), session)?;
    let api = BudgetApi::new(client, config.api.clone());

    match command {
        Commands::Login { email, password } => {
            api.auth().login(&Credentials { email, password }).await?;
            println!("Logged in");
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            api.auth()
                .register(&Registration {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("Account created");
        }
        Commands::Logout => {
            api.auth().logout();
            println!("Logged out");
        }
        Commands::Budgets(command) => {
            let budgets = api.budgets();
            match command {
                BudgetCommand::List => print_json(&budgets.list().await?)?,
                BudgetCommand::Get { id } => {
                    print_json(&budgets.get(id).await?)?;
                    preferences.set_last_budget_id(Some(id))?;
                }
                BudgetCommand::Create(args) => {
                    let created = budgets.create(&budget_input(args)).await?;
                    let created = budgets.get_eventually(created.id).await?;
                    preferences.set_last_budget_id(Some(created.id))?;
                    print_json(&created)?;
                }
                BudgetCommand::Update { id, budget } => {
                    print_json(&budgets.update(id, &budget_input(budget)).await?)?
                }
                BudgetCommand::Delete { id } => {
                    budgets.delete(id).await?;
                    if preferences.last_budget_id() == Some(id) {
                        preferences.set_last_budget_id(None)?;
                    }
                    println!("Budget {} deleted", id);
                }
            }
        }
        Commands::Categories(command) => {
            let categories = api.categories();
            match command {
                CategoryCommand::List { budget } => {
                    let list = match budget.or_else(|| preferences.last_budget_id()) {
                        Some(id) => categories.for_budget(id).await?,
                        None => categories.list().await?,
                    };
                    print_json(&list)?;
                }
                CategoryCommand::Create {
                    budget,
                    name,
                    category_type,
                    color,
                } => {
                    let input = CategoryInput {
                        name,
                        category_type,
                        budget_id: budget,
                        color,
                    };
                    print_json(&categories.create(&input).await?)?;
                }
                CategoryCommand::Delete { id } => {
                    categories.delete(id).await?;
                    println!("Category {} deleted", id);
                }
            }
        }
        Commands::Entries(command) => {
            let entries = api.entries();
            match command {
                EntryCommand::List { budget } => {
                    let list = match budget.or_else(|| preferences.last_budget_id()) {
                        Some(id) => entries.for_budget(id).await?,
                        None => entries.list().await?,
                    };
                    print_json(&list)?;
                }
                EntryCommand::Create {
                    category,
                    description,
                    amount,
                    entry_type,
                    date,
                } => {
                    let category = api.categories().get(category).await?;
                    let input = EntryInput {
                        description,
                        amount,
                        entry_type: entry_type.unwrap_or(category.category_type),
                        category_id: category.id,
                        budget_id: category.budget_id,
                        date,
                    };
                    print_json(&entries.create_in_category(&category, &input).await?)?;
                }
                EntryCommand::Delete { id } => {
                    entries.delete(id).await?;
                    println!("Entry {} deleted", id);
                }
            }
        }
        Commands::Indicators { budget_id } => {
            let Some(id) = budget_id.or_else(|| preferences.last_budget_id()) else {
                return Err("no budget id given and no last budget remembered".into());
            };
            print_json(&api.indicators().fetch_or_default(id).await?)?;
        }
        Commands::Preferences(command) => match command {
            PreferenceCommand::Show => {
                println!("theme:       {}", preferences.theme().as_str());
                println!("currency:    {}", preferences.currency());
                match preferences.last_budget_id() {
                    Some(id) => println!("last budget: {}", id),
                    None => println!("last budget: -"),
                }
                let widgets = preferences.dashboard_layout().map_or(0, |l| l.len());
                println!("dashboard:   {} widgets", widgets);
            }
            PreferenceCommand::Theme { theme } => {
                let theme: Theme = theme.parse()?;
                preferences.set_theme(theme)?;
            }
            PreferenceCommand::Currency { code } => preferences.set_currency(&code)?,
        },
    }

    Ok(())
}

fn budget_input(args: BudgetArgs) -> BudgetInput {
    BudgetInput {
        name: args.name,
        description: args.description,
        currency: args.currency,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a failure the way the UI notification would: title, then either
/// the per-field messages or the single message.
fn print_error(error: &ClassifiedError) {
    eprintln!("{}", error.title());
    match error.field_errors() {
        Some(fields) => {
            for (field, message) in fields {
                eprintln!("  {}: {}", field, message);
            }
        }
        None => eprintln!("  {}", error.message()),
    }
}
