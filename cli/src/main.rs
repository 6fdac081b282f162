use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use optimenu::analytics;
use optimenu::config::Config;
use optimenu::costing::{self, CostingError};
use optimenu::prospects::{self, ProspectDraft, ProspectUpdate};
use optimenu::query;
use optimenu::records::{self, Dataset};
use optimenu::units::{self, UnitFormatter, UnitResolution};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "optimenu")]
#[command(about = "Restaurant invoice costing and unit standardization tool", long_about = None)]
struct Cli {
    /// Data directory (default: data_dir from config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file (default: ./optimenu.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve free-text unit input to its canonical unit
    Normalize {
        /// Unit text (e.g., "Pounds") or a quantity with unit (e.g., "2.5 lbs")
        unit: String,
    },

    /// List the unit vocabulary by category
    Units,

    /// Check whether a unit is recognized
    Validate { unit: String },

    /// Suggest units for partial input
    Suggest {
        partial: String,

        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Cost per reference unit for a purchased quantity
    Cost {
        quantity: f64,
        unit: String,
        amount: f64,

        /// Show the cost per this unit instead of the preferred one
        #[arg(long = "per")]
        per_unit: Option<String>,
    },

    /// Convert a quantity between units of the same category
    Convert { value: f64, from: String, to: String },

    /// List records (e.g., "invoices?search=sysco&sort=amount:desc&range=0:9")
    List {
        query: String,

        /// Zero-based page, used when the query has no range
        #[arg(short, long, default_value_t = 0)]
        page: usize,
    },

    /// Invoices with required fields still missing
    Pending,

    /// Validate an invoice and show its standardized line items
    CheckInvoice { id: String },

    /// Validate an invoice, cost its items, update ingredients and save
    SaveInvoice { id: String },

    /// Cost a menu item from its ingredient prices
    MenuCost {
        id: String,

        /// Store the computed cost on the menu item
        #[arg(long)]
        save: bool,
    },

    /// Dashboard summary
    Stats {
        /// Report date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recent activity, newest first
    Activity {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Manage sales prospects
    Prospect {
        #[command(subcommand)]
        command: ProspectCommands,
    },
}

#[derive(Subcommand)]
enum ProspectCommands {
    /// Add a prospect
    Add {
        business_name: String,

        #[command(flatten)]
        fields: ProspectFields,
    },

    /// Change fields on a prospect; pass "" to clear a field
    Update {
        id: String,

        #[arg(long)]
        business_name: Option<String>,

        #[command(flatten)]
        fields: ProspectFields,
    },

    /// Remove a prospect
    Delete { id: String },
}

#[derive(Args)]
struct ProspectFields {
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Date of last contact (YYYY-MM-DD)
    #[arg(long)]
    last_contacted: Option<NaiveDate>,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.log_level);

    let data_dir = cli.data.clone().unwrap_or_else(|| config.data_dir.clone());

    let result = match cli.command {
        Commands::Normalize { unit } => normalize(&unit),
        Commands::Units => list_units(),
        Commands::Validate { unit } => validate(&unit),
        Commands::Suggest { partial, limit } => suggest(&partial, limit),
        Commands::Cost {
            quantity,
            unit,
            amount,
            per_unit,
        } => cost(&config, quantity, &unit, amount, per_unit.as_deref()),
        Commands::Convert { value, from, to } => convert(value, &from, &to),
        Commands::List { query, page } => list(&config, &data_dir, &query, page),
        Commands::Pending => pending(&data_dir),
        Commands::CheckInvoice { id } => check_invoice(&config, &data_dir, &id),
        Commands::SaveInvoice { id } => save_invoice(&data_dir, &id),
        Commands::MenuCost { id, save } => menu_cost(&config, &data_dir, &id, save),
        Commands::Stats { date, json } => stats(&data_dir, date, json),
        Commands::Activity { limit } => activity(&data_dir, limit),
        Commands::Prospect { command } => prospect(&data_dir, command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(data_dir: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    let (dataset, validation) = records::load_dataset_from_directory(data_dir)?;

    // Print validation issues if any
    if validation.has_issues() {
        eprintln!("{}", validation);
    }

    Ok(dataset)
}

/// For commands that save: refuses to continue if any file failed to load
fn load_for_write(data_dir: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    let (dataset, validation) = records::load_dataset_for_write(data_dir)?;

    if validation.has_issues() {
        eprintln!("{}", validation);
    }

    Ok(dataset)
}

fn normalize(input: &str) -> CliResult {
    let (quantity, unit) = match units::split_quantity_and_unit(input) {
        Some((quantity, unit)) => (Some(quantity), unit),
        None => (None, input.to_string()),
    };

    let descriptor = match units::normalize_unit(&unit) {
        UnitResolution::Resolved(descriptor) => descriptor,
        UnitResolution::Unresolved(original) => {
            return Err(units::validator::unresolved_unit_message(&original).into());
        }
    };

    println!(
        "{} ({}, {}; reference unit {})",
        descriptor.symbol,
        descriptor.name,
        descriptor.category,
        descriptor.reference_unit()
    );
    if let Some(quantity) = quantity {
        println!(
            "{} = {}",
            units::format_quantity(quantity, descriptor.symbol),
            units::format_quantity(
                quantity * descriptor.to_reference_factor,
                descriptor.reference_unit()
            )
        );
    }
    Ok(())
}

fn list_units() -> CliResult {
    println!("Unit table v{}", units::UNIT_TABLE_VERSION);
    for category in units::UnitCategory::ALL {
        println!("\n{} (reference: {})", category, category.reference_unit());
        for unit in units::table::units_in_category(category) {
            println!(
                "  {:<6} {:<12} x{}",
                unit.symbol, unit.name, unit.to_reference_factor
            );
        }
    }
    Ok(())
}

fn validate(unit: &str) -> CliResult {
    let validation = units::validate_unit(unit);
    match validation.message {
        Some(message) => println!("invalid: {}", message),
        None => println!("valid"),
    }
    Ok(())
}

fn suggest(partial: &str, limit: usize) -> CliResult {
    let suggestions = units::get_unit_suggestions(partial);
    for spelling in suggestions.iter().take(limit) {
        let symbol = units::resolve(spelling).map(|d| d.symbol).unwrap_or(spelling);
        if symbol == spelling {
            println!("{}", spelling);
        } else {
            println!("{} -> {}", spelling, symbol);
        }
    }
    Ok(())
}

fn cost(config: &Config, quantity: f64, unit: &str, amount: f64, per_unit: Option<&str>) -> CliResult {
    let standardized = units::calculate_standardized_cost(quantity, unit, amount)?;
    let formatter = UnitFormatter::new(config.display.clone());
    let display = formatter.display_cost(&standardized, per_unit);

    println!("{}", display.text);
    if display.unit != standardized.reference_unit {
        println!(
            "({} / {})",
            units::format_unit_cost(standardized.standardized_cost),
            standardized.reference_unit
        );
    }
    Ok(())
}

fn convert(value: f64, from: &str, to: &str) -> CliResult {
    let converted = units::convert_quantity(value, from, to)?;
    let to_symbol = units::resolve(to).map(|d| d.symbol).unwrap_or(to);
    println!("{}", units::format_quantity(converted, to_symbol));
    Ok(())
}

fn list(config: &Config, data_dir: &Path, query_str: &str, page: usize) -> CliResult {
    let dataset = load(data_dir)?;

    let mut list_query = query::parse_list_query(query_str)
        .map_err(|e| format!("Failed to parse query: {}", e))?;
    if list_query.range.is_none() {
        list_query.range = Some(query::PageRange::page(page, config.page_size));
    }

    let executor = query::QueryExecutor::new(&dataset);
    let result = executor
        .execute(&list_query)
        .map_err(|e| format!("Query error: {}", e))?;

    eprintln!("{}", query::format_page_summary(&result));
    let rows = serde_json::to_value(&result.rows)?;
    println!("{}", query::format_query_result(&rows));

    Ok(())
}

fn pending(data_dir: &Path) -> CliResult {
    let dataset = load(data_dir)?;

    let pending: Vec<_> = dataset.pending_invoices().collect();
    println!("Pending invoices ({}):", pending.len());
    for invoice in pending {
        println!(
            "  - {} ({}) missing: {}",
            invoice.id,
            invoice.supplier.as_deref().unwrap_or("unknown supplier"),
            invoice.missing_fields().join(", ")
        );
    }
    Ok(())
}

fn check_invoice(config: &Config, data_dir: &Path, id: &str) -> CliResult {
    let dataset = load(data_dir)?;
    let invoice = dataset
        .invoice(id)
        .ok_or_else(|| records::StoreError::not_found("Invoice", id))?;

    let formatter = UnitFormatter::new(config.display.clone());
    println!("Invoice {}", invoice.id);
    for (item, line) in invoice.items.iter().zip(costing::standardize_invoice(invoice)) {
        let cost = match (line.standardized_cost, line.reference_unit) {
            (Some(value), Some(reference_unit)) => {
                let standardized = units::StandardizedCost {
                    standardized_cost: value,
                    reference_unit,
                };
                formatter.display_cost(&standardized, None).text
            }
            _ => "unresolved".to_string(),
        };
        println!(
            "  - {:<28} {:>12}  {:>10}  {}",
            item.item_name,
            units::format_quantity(line.raw_quantity, &line.raw_unit),
            units::format_currency(line.line_amount),
            cost
        );
    }

    let validation = costing::validate_invoice(invoice);
    if validation.has_issues() {
        println!("\n{}", validation);
    } else {
        println!("\nNo issues");
    }
    Ok(())
}

fn save_invoice(data_dir: &Path, id: &str) -> CliResult {
    let mut dataset = load_for_write(data_dir)?;

    let report = match costing::apply_invoice(&mut dataset, id, Utc::now()) {
        Ok(report) => report,
        Err(CostingError::Rejected { validation, .. }) => {
            eprintln!("{}", validation);
            return Err(format!("Invoice '{}' not saved", id).into());
        }
        Err(e) => return Err(e.into()),
    };

    records::save_dataset_to_directory(&dataset, data_dir)?;

    if report.validation.has_issues() {
        eprintln!("{}", report.validation);
    }
    println!(
        "Saved invoice {}: {} items costed, {} ingredients updated",
        report.invoice_id,
        report.items_costed,
        report.ingredients_updated.len()
    );
    for ingredient_id in &report.ingredients_updated {
        println!("  - {}", ingredient_id);
    }
    Ok(())
}

fn menu_cost(config: &Config, data_dir: &Path, id: &str, save: bool) -> CliResult {
    let mut dataset = if save {
        load_for_write(data_dir)?
    } else {
        load(data_dir)?
    };

    let costing = if save {
        let costing = costing::update_menu_item_cost(&mut dataset, id)?;
        records::save_dataset_to_directory(&dataset, data_dir)?;
        costing
    } else {
        costing::cost_menu_item(&dataset, id)?
    };

    println!("{} ({})", costing.name, units::format_currency(costing.price));
    for line in &costing.lines {
        println!(
            "  - {:<24} {:>10}  {:>10}",
            line.ingredient_name,
            units::format_quantity(line.quantity, &line.unit),
            units::format_currency(line.cost)
        );
    }
    println!("Total cost: {}", units::format_currency(costing.total_cost));

    if let Some(pct) = costing.food_cost_pct {
        let target = config.costing.target_food_cost_pct;
        if pct > target {
            println!("Food cost: {:.1}% (above {:.1}% target)", pct, target);
        } else {
            println!("Food cost: {:.1}%", pct);
        }
    }
    if save {
        println!("Saved cost on {}", costing.menu_item_id);
    }
    Ok(())
}

fn stats(data_dir: &Path, date: Option<NaiveDate>, json: bool) -> CliResult {
    let dataset = load(data_dir)?;
    let today = date.unwrap_or_else(|| Utc::now().date_naive());
    let stats = analytics::dashboard_stats(&dataset, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats);
    }
    Ok(())
}

fn activity(data_dir: &Path, limit: Option<usize>) -> CliResult {
    let dataset = load(data_dir)?;

    for entry in prospects::list_activity(&dataset, limit) {
        println!(
            "{}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.title
        );
        if let Some(details) = &entry.details {
            println!("                  {}", details);
        }
    }
    Ok(())
}

fn prospect(data_dir: &Path, command: ProspectCommands) -> CliResult {
    let mut dataset = load_for_write(data_dir)?;
    let now = Utc::now();

    match command {
        ProspectCommands::Add {
            business_name,
            fields,
        } => {
            let draft = ProspectDraft {
                business_name,
                contact_name: fields.contact,
                email: fields.email,
                phone: fields.phone,
                address: fields.address,
                city: fields.city,
                state: fields.state,
                notes: fields.notes,
                last_contacted_date: fields.last_contacted,
            };
            let created = prospects::create_prospect(&mut dataset, draft, now)?;
            println!("Created prospect {} ({})", created.id, created.business_name);
        }
        ProspectCommands::Update {
            id,
            business_name,
            fields,
        } => {
            let update = ProspectUpdate {
                business_name,
                contact_name: fields.contact,
                email: fields.email,
                phone: fields.phone,
                address: fields.address,
                city: fields.city,
                state: fields.state,
                notes: fields.notes,
                last_contacted_date: fields.last_contacted,
            };
            let changed = prospects::update_prospect(&mut dataset, &id, update, now)?;
            if changed.is_empty() {
                println!("No changes to {}", id);
                return Ok(());
            }
            println!("Updated {}: {}", id, changed.join(", "));
        }
        ProspectCommands::Delete { id } => {
            let removed = prospects::delete_prospect(&mut dataset, &id, now)?;
            println!("Deleted prospect {} ({})", removed.id, removed.business_name);
        }
    }

    records::save_dataset_to_directory(&dataset, data_dir)?;
    Ok(())
}
