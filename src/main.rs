use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use entity_catalog::config::ENV_DATABASE;
use entity_catalog::seed::{import_locations, import_vendors, seed_defaults};
use entity_catalog::{
    logging, Catalog, Config, ExpenseCategory, ExpenseFilter, HistoricalPeriod, Page, PageRequest,
    ParkFilter, ParkType, SiteFilter,
};

#[derive(Parser)]
#[command(name = "entity-catalog", version, about = "Sites, parks and expenses catalog")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = ENV_DATABASE)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the schema and seed default locations and vendors
    Init,

    /// Bulk-create locations or vendors from a CSV file
    Import {
        #[arg(value_enum)]
        kind: ImportKind,
        csv: PathBuf,
    },

    /// List archaeological sites
    Sites {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        area_size: Option<f64>,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        period: Option<HistoricalPeriod>,
        #[arg(long)]
        location_id: Option<i64>,
        #[command(flatten)]
        listing: Listing,
    },

    /// List national parks
    Parks {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        area_size: Option<f64>,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long)]
        park_type: Option<ParkType>,
        #[arg(long)]
        location_id: Option<i64>,
        #[command(flatten)]
        listing: Listing,
    },

    /// List expenses
    Expenses {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<ExpenseCategory>,
        #[arg(long)]
        vendor: Option<i64>,
        #[command(flatten)]
        listing: Listing,
    },

    /// Mark a site as closed
    CloseSite { id: i64 },

    /// Mark a park as closed
    ClosePark { id: i64 },

    /// Add one day to an expense's expiration countdown
    ExtendExpense { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportKind {
    Locations,
    Vendors,
}

#[derive(clap::Args)]
struct Listing {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Records per page (defaults to CATALOG_PAGE_SIZE)
    #[arg(long)]
    size: Option<usize>,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database = database;
    }

    let catalog = Catalog::open(&config)
        .with_context(|| format!("failed to open {}", config.database.display()))?;

    match cli.command {
        Command::Init => run_init(&catalog, &config),
        Command::Import { kind, csv } => run_import(&catalog, kind, &csv),
        Command::Sites {
            name,
            area_size,
            rating,
            period,
            location_id,
            listing,
        } => {
            let filter = SiteFilter {
                name,
                area_size,
                rating,
                period,
                location_id,
            };
            let request = listing.request(&config)?;
            let page = catalog
                .sites
                .find_page(&filter, request.number(), request.size())
                .context("failed to list sites")?;

            print_page(&page, listing.json, |site| {
                format!(
                    "{:>4}  {:<28} {:>8.1} ha  ★{:<4.1} {:<11} {:<24} {}",
                    site.id.unwrap_or_default(),
                    site.name,
                    site.area_size,
                    site.rating,
                    site.period.label(),
                    site.location.display_name(),
                    if site.closed { "closed" } else { "open" }
                )
            })
        }
        Command::Parks {
            name,
            area_size,
            rating,
            park_type,
            location_id,
            listing,
        } => {
            let filter = ParkFilter {
                name,
                area_size,
                rating,
                park_type,
                location_id,
            };
            let request = listing.request(&config)?;
            let page = catalog
                .parks
                .find_page(&filter, request.number(), request.size())
                .context("failed to list parks")?;

            print_page(&page, listing.json, |park| {
                format!(
                    "{:>4}  {:<28} {:>8.1} ha  ★{:<4.1} {:<16} {:<24} {}",
                    park.id.unwrap_or_default(),
                    park.name,
                    park.area_size,
                    park.rating,
                    park.park_type.label(),
                    park.location.display_name(),
                    if park.closed { "closed" } else { "open" }
                )
            })
        }
        Command::Expenses {
            title,
            category,
            vendor,
            listing,
        } => {
            let filter = ExpenseFilter {
                title,
                expense_category: category,
                vendor,
            };
            let request = listing.request(&config)?;
            let page = catalog
                .expenses
                .find_page(&filter, request.number(), request.size())
                .context("failed to list expenses")?;

            let today = Local::now().date_naive();
            print_page(&page, listing.json, |expense| {
                format!(
                    "{:>4}  {:<28} {:>10.2}  {:<10} {:<16} {}  {}",
                    expense.id.unwrap_or_default(),
                    expense.title,
                    expense.amount,
                    expense.expense_category.label(),
                    expense.vendor.name,
                    expense.expires_on(),
                    if expense.is_expired(today) { "expired" } else { "active" }
                )
            })
        }
        Command::CloseSite { id } => {
            let site = catalog
                .sites
                .close(id)
                .with_context(|| format!("failed to close site {}", id))?;
            println!("✓ Site {} ({}) closed", id, site.name);
            Ok(())
        }
        Command::ClosePark { id } => {
            let park = catalog
                .parks
                .close(id)
                .with_context(|| format!("failed to close park {}", id))?;
            println!("✓ Park {} ({}) closed", id, park.name);
            Ok(())
        }
        Command::ExtendExpense { id } => {
            let expense = catalog
                .expenses
                .extend_expiration(id)
                .with_context(|| format!("failed to extend expense {}", id))?;
            println!(
                "✓ Expense {} now expires on {} ({} days)",
                id,
                expense.expires_on(),
                expense.days_to_expire
            );
            Ok(())
        }
    }
}

impl Listing {
    fn request(&self, config: &Config) -> Result<PageRequest> {
        let size = self.size.unwrap_or(config.page_size);
        PageRequest::from_one_based(self.page, size).context("--page and --size must be at least 1")
    }
}

fn run_init(catalog: &Catalog, config: &Config) -> Result<()> {
    println!("🗄️  Catalog database: {}", config.database.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let report = seed_defaults(catalog).context("failed to seed lookup records")?;
    println!("✓ Schema ready (WAL mode)");
    println!("✓ Seeded {} locations, {} vendors", report.locations, report.vendors);

    Ok(())
}

fn run_import(catalog: &Catalog, kind: ImportKind, csv: &std::path::Path) -> Result<()> {
    println!("📂 Importing {}...", csv.display());

    let imported = match kind {
        ImportKind::Locations => import_locations(csv, &catalog.locations),
        ImportKind::Vendors => import_vendors(csv, &catalog.vendors),
    }
    .with_context(|| format!("failed to import {}", csv.display()))?;

    let noun = match kind {
        ImportKind::Locations => "locations",
        ImportKind::Vendors => "vendors",
    };
    println!("✓ Imported {} {}", imported, noun);

    Ok(())
}

fn print_page<T, F>(page: &Page<T>, json: bool, line: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    for item in &page.content {
        println!("{}", line(item));
    }

    println!(
        "\n📊 Page {} of {} ({} total)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );

    Ok(())
}
