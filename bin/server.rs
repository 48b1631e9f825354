// Entity Catalog - Web Server
// Server-rendered list/edit pages over the SQLite catalog.

use anyhow::{Context, Result};
use entity_catalog::seed::seed_defaults;
use entity_catalog::{logging, web, Catalog, Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    println!("🌐 Entity Catalog - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;

    let catalog = Catalog::open(&config)
        .with_context(|| format!("failed to open {}", config.database.display()))?;
    println!("✓ Database opened: {}", config.database.display());

    let report = seed_defaults(&catalog).context("failed to seed lookup records")?;
    if report.locations + report.vendors > 0 {
        println!(
            "✓ Seeded {} locations, {} vendors",
            report.locations, report.vendors
        );
    }

    let app = web::router(Arc::new(catalog), config.page_size);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind))?;

    info!(bind = %config.bind, page_size = config.page_size, "server listening");
    println!("\n🚀 Server running on http://{}", config.bind);
    println!("   Sites:    /archaeological-sites");
    println!("   Parks:    /national-parks");
    println!("   Expenses: /expenses");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}
