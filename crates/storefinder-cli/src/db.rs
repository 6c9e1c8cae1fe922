//! Catalog database commands: connectivity, migrations and seeding from
//! the YAML catalog.

use clap::Subcommand;
use storefinder_core::AppConfig;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert every store of the YAML catalog into the database
    Seed,
    /// Print one stored record by its catalog code
    Show {
        /// Catalog code, e.g. `sp-centro`
        code: String,
    },
}

pub(crate) async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = storefinder_db::connect_pool_from_config(config).await?;
    match command {
        DbCommands::Ping => {
            storefinder_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = storefinder_db::run_migrations(&pool).await?;
            println!("migrations up to date ({applied} applied)");
        }
        DbCommands::Seed => run_seed(&pool, config).await?,
        DbCommands::Show { code } => run_show(&pool, &code).await?,
    }
    pool.close().await;
    Ok(())
}

/// Load `catalog_path` and upsert its stores by code.
///
/// # Errors
///
/// Returns an error if the catalog file is unreadable or invalid, or if
/// the upsert transaction fails. Nothing is written on error.
async fn run_seed(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = storefinder_core::load_catalog(&config.catalog_path)?;
    if catalog.stores.is_empty() {
        println!(
            "no stores in {}; nothing to seed",
            config.catalog_path.display()
        );
        return Ok(());
    }

    let (inserted, updated) = storefinder_db::upsert_stores(pool, &catalog.stores).await?;
    let active = storefinder_db::count_active_stores(pool).await?;
    println!("seeded {inserted} new and {updated} updated stores ({active} active)");
    Ok(())
}

async fn run_show(pool: &sqlx::PgPool, code: &str) -> anyhow::Result<()> {
    let Some(store) = storefinder_db::get_store_by_code(pool, code).await? else {
        anyhow::bail!("no store with code {code}");
    };
    println!("{}", serde_json::to_string_pretty(&store)?);
    Ok(())
}
