use anyhow::Result;
use clap::Parser;
use mealprep::cli::{Cli, run};
use mealprep::config::Settings;
use mealprep::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.logging.level, settings.logging.json)?;

    let pool = db::create_pool(&settings.database.url, settings.database.max_connections).await?;
    db::migrate(&pool).await?;
    let store = db::SqliteStore::new(pool);

    if let Err(err) = run(cli.command, &store, &settings).await {
        tracing::error!(error = %err, "command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    Ok(())
}
