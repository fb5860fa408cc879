use ims_server::migrator::Migrator;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // `up` (default), `down` to revert the latest migration, `status` to list them
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    // APP__DATABASE_URL wins over DATABASE_URL, like the server itself
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if std::env::var("APP__DATABASE_URL").is_err() => url,
        _ => ims_server::config::load_config()?.database_url,
    };

    info!("Connecting to database");

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(options).await?;

    match command.as_str() {
        "up" => {
            info!("Applying pending migrations");
            Migrator::up(&db, None).await?;
        }
        "down" => {
            info!("Reverting the latest migration");
            Migrator::down(&db, Some(1)).await?;
        }
        "status" => Migrator::status(&db).await?,
        other => anyhow::bail!("unknown command '{}', expected up, down or status", other),
    }

    info!("Migration command '{}' completed successfully", command);
    Ok(())
}
