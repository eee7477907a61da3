use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hisab={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let engine_settings = settings.engine.unwrap_or_default();
    let mut fallbacks = engine::FallbackConfig::default();
    if let Some(name) = engine_settings.fallback_income_category {
        fallbacks.income_category = name;
    }
    if let Some(name) = engine_settings.fallback_expense_category {
        fallbacks.expense_category = name;
    }
    if let Some(name) = engine_settings.fallback_recipient {
        fallbacks.recipient = name;
    }
    if let Some(name) = engine_settings.fallback_source {
        fallbacks.source = name;
    }

    let mut builder = engine::Engine::builder()
        .database(db.clone())
        .fallbacks(fallbacks);
    if let Some(currency) = engine_settings.currency {
        builder = builder.home_currency(currency);
    }
    let engine = builder.build().await?;

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, db, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
