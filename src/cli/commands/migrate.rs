use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let database_url = DatabaseManager::database_url()?;
    let pool = DatabaseManager::connect(&database_url, &config().database).await?;
    DatabaseManager::migrate(&pool).await?;
    println!("Migrations applied to {}", DatabaseManager::redact(&database_url));
    Ok(())
}
