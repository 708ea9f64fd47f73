use color_eyre::eyre::Result;
use dotenv::dotenv;
use turnero_api::config::ApiConfig;
use turnero_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    // Business hours and booking rules are read here as well
    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url).await?;

    // Tables and the overlap constraints must exist before the first booking
    initialize_database(&db_pool).await?;

    turnero_api::start_server(config, db_pool).await?;

    Ok(())
}
