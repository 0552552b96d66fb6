pub mod config;
pub mod error;
pub mod run;

use std::str::FromStr as _;

use config::ServerConfig;
pub use error::{Error, Result};
use movcat_app::state::{AppConfig, AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let app_config = AppConfig {
        default_page_size: config.default_page_size,
    };

    let options = SqliteConnectOptions::from_str(&config.database_url())?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    Ok(AppState::new(app_config, pool))
}
