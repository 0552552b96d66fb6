use core::panic;
use std::{fs, path::PathBuf};

use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "MOVCAT_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,

    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "MOVCAT_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "MOVCAT_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/movcat.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "MOVCAT_DATA_DIR",
        help = "Data directory (database, configs etc.), default is system default like ~/.local/share/movcat",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "MOVCAT_DEFAULT_PAGE_SIZE",
        default_value = "20",
        help = "Default page size for movie listings"
    )]
    pub default_page_size: u32,

    #[arg(long, env = "MOVCAT_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

fn default_data_dir() -> String {
    let dir = dirs::data_dir()
        .map(|p| p.join("movcat"))
        .unwrap_or_else(|| PathBuf::from("movcat"));

    if !fs::exists(&dir).expect("Failed to check if data directory exists") {
        fs::create_dir_all(&dir).expect("Failed to create data directory");
    } else if !dir.is_dir() {
        panic!("Data directory is not a directory",)
    }

    dir.to_string_lossy().to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/movcat.db", self.data_dir))
    }
}
