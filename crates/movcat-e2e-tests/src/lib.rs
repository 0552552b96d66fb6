use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};
use movcat_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use tempfile::TempDir;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?;
    let port = port.to_string();
    let args = &[
        "movcat-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    test_config(test_name, &std::env::temp_dir())
}

/// Starts the server in a background task and waits until its health
/// endpoint answers. Returns a client and the base URL to use against it.
pub async fn launch_env(args: ServerConfig) -> Result<(reqwest::Client, reqwest::Url)> {
    let base_url: reqwest::Url = format!("http://127.0.0.1:{}/", args.port).parse()?;
    let state = movcat_server::build_state(&args).await?;
    tokio::spawn(async move {
        if let Err(e) = movcat_server::run::run_with_state(args, state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    let health_url = base_url.join("health")?;
    for _ in 0..50 {
        if let Ok(response) = client.get(health_url.clone()).send().await {
            if response.status().is_success() {
                return Ok((client, base_url));
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    Err(anyhow!("Server did not become ready"))
}
