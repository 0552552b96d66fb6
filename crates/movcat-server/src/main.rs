use movcat_server::{Result, config::ServerConfig, run::run};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = ServerConfig::load()?;
    run(args).await
}
