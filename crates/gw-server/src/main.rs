//! memgate HTTP gateway binary.

use memgate::GatewayConfig;
use memgate_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let gateway_config = GatewayConfig::load()?;
    let server_config = ServerConfig::load()?;

    memgate_server::start_server(gateway_config, server_config).await?;

    Ok(())
}
