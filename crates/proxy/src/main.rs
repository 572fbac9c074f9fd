//! simcheck proxy binary

use proxy::ProxyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProxyConfig::load()?;
    proxy::start_proxy(config).await?;
    Ok(())
}
