//! Binary entry point: loads configuration from the environment and serves the proxy routes.

// crates.io
use tracing::info;
// self
use kis_quote_proxy::{api, config::ProxyConfig, error::Result, obs};

#[tokio::main]
async fn main() -> Result<()> {
	obs::init_tracing();

	let config = ProxyConfig::from_env()?;

	info!(
		listen_addr = %config.listen_addr,
		token_endpoint = %config.descriptor.token_endpoint,
		upstream_timeout = ?config.upstream_timeout,
		credentials = ?config.credentials,
		"Configuration loaded."
	);

	api::serve(config).await
}
