//! Query every configured scale
//!
//! Usage: `cargo run --example from_config -- scales.toml`

use anyhow::Context;
use hfscale::ScaleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hfscale=info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "scales.toml".to_string());

    let config = ScaleConfig::load(&path).with_context(|| format!("loading {}", path))?;
    let service = config.service();

    for device in config.devices.iter().filter(|device| device.active) {
        let outcome = service.weight(&device.name).await;
        println!("{}: {}", device, serde_json::to_string(&outcome)?);
    }

    Ok(())
}
