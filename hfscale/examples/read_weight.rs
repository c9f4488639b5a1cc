//! Read weight and status example

use hfscale::Scale;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hfscale=info".into()),
        )
        .init();

    let ip = std::env::var("SCALE_IP").unwrap_or_else(|_| "192.168.1.50".to_string());
    let port: u16 = std::env::var("SCALE_PORT")
        .unwrap_or_else(|_| "4001".to_string())
        .parse()?;

    let scale = Scale::new(ip, port);

    let weight = scale.read_weight().await;
    println!("Weight: {}", weight);
    println!("{}", serde_json::to_string_pretty(&weight)?);

    let status = scale.read_status().await;
    println!("Status: {}", status);

    Ok(())
}
