//! Tare and preset tare example
//!
//! Usage: `cargo run --example tare -- [preset_kg]`

use hfscale::Scale;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ip = std::env::var("SCALE_IP").unwrap_or_else(|_| "192.168.1.50".to_string());
    let scale = Scale::new(ip, 4001);

    match std::env::args().nth(1) {
        Some(value) => {
            let kg: f64 = value.parse()?;
            println!("Setting preset tare to {} kg...", kg);
            println!("{}", scale.set_preset_tare(kg).await);
        }
        None => {
            // A successful tare also clears any preset tare
            println!("Executing tare...");
            println!("{}", scale.execute_tare().await);
        }
    }

    Ok(())
}
