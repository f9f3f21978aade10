//! Step through a wavelength range and print where the grating lands

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use monochrom::{Monochromator, SerialTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    
    // Change to your serial port
    let port = std::env::var("MONOCHROMATOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    
    // Long moves can take several seconds before the echo comes back
    let transport = SerialTransport::new(port).with_read_timeout(Duration::from_secs(30));
    let mut mono = Monochromator::new(transport);
    
    mono.connect().await.context("opening monochromator port")?;
    println!("Connected: {}", mono.info().await?);
    
    let grating = mono.grating().await?;
    println!("Grating: {}", grating);
    
    mono.set_shutter(false).await?;
    
    for target in (400..=700).step_by(50) {
        let reached = mono.goto_wavelength(target as f64).await?;
        println!("{:>7.3} nm -> {:>7.3} nm", target as f64, reached);
    }
    
    mono.set_shutter(true).await?;
    mono.disconnect()?;
    
    Ok(())
}
