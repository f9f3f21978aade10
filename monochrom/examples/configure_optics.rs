//! Configure grating, output port and slits on a device behind a terminal server

use tracing_subscriber::EnvFilter;
use monochrom::Monochromator;

#[tokio::main]
async fn main() -> monochrom::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();
    
    let host = std::env::var("MONOCHROMATOR_HOST").unwrap_or_else(|_| "192.168.1.50".to_string());
    
    let mut mono = Monochromator::tcp(host, 4001);
    mono.connect().await?;
    
    mono.set_grating(2).await?;
    println!("Grating: {}", mono.grating().await?);
    
    mono.set_output_port(1).await?;
    println!("Output port: {}", mono.output_port().await?);
    
    for slit in 1..=2 {
        let width = mono.slit_width(slit, Some(100)).await?;
        println!("Slit {}: {} um", slit, width);
    }
    
    println!("Status: {:?}", mono.status().await?);
    
    // Dropping `mono` closes the connection
    Ok(())
}
