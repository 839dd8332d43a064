/**
 * kanflow Server Entry Point
 *
 * Starts the Axum server that streams board events to connected clients.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = kanflow::shared::config::AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();
    tracing::info!(
        "[STARTUP] Configuration loaded: bind={} send_timeout={:?} buffer={} identity_header={}",
        config.bind_addr,
        config.send_timeout,
        config.connection_buffer,
        config.identity_header
    );

    let addr = config.socket_addr()?;
    let app = kanflow::backend::server::create_app(config).await;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[STARTUP] Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin kanflow-server --features ssr");
    std::process::exit(1);
}
