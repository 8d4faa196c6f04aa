use maison_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment first, config reads from it
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Working directory + logging
    setup_environment(&config)?;

    print_banner();
    tracing::info!("Maison server starting...");

    // 3. Serve (state is built inside run, socket layer included)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
