use order_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    order_server::utils::logger::init_logger();

    print_banner();
    tracing::info!("Order server starting...");

    let config = Config::from_env();
    let state = ServerState::initialize(&config).await;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
