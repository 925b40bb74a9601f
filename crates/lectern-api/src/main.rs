use lectern_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (catalog, storage, services, routes)
    let (_state, router) = lectern_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    lectern_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
