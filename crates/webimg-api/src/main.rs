use webimg_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, folders, routes)
    let (_state, router) = webimg_api::setup::initialize_app(config.clone()).await?;

    webimg_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
