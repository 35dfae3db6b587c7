use anyhow::Result;
use blog_content::config::Config;
use blog_content::server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blog_content=info".parse()?),
        )
        .init();

    info!("Starting blog content API");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Content root: {} (default language: {})",
        config.content_root.display(),
        config.default_language
    );

    server::serve(config).await
}
