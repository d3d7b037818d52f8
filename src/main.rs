use anyhow::Result;
use chrono::Utc;
use tracing::info;

use twitter_graph::clients::{InfluxClient, TwitterClient};
use twitter_graph::config::Config;
use twitter_graph::pipeline::Pipeline;
use twitter_graph::points::capture_time;

// One sampling pass per invocation; scheduling is left to cron or a timer unit
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twitter_graph=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    info!(user = %config.twitter_user, "Config loaded");

    let captured_at = capture_time(Utc::now());

    let twitter = TwitterClient::new(config.twitter.clone());
    let influx = InfluxClient::new(&config.influx);
    let mut pipeline = Pipeline::new(twitter, influx);

    pipeline
        .run(&config.twitter_user, &config.influx.database, captured_at)
        .await?;

    Ok(())
}
