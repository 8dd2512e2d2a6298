use std::sync::Arc;
use std::time::Instant;

use cinematch::{
    config::Config,
    services::run_batch,
    store::{load_store, CsvRatingSource},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cinematch=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let start = Instant::now();
    let config = Config::from_env()?;

    let source = CsvRatingSource::from_config(&config);
    let store = Arc::new(load_store(&source).await?);

    let targets = config.target_users.clone().unwrap_or_default();
    let report = run_batch(store, &targets, config.recommendation_params()).await?;

    match &config.output_path {
        Some(path) => {
            report.write_json(path).await?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => println!("{}", report.to_json_pretty()?),
    }

    tracing::info!(elapsed_ms = start.elapsed().as_millis(), "Done");
    Ok(())
}
