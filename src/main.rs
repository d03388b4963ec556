use clap::Parser;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, error};

use marsfeed::config::Config;
use marsfeed::mars::MarsApiClient;
use marsfeed::models::{FetchStatus, MarsProperty, PropertyFilter};
use marsfeed::view;
use marsfeed::{FetchOutcome, PropertyFeedController};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "marsfeed=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let file_appender = tracing_appender::rolling::never(".", "marsfeed.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    match &cli.command {
        Commands::List { filter } => {
            let filter = Commands::parse_filter(filter)?;
            info!("Listing properties with filter: {}", filter);

            match list(&config, filter).await {
                Ok(listing) => print!("{}", listing),
                Err(e) => error!("Listing failed: {}", e),
            }
        }

        Commands::Show { id, filter } => {
            let filter = Commands::parse_filter(filter)?;
            info!("Showing property {}", id);

            match show(&config, filter, id).await {
                Ok(detail) => print!("{}", detail),
                Err(e) => error!("Show failed: {}", e),
            }
        }

        Commands::Watch { filter } => {
            let filters = filter
                .iter()
                .map(|f| Commands::parse_filter(f))
                .collect::<Result<Vec<_>>>()?;

            if let Err(e) = watch_filters(&config, &filters).await {
                error!("Watch failed: {}", e);
            }
        }
    }

    Ok(())
}

fn build_controller(config: &Config) -> Result<PropertyFeedController> {
    let client = MarsApiClient::new(config)?;
    info!("Mars API endpoint: {}", client.endpoint());
    Ok(PropertyFeedController::new(Arc::new(client), config.controller_options()))
}

/// Wait for the initial fetch, then re-query if a narrower filter was asked for.
/// The outcome describes the fetch for `filter` alone.
async fn load(config: &Config, filter: PropertyFilter) -> Result<(PropertyFeedController, FetchOutcome)> {
    let feed = build_controller(config)?;
    feed.settled().await;

    let outcome = if filter == PropertyFilter::ShowAll {
        feed.initial_outcome()
    } else {
        feed.refresh(filter).await
    };

    Ok((feed, outcome))
}

async fn list(config: &Config, filter: PropertyFilter) -> Result<String> {
    let (feed, outcome) = load(config, filter).await?;
    feed.dispose();

    match outcome {
        FetchOutcome::Listing(properties) => Ok(view::render_listing(&properties)),
        FetchOutcome::Empty => Ok(view::render_listing(&[])),
        FetchOutcome::Failed => Err(anyhow!(view::render_status(Some(FetchStatus::Error)))),
    }
}

async fn show(config: &Config, filter: PropertyFilter, id: &str) -> Result<String> {
    let (feed, outcome) = load(config, filter).await?;

    let properties = match outcome {
        FetchOutcome::Listing(properties) => properties,
        FetchOutcome::Empty => Vec::new(),
        FetchOutcome::Failed => {
            feed.dispose();
            return Err(anyhow!(view::render_status(Some(FetchStatus::Error))));
        }
    };

    let property = properties
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| anyhow!("Property {} not found for filter {}", id, filter))?;

    let mut navigation = feed.navigate_to_selected().subscribe();
    feed.request_navigation_to(property);

    navigation.changed().await?;
    let detail = navigation
        .borrow_and_update()
        .as_ref()
        .map(view::render_detail)
        .ok_or_else(|| anyhow!("Navigation target was cleared before it was shown"))?;
    feed.acknowledge_navigation_complete();

    feed.dispose();
    Ok(detail)
}

async fn watch_filters(config: &Config, filters: &[PropertyFilter]) -> Result<()> {
    let feed = build_controller(config)?;
    let mut status = feed.status().subscribe();
    let mut properties = feed.properties().subscribe();

    feed.settled().await;
    print_changes(&mut status, &mut properties);

    for filter in filters {
        println!("== filter: {}", filter);
        feed.update_filter(*filter);
        feed.settled().await;
        print_changes(&mut status, &mut properties);
    }

    feed.dispose();
    Ok(())
}

fn print_changes(
    status: &mut watch::Receiver<Option<FetchStatus>>,
    properties: &mut watch::Receiver<Vec<MarsProperty>>,
) {
    if status.has_changed().unwrap_or(false) {
        println!("{}", view::render_status(*status.borrow_and_update()));
    }
    if properties.has_changed().unwrap_or(false) {
        print!("{}", view::render_listing(&properties.borrow_and_update()));
    }
}
