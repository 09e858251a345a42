// Bird Watch - headless host
// Boots the core, mounts the live feed and logs every rendered feed update.

use anyhow::Context;
use birdwatch::{app, commands};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "birdwatch=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bird Watch");

    let data_dir = std::env::var_os("BIRDWATCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("birdwatch-data"));

    let state = app::setup(data_dir, None)
        .await
        .context("application setup failed")?;

    commands::refresh_user_location(&state).await;

    let mut updates = commands::watch_feed(&state);
    let subscription = commands::mount_feed(&state).await;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let commands::Screen::Feed { items, .. } = commands::current_screen(&state).await {
                    tracing::info!("Feed updated: {} sightings", items.len());
                    for item in &items {
                        tracing::info!(
                            "{} {} | {} | {}",
                            item.category.glyph,
                            item.category.display_label,
                            item.time_label,
                            item.notes
                        );
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    drop(subscription);

    Ok(())
}
