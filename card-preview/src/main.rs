//! # Card Preview
//!
//! Replays an input timeline against a profile card and prints frames.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use card_core::CardConfig;
use card_preview::{sample_profile, CliArgs, Frame, PreviewConfig, Replay, Script};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Frames go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "card_preview=info,card_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = PreviewConfig::from(args);

    let data = match config.data.as_deref() {
        Some(path) => serde_json::from_str::<Value>(&read(path)?)
            .with_context(|| format!("Invalid card data in {}", path.display()))?,
        None => sample_profile(),
    };
    let card_config = match config.config.as_deref() {
        Some(path) => CardConfig::from_json(&read(path)?)
            .with_context(|| format!("Invalid card configuration in {}", path.display()))?,
        None => CardConfig::default(),
    };
    let script = match config.script.as_deref() {
        Some(path) => Script::from_json(&read(path)?)
            .with_context(|| format!("Invalid script in {}", path.display()))?,
        None => Script::demo(config.options.editable),
    };

    tracing::info!(
        "Replaying {} step(s), frame every {:?}{}",
        script.steps().len(),
        config.frame_interval,
        if config.realtime { " (realtime)" } else { "" }
    );

    if config.realtime {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        rt.block_on(async {
            let start = tokio::time::Instant::now().into_std();
            let mut replay = Replay::new(data, config.options, card_config, start);
            replay
                .run_realtime(&script, config.frame_interval, |frame| {
                    if let Err(e) = print_frame(frame) {
                        tracing::error!("Failed to encode frame: {}", e);
                    }
                })
                .await;
        });
    } else {
        let mut replay = Replay::new(data, config.options, card_config, Instant::now());
        for frame in replay.run_virtual(&script, config.frame_interval) {
            print_frame(&frame)?;
        }
    }

    tracing::info!("Card preview finished");
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_frame(frame: &Frame) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(frame)?);
    Ok(())
}
