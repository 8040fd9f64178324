//! # Card Preview
//!
//! Command-line host for `card-core`.
//!
//! Mounts a profile card over JSON data, replays a timeline of input
//! events against it, and prints one JSON frame per line on stdout.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p card-preview -- --editable
//! ```
//!
//! ## With your own data and timeline:
//!
//! ```bash
//! cargo run -p card-preview -- --data profile.json --script hover.json --frame-ms 100
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `PreviewConfig` - Resolved options for a preview run
//! - `Script` - Timeline of actions, loaded from JSON
//! - `Replay` - Drives a `ProfileCard` through a script on a virtual or wall clock

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod profile;
mod replay;
mod script;

pub use profile::{profile_dialog, profile_sides, sample_profile};
pub use replay::{Frame, Replay, ReplayOptions};
pub use script::{Script, ScriptAction, ScriptError, ScriptStep};

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Command-line arguments for card-preview.
#[derive(Debug, Clone, Parser)]
#[command(name = "card-preview")]
#[command(about = "Replay input timelines against a profile card and print rendered frames")]
#[command(version)]
pub struct CliArgs {
    /// JSON file with the card data
    #[arg(long, env = "CARD_PREVIEW_DATA")]
    pub data: Option<PathBuf>,

    /// JSON timeline: [{"at_ms": 0, "event": {"type": "pointer_enter"}}, ...]
    #[arg(long, env = "CARD_PREVIEW_SCRIPT")]
    pub script: Option<PathBuf>,

    /// JSON card configuration overrides
    #[arg(long, env = "CARD_PREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Side forced by the host
    #[arg(long)]
    pub side: Option<String>,

    /// Variant token
    #[arg(long, default_value = "default")]
    pub variant: String,

    /// Show the edit trigger
    #[arg(long)]
    pub editable: bool,

    /// Interval between printed frames, in milliseconds
    #[arg(long, default_value = "50")]
    pub frame_ms: u64,

    /// Replay on the wall clock instead of a virtual one
    #[arg(long)]
    pub realtime: bool,
}

/// Preview run configuration.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Card data file; the built-in sample profile when absent.
    pub data: Option<PathBuf>,
    /// Timeline file; the built-in demo timeline when absent.
    pub script: Option<PathBuf>,
    /// Card configuration file.
    pub config: Option<PathBuf>,
    /// Options for the mounted card.
    pub options: ReplayOptions,
    /// Interval between printed frames.
    pub frame_interval: Duration,
    /// Replay on the wall clock.
    pub realtime: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewConfig {
    /// Create a preview configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: None,
            script: None,
            config: None,
            options: ReplayOptions::default(),
            frame_interval: Duration::from_millis(50),
            realtime: false,
        }
    }
}

impl From<CliArgs> for PreviewConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            data: args.data,
            script: args.script,
            config: args.config,
            options: ReplayOptions {
                forced_side: args.side.map(Into::into),
                variant: args.variant.as_str().into(),
                editable: args.editable,
            },
            frame_interval: Duration::from_millis(args.frame_ms.max(1)),
            realtime: args.realtime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["card-preview"]);
        let config = PreviewConfig::from(args);
        assert_eq!(config.frame_interval, Duration::from_millis(50));
        assert!(!config.options.editable);
        assert!(config.options.forced_side.is_none());
        assert!(!config.realtime);
    }

    #[test]
    fn test_cli_flags() {
        let args = CliArgs::parse_from([
            "card-preview",
            "--side",
            "back",
            "--variant",
            "compact",
            "--editable",
            "--frame-ms",
            "0",
        ]);
        let config = PreviewConfig::from(args);
        assert_eq!(config.options.forced_side, Some("back".into()));
        assert_eq!(config.options.variant.as_str(), "compact");
        assert!(config.options.editable);
        assert_eq!(config.frame_interval, Duration::from_millis(1));
    }
}
