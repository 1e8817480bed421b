use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use orb_core::PackPolicy;
use orb_renderer::RenderConfig;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "orb_viewer")]
#[command(about = "Interactive CPU ray caster for sphere scenes")]
pub struct Args {
    /// Scene description (JSON); the built-in demo scene when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "400")]
    pub width: usize,

    /// Image height in pixels
    #[arg(long, default_value = "300")]
    pub height: usize,

    /// Number of row bands rendered in parallel (defaults to the CPU count)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Clamp out-of-range colors instead of wrapping them
    #[arg(long)]
    pub saturate: bool,

    /// Render one frame to this file (.ppm or .png) and exit
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            workers: self.workers,
            pack_policy: if self.saturate {
                PackPolicy::Saturate
            } else {
                PackPolicy::Wrap
            },
        }
    }
}
