use std::path::PathBuf;

use clap::{Args, Parser};
use netvol::{DriverRegistry, VolumeDriver};
use netvol_shared::constants::{DEFAULT_ROOT, drivers, envs};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(name = "netvol", version, about = "Manage persistent named volumes")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Storage root holding the registry and volume directories
    #[arg(long, global = true, env = envs::NETVOL_ROOT, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Volume driver to use
    #[arg(long, global = true, env = envs::DRIVER, default_value = drivers::NFS)]
    pub driver: String,

    /// Driver options (JSON for the nfs driver)
    #[arg(long, global = true, env = envs::DRIVER_OPTIONS, default_value = "{}")]
    pub driver_options: String,

    /// Log level
    #[arg(
        long,
        global = true,
        env = envs::LOG_LEVEL,
        default_value = "info",
        value_parser = ["debug", "info", "warn", "error"]
    )]
    pub log_level: String,
}

impl GlobalFlags {
    /// Build the configured driver from the built-in registry.
    pub fn create_driver(&self) -> anyhow::Result<Box<dyn VolumeDriver>> {
        let driver = DriverRegistry::builtin().create(
            &self.driver,
            &self.root,
            &self.driver_options,
        )?;
        Ok(driver)
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the level flag.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(false),
        )
        .try_init();
}
