pub mod create;
pub mod drivers;
pub mod inspect;
pub mod ls;
pub mod mount;
pub mod path;
pub mod rm;
pub mod unmount;

use clap::Subcommand;
use netvol::VolumeDriver;

use crate::cli::GlobalFlags;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a volume
    Create(create::CreateArgs),
    /// List volumes
    #[command(visible_alias = "list")]
    Ls(ls::LsArgs),
    /// Show volume records as JSON
    Inspect(inspect::InspectArgs),
    /// Remove one or more volumes
    Rm(rm::RmArgs),
    /// Print the data path of a volume
    Path(path::PathArgs),
    /// Register a mounter on a volume
    Mount(mount::MountArgs),
    /// Drop a mounter from a volume
    Unmount(unmount::UnmountArgs),
    /// List available drivers
    Drivers,
}

pub fn execute(command: Command, global: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Command::Drivers => drivers::execute(),
        command => {
            let driver = global.create_driver()?;
            let result = run(command, driver.as_ref());
            if let Err(e) = driver.destroy() {
                tracing::warn!(error = %e, "Failed to shut down driver");
            }
            result
        }
    }
}

fn run(command: Command, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    match command {
        Command::Create(args) => create::execute(args, driver),
        Command::Ls(args) => ls::execute(args, driver),
        Command::Inspect(args) => inspect::execute(args, driver),
        Command::Rm(args) => rm::execute(args, driver),
        Command::Path(args) => path::execute(args, driver),
        Command::Mount(args) => mount::execute(args, driver),
        Command::Unmount(args) => unmount::execute(args, driver),
        Command::Drivers => drivers::execute(),
    }
}
