use clap::Args;
use netvol::VolumeDriver;

#[derive(Args, Debug)]
pub struct UnmountArgs {
    /// Mounter identity to drop
    #[arg(long)]
    pub id: String,

    /// Name of the volume
    pub name: String,
}

pub fn execute(args: UnmountArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    driver.unmount(&args.name, &args.id)?;
    println!("{}", args.name);
    Ok(())
}
