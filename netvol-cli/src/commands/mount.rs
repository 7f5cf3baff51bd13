use clap::Args;
use netvol::VolumeDriver;

#[derive(Args, Debug)]
pub struct MountArgs {
    /// Mounter identity to register
    #[arg(long)]
    pub id: String,

    /// Name of the volume
    pub name: String,
}

pub fn execute(args: MountArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    let mountpoint = driver.mount(&args.name, &args.id)?;
    println!("{}", driver.root().join(mountpoint).display());
    Ok(())
}
