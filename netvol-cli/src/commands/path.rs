use clap::Args;
use netvol::VolumeDriver;

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Name of the volume
    pub name: String,
}

pub fn execute(args: PathArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    let mountpoint = driver.path(&args.name)?;
    println!("{}", driver.root().join(mountpoint).display());
    Ok(())
}
