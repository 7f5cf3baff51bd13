use clap::Args;
use netvol::VolumeDriver;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Name of the volume(s) to remove
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

pub fn execute(args: RmArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    let mut failed = false;
    for name in args.names {
        if let Err(e) = driver.remove(&name) {
            eprintln!("Error removing volume '{}': {}", name, e);
            failed = true;
        } else {
            println!("{}", name);
        }
    }

    if failed {
        anyhow::bail!("Some volumes could not be removed");
    }
    Ok(())
}
