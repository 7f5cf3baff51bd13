use clap::Args;
use netvol::{VolumeDriver, VolumeMetadata};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Name of the volume(s) to inspect
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

#[derive(Serialize)]
struct Inspected<'a> {
    name: &'a str,
    #[serde(flatten)]
    metadata: VolumeMetadata,
}

pub fn execute(args: InspectArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    let mut records = Vec::with_capacity(args.names.len());
    for name in &args.names {
        let metadata = driver.get(name)?;
        records.push(Inspected { name, metadata });
    }

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
