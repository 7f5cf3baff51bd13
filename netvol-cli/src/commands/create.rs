use std::collections::HashMap;

use clap::Args;
use netvol::VolumeDriver;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Volume option as key=value (purgeAfterDelete, allowMultipleMount)
    #[arg(short = 'o', long = "opt", value_parser = parse_opt)]
    pub opts: Vec<(String, String)>,

    /// Name of the volume
    pub name: String,
}

fn parse_opt(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

pub fn execute(args: CreateArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    let opts: HashMap<String, String> = args.opts.into_iter().collect();
    driver.create(&args.name, &opts)?;
    println!("{}", args.name);
    Ok(())
}
