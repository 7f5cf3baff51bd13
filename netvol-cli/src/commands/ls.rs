use chrono::Local;
use clap::Args;
use comfy_table::{Cell, Table, presets};
use netvol::VolumeDriver;

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Only print volume names
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn execute(args: LsArgs, driver: &dyn VolumeDriver) -> anyhow::Result<()> {
    let volumes = driver.list()?;

    if args.quiet {
        for name in volumes.keys() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(vec!["NAME", "MOUNTPOINT", "CREATED", "MOUNTED BY"]);

    for (name, metadata) in &volumes {
        let mounters = metadata.status.mounters();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(driver.root().join(&metadata.mountpoint).display()),
            Cell::new(
                metadata
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S"),
            ),
            Cell::new(if mounters.is_empty() {
                "-".to_string()
            } else {
                mounters.join(",")
            }),
        ]);
    }

    println!("{}", table);
    Ok(())
}
