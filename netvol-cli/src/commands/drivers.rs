use netvol::DriverRegistry;

pub fn execute() -> anyhow::Result<()> {
    for name in DriverRegistry::builtin().available() {
        println!("{}", name);
    }
    Ok(())
}
