use anyhow::Result;
use parley_config::Config;

pub fn execute(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
