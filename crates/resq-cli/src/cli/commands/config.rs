//! `resq config` – show where the config lives and what it says.

use anyhow::Result;
use resq_core::config::{self, ResqConfig};

pub fn run_config(cfg: &ResqConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", cfg.to_toml()?);
    Ok(())
}
