use miette::{IntoDiagnostic, Result};
use murmur_core::MurmurConfig;
use murmur_core::config::config_paths;

use crate::output::Output;

const REDACTED: &str = "<redacted>";

/// Show current configuration with the token hidden
pub fn show(config: &MurmurConfig) -> Result<()> {
    let output = Output::new();

    output.section("Current Configuration");
    println!();

    let toml_str = toml::to_string_pretty(&redacted(config)).into_diagnostic()?;
    println!("{}", toml_str);

    output.section("Searched Locations");
    for path in config_paths() {
        let marker = if path.exists() { "found" } else { "missing" };
        output.list_item(&format!("{} ({marker})", path.display()));
    }
    Ok(())
}

fn redacted(config: &MurmurConfig) -> MurmurConfig {
    let mut shown = config.clone();
    if shown.discord.token.is_some() {
        shown.discord.token = Some(REDACTED.to_string());
    }
    shown
}
