use miette::Result;
use murmur_core::Persona;
use murmur_core::persona::thread_digest;
use owo_colors::OwoColorize;

use crate::output::Output;

pub fn list() {
    let output = Output::new();
    output.section("Personas");

    for persona in Persona::ALL {
        println!();
        println!("  {} {}", persona.name().bright_cyan().bold(), persona.description().dimmed());
        for tool in persona.tools() {
            output.list_item(tool);
        }
        if !persona.delegates().is_empty() {
            let delegates: Vec<_> = persona.delegates().iter().map(|p| p.name()).collect();
            output.info("delegates to", &delegates.join(", "));
        }
    }
}

pub fn show(name: &str) -> Result<()> {
    let persona: Persona = name.parse().map_err(|e: String| miette::miette!(e))?;
    println!("{}", persona.instructions());
    Ok(())
}

pub fn digest(thread_link: &str) -> Result<()> {
    println!("{}", thread_digest(thread_link)?);
    Ok(())
}
