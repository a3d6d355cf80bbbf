use crate::output::text;
use crate::OutputFormat;
use anyhow::{Context, Result};
use codesim::{CodeUnit, CompareConfig};
use std::io::{self, Write};
use std::process::ExitCode;

pub fn run(path: &str, format: OutputFormat) -> Result<ExitCode> {
    let config = CompareConfig::default();
    let unit =
        CodeUnit::load(path, &config).with_context(|| format!("Failed to load unit: {}", path))?;
    let profile = unit.profile();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => text::write_profile(&mut handle, path, &profile)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut handle, &profile)?;
            writeln!(handle)?;
        }
    }

    Ok(ExitCode::from(0))
}
