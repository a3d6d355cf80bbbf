use crate::output::{json, text};
use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use codesim::{CodeUnit, CompareConfig};
use log::debug;
use std::io;
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

pub fn run(
    path_a: &str,
    path_b: &str,
    format: OutputFormat,
    fail_under: Option<f64>,
    quiet: bool,
    verbose: bool,
) -> Result<ExitCode> {
    if quiet && verbose {
        bail!("Cannot use both --quiet and --verbose flags together");
    }
    if let Some(threshold) = fail_under {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("--fail-under must be in [0.0, 1.0] (got {threshold})");
        }
    }

    let verbosity = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let config = CompareConfig::default();

    let unit_a = CodeUnit::load(path_a, &config)
        .with_context(|| format!("Failed to load first unit: {}", path_a))?;
    let unit_b = CodeUnit::load(path_b, &config)
        .with_context(|| format!("Failed to load second unit: {}", path_b))?;

    debug!(
        "loaded units: a={} instrs, b={} instrs",
        unit_a.root.instruction_count(),
        unit_b.root.instruction_count()
    );

    let report = unit_a
        .compare(&unit_b, &config)
        .context("Comparison failed")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => {
            let profiles = if verbosity == Verbosity::Verbose {
                Some((unit_a.profile(), unit_b.profile()))
            } else {
                None
            };
            text::write_compare_report(&mut handle, &report, path_a, path_b, verbosity, profiles)?;
        }
        OutputFormat::Json => {
            json::write_compare_report(&mut handle, &report, path_a, path_b)?;
        }
    }

    Ok(exit_code_from_report(report.similarity, fail_under))
}

fn exit_code_from_report(similarity: f64, fail_under: Option<f64>) -> ExitCode {
    match fail_under {
        Some(threshold) if similarity < threshold => ExitCode::from(1),
        _ => ExitCode::from(0),
    }
}
