mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use codesim::{CompareError, DumpError, LoadError, PycError};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "codesim")]
#[command(about = "Compare compiled program units by their instruction streams")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare two code units and report their similarity")]
    Compare {
        #[arg(help = "First unit (.json disassembly dump or .pyc)")]
        a: String,
        #[arg(help = "Second unit (.json disassembly dump or .pyc)")]
        b: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(
            long,
            value_name = "RATIO",
            help = "Exit with status 1 if similarity falls below this value"
        )]
        fail_under: Option<f64>,
        #[arg(long, short, help = "Quiet mode: print only the similarity value")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: include per-unit shape details")]
        verbose: bool,
    },
    #[command(about = "Show information about one code unit")]
    Info {
        #[arg(help = "Path to the unit")]
        path: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            a,
            b,
            format,
            fail_under,
            quiet,
            verbose,
        } => commands::compare::run(&a, &b, format, fail_under, quiet, verbose),
        Commands::Info { path, format } => commands::info::run(&path, format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_input_error(err) {
        ExitCode::from(2)
    } else {
        ExitCode::from(3)
    }
}

fn is_input_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<LoadError>()
            || cause.is::<DumpError>()
            || cause.is::<PycError>()
            || cause.is::<CompareError>()
    })
}
