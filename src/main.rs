use std::{
    fs,
    io::{self, BufWriter},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uit::Error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// run a file
    Run {
        #[arg(name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file } => match run_file(&file) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{:#}", err);
                exit_code(&err)
            }
        },
    }
}

fn run_file(file: &Path) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    uit::run(&source, stdin.lock(), BufWriter::new(stdout.lock()))?;
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        Some(Error::Lex(_) | Error::Parse(_)) => ExitCode::from(65),
        Some(Error::Runtime(_)) => ExitCode::from(70),
        None => ExitCode::from(74),
    }
}
