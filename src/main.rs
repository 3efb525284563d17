//! jsonkit CLI.
//!
//! Validates, pretty-prints and minifies JSON files from the command
//! line. Parse failures print their positioned diagnostic to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use jsonkit::{parse_file, serialize, write_file, Format};

#[derive(Parser)]
#[command(name = "jsonkit")]
#[command(about = "JSON validator and formatter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report whether it is valid JSON
    Check {
        /// Path to the JSON file
        input: PathBuf,
    },

    /// Pretty-print a file with 4-space indentation
    Fmt {
        /// Path to the JSON file
        input: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Strip all insignificant whitespace
    Minify {
        /// Path to the JSON file
        input: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Check { input } => parse_file(&input).map(|_| {
            println!("{}: ok", input.display());
        }),
        Commands::Fmt { input, output } => reformat(&input, output.as_deref(), Format::Pretty),
        Commands::Minify { input, output } => {
            reformat(&input, output.as_deref(), Format::Minimized)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn reformat(input: &Path, output: Option<&Path>, format: Format) -> jsonkit::Result<()> {
    let value = parse_file(input)?;
    match output {
        Some(path) => write_file(&value, path, format),
        None => {
            println!("{}", serialize(&value, format));
            Ok(())
        }
    }
}
