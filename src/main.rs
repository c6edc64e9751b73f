//! Command-line interface for ews-bridge
//!
//! Runs one translation over a file, the same workflow used when
//! inspecting captured traffic: `soap2json` for request captures,
//! `json2soap` for response captures.

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a SOAP request capture into OWA JSON
    Soap2json {
        /// Path to the SOAP XML file
        file: std::path::PathBuf,
    },
    /// Translate an OWA JSON response capture into SOAP
    Json2soap {
        /// EWS action the response belongs to, e.g. GetFolder
        #[arg(short, long)]
        operation: String,

        /// Indent the emitted XML
        #[arg(long)]
        indent: bool,

        /// Path to the JSON file
        file: std::path::PathBuf,
    },
}

#[cfg(feature = "cli")]
fn run() -> ews_bridge::Result<()> {
    use std::io::Write;

    let cli = Cli::parse();
    match cli.command {
        Command::Soap2json { file } => {
            let data = std::fs::read(&file)?;
            let (json, op) = ews_bridge::soap_to_json(&data[..])?;
            eprintln!("resolved operation: {}", op.action);
            std::io::stdout().write_all(&json)?;
            println!();
        }
        Command::Json2soap {
            operation,
            indent,
            file,
        } => {
            let op = ews_bridge::lookup_operation(&operation).ok_or_else(|| {
                ews_bridge::Error::Schema(format!("unknown EWS operation {}", operation))
            })?;
            let data = std::fs::read(&file)?;
            let stdout = std::io::stdout();
            ews_bridge::json_to_soap(&data[..], op, stdout.lock(), indent)?;
            println!();
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
