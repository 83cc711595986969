use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert Shopify product exports to the Spree bulk-import schema",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a Shopify product-export CSV into a Spree-ready CSV
    Convert(ConvertArgs),
    /// Show how an export's headers map onto the Spree schema
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input Shopify export CSV ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Migration profile YAML overriding the built-in Shopify->Spree defaults
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Render the converted rows as an elastic table instead of CSV
    #[arg(long = "preview")]
    pub preview: bool,
    /// Limit number of converted rows emitted
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input Shopify export CSV ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Migration profile YAML overriding the built-in Shopify->Spree defaults
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii() => Ok(ch as u8),
                _ => Err(format!(
                    "Delimiter must be a single ASCII character or 'tab', got '{other}'"
                )),
            }
        }
    }
}
