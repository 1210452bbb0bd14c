//! Reads an order-history page from a file or stdin and prints the parse
//! result as JSON. Log output goes to stderr and follows `RUST_LOG`.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rs_order_history::{parse_bytes, Command, Options, Target};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "parse-order-page")]
#[command(about = "Extract order records from a saved order-history page")]
struct Cli {
    /// Page to parse: year_list, order_count, list or detail.
    #[arg(short, long, default_value = "detail")]
    target: Target,

    /// Address the page was saved from; used to resolve relative links.
    #[arg(long)]
    page_url: Option<String>,

    /// Use English storefront labels.
    #[arg(long)]
    english: bool,

    /// HTML file; stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let html = match read_input(cli.input.as_ref()) {
        Ok(html) => html,
        Err(err) => {
            eprintln!("Failed to read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut options = if cli.english { Options::english() } else { Options::default() };
    options.page_url = cli.page_url;

    let Some(response) = parse_bytes(&html, &options, &Command::parse(cli.target)) else {
        return ExitCode::FAILURE;
    };

    match response.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to serialize response: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut html = Vec::new();
            io::stdin().read_to_end(&mut html)?;
            Ok(html)
        }
    }
}
