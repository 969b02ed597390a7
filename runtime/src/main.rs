use clap::Parser;
use sitetext::acquisition::fetcher::{DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use sitetext::cli::extract_cmd;
use sitetext::cli::output::{Mode, Reporter};
use sitetext::config::{Config, DEFAULT_OUTPUT_PATH};
use sitetext::extraction::extractor::{DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};
use std::path::PathBuf;
use tracing::debug;

/// Save the human-visible text of a web page, frames included.
#[derive(Parser, Debug)]
#[command(name = "sitetext", version, about)]
struct Cli {
    /// Page to read; https:// is assumed when no scheme is given
    #[arg(short, long)]
    url: String,

    /// File to write the text to ("-" for stdout)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// String placed between text fragments
    #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
    separator: String,

    /// Maximum iframe nesting below the page
    #[arg(long, env = "SITETEXT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "SITETEXT_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "SITETEXT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Print results as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Suppress status output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log each fetch and frame
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = if cli.json {
        Mode::Json
    } else if cli.quiet {
        Mode::Quiet
    } else {
        Mode::Human
    };
    let reporter = Reporter::new(mode, cli.no_color);

    let config = Config::new(&cli.url)
        .with_output_path(&cli.output)
        .with_separator(&cli.separator)
        .with_max_depth(cli.max_depth)
        .with_timeout_ms(cli.timeout)
        .with_user_agent(&cli.user_agent);
    debug!("{config:?}");

    if let Err(e) = extract_cmd::run(&config, &reporter) {
        extract_cmd::report_error(&e, &reporter);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "sitetext=debug"
    } else {
        "sitetext=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
