//! a11y-lens CLI
//!
//! Usage:
//!   a11y-lens [OPTIONS] [SNAPSHOT]
//!
//! Options:
//!   -c, --categories <FILE>  Category settings (TOML format)
//!   --overlay <ID>           Element id of the inspector overlay to hide while measuring
//!   --embedded               The page is itself embedded in another document
//!   -f, --format <FORMAT>    Output format: text or toml
//!   --list-rules             List the rules in evaluation order
//!   --list-categories        List the scan categories and their selectors
//!   -v, --verbose            Log scan progress to stderr
//!   -h, --help               Print help

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use a11y_lens::report::{render_text, render_toml};
use a11y_lens::rules::RULES;
use a11y_lens::{inspect, Category, CategorySettings, InspectConfig, NoOverlay, PageSnapshot};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Toml,
}

#[derive(Parser)]
#[command(name = "a11y-lens")]
#[command(about = "Accessibility scan of a rendered page snapshot")]
struct Cli {
    /// Page snapshot (reads from stdin if not provided)
    snapshot: Option<PathBuf>,

    /// Category settings file (TOML format)
    #[arg(short, long)]
    categories: Option<PathBuf>,

    /// Element id of the inspector overlay to hide while measuring
    #[arg(long, value_name = "ID")]
    overlay: Option<String>,

    /// The page is itself embedded in another document
    #[arg(long)]
    embedded: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// List the rules in evaluation order
    #[arg(long)]
    list_rules: bool,

    /// List the scan categories and their selectors
    #[arg(long)]
    list_categories: bool,

    /// Log scan progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_rules {
        for rule in RULES {
            println!("{:<20} {}", rule.id(), rule.description());
        }
        return;
    }

    if cli.list_categories {
        for category in Category::ALL {
            let selectors = category.selector_source().unwrap_or("(the body of the scanned document)");
            println!("{:<14} {}", category.name(), selectors);
        }
        return;
    }

    let categories = match &cli.categories {
        Some(path) => match CategorySettings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading categories '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => CategorySettings::default(),
    };

    let page = match &cli.snapshot {
        Some(path) => match PageSnapshot::from_file(path) {
            Ok(page) => page,
            Err(e) => {
                eprintln!("Error loading snapshot '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            match PageSnapshot::from_toml(&buffer) {
                Ok(page) => page,
                Err(e) => {
                    eprintln!("Error loading snapshot: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = InspectConfig::new()
        .with_categories(categories)
        .with_embedded(cli.embedded);
    let body = page.body_element();
    let inspection = match &cli.overlay {
        Some(id) => match page.find_by_id(id) {
            Some(node) => inspect(&page, body, &page.overlay(node), &config),
            None => {
                eprintln!("Error: no element with id '{}'", id);
                std::process::exit(1);
            }
        },
        None => inspect(&page, body, &NoOverlay, &config),
    };

    match cli.format {
        Format::Text => print!("{}", render_text(&inspection)),
        Format::Toml => match render_toml(&inspection) {
            Ok(toml) => print!("{}", toml),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "a11y_lens=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}
