use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use billwatch::export;
use billwatch::scraper::{CongressScraper, ScraperConfig};
use billwatch::search::build_search_url;
use billwatch::types::{Congress, SourceType};
use billwatch::utils::{BillFilter, ScrapeStats};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "billwatch")]
#[command(about = "A congress.gov bill scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape bill listings and detail pages across a range of congresses
    Scrape {
        #[arg(
            long,
            default_value_t = 119,
            help = "Most recent congress session to start from"
        )]
        start_congress: u16,

        #[arg(
            long,
            default_value_t = 115,
            help = "Oldest congress session to include"
        )]
        end_congress: u16,

        #[arg(
            long = "source",
            value_parser = parse_source,
            default_value = "legislation",
            help = "Source type to scrape (repeatable)"
        )]
        sources: Vec<SourceType>,

        #[arg(
            long,
            default_value_t = 5,
            value_parser = clap::value_parser!(u16).range(1..),
            help = "Upper bound on concurrent detail-page fetches"
        )]
        max_workers: u16,

        #[arg(
            long,
            value_parser = clap::value_parser!(u16).range(1..),
            help = "Maximum number of results to return"
        )]
        limit: Option<u16>,

        #[arg(
            long,
            value_parser = clap::value_parser!(u16).range(1..),
            help = "Number of results to skip from the beginning"
        )]
        offset: Option<u16>,

        #[arg(long, help = "Keep only bills whose status contains this text")]
        status_contains: Option<String>,

        #[arg(long, help = "Keep only bills whose sponsor contains this text")]
        sponsor_contains: Option<String>,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[arg(long, value_name = "PATH", help = "Also write the results to a CSV file")]
        csv: Option<PathBuf>,
    },
    /// Fetch committees, actions and cosponsors for a single bill detail page
    Detail {
        #[arg(help = "URL of the bill detail page to fetch")]
        url: String,

        #[arg(
            long,
            value_parser = parse_source,
            default_value = "legislation",
            help = "Source type the page belongs to"
        )]
        source: SourceType,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Print the search URL built for a congress, source and page
    Url {
        #[arg(
            long,
            value_parser = parse_congress,
            default_value = "all",
            help = "Congress session number, or 'all'"
        )]
        congress: Congress,

        #[arg(
            long,
            value_parser = parse_source,
            default_value = "legislation",
            help = "Source type"
        )]
        source: SourceType,

        #[arg(
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Results page number"
        )]
        page: u32,
    },
}

fn parse_source(s: &str) -> Result<SourceType, String> {
    SourceType::from_str(s).map_err(|e| e.to_string())
}

fn parse_congress(s: &str) -> Result<Congress, String> {
    Congress::from_str(s).map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Scrape {
            start_congress,
            end_congress,
            sources,
            max_workers,
            limit,
            offset,
            status_contains,
            sponsor_contains,
            format,
            csv,
        } => {
            let filter = BillFilter {
                status_contains,
                sponsor_contains,
                limit: limit.map(usize::from),
                offset: offset.map(usize::from),
            }
            .validate()
            .unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let mut unique_sources: Vec<SourceType> = Vec::new();
            for source in sources {
                if !unique_sources.contains(&source) {
                    unique_sources.push(source);
                }
            }

            let config = ScraperConfig {
                start_congress,
                end_congress,
                sources: unique_sources,
                max_workers: usize::from(max_workers),
            }
            .validate()
            .unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let scraper = CongressScraper::new(config).unwrap_or_else(|e| {
                log::error!("Error creating scraper: {}", e);
                process::exit(1);
            });

            log::info!(
                "Scraping congresses {} down to {}...",
                start_congress,
                end_congress
            );

            let bills = filter.apply(scraper.scrape().await);

            if let Some(path) = csv {
                export::save_to_csv(&bills, &path).unwrap_or_else(|e| {
                    log::error!("Error saving CSV: {}", e);
                    process::exit(1);
                });
            }

            match format {
                OutputFormat::Json => serialize_json(&bills),
                OutputFormat::Text => {
                    if bills.is_empty() {
                        println!("No bills to display.");
                    } else {
                        for (i, bill) in bills.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, bill);
                        }
                        print!("{}", ScrapeStats::from_bills(&bills));
                    }
                }
            }
        }

        Commands::Detail {
            url,
            source,
            format,
        } => {
            let scraper = CongressScraper::new(ScraperConfig::default()).unwrap_or_else(|e| {
                log::error!("Error creating scraper: {}", e);
                process::exit(1);
            });

            log::info!("Fetching bill detail from {}...", url);

            let details = scraper
                .fetch_bill_details(source, &url)
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error fetching bill detail: {}", e);
                    process::exit(1);
                });

            match format {
                OutputFormat::Json => serialize_json(&details),
                OutputFormat::Text => print!("{}", details),
            }
        }

        Commands::Url {
            congress,
            source,
            page,
        } => {
            println!("{}", build_search_url(congress, source, page));
        }
    }
}
