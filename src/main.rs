//! SnapGrid CLI
//!
//! Opens the photo-search window by default. The `search` and `config`
//! subcommands run headless.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar};
use snapgrid::{AppConfig, ConfigOverrides, PhotoSource, ResultList, UnsplashClient};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// SnapGrid - photo search with an infinite-scrolling grid
#[derive(Parser)]
#[command(name = "snapgrid")]
#[command(author = "SnapGrid Contributors")]
#[command(version)]
#[command(about = "Desktop photo search", long_about = None)]
struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search API base URL
    #[arg(long, global = true, env = "SNAPGRID_API_URL")]
    api_url: Option<String>,

    /// API access key
    #[arg(long, global = true, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// Quiet period before a search is sent, in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Results per page (1-30)
    #[arg(long, global = true)]
    per_page: Option<u32>,

    /// Log debug output to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the search window (default)
    Gui,

    /// Search once and print the results
    Search {
        /// Search text (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// First page to fetch
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Number of consecutive pages to fetch
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration
    Config,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            access_key: self.access_key.clone(),
            debounce_ms: self.debounce_ms,
            per_page: self.per_page,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    snapgrid::logging::init(cli.verbose);
    log::info!("SnapGrid {} starting up", snapgrid::VERSION);

    let result = AppConfig::load(cli.config.as_deref(), cli.overrides()).and_then(|config| {
        match cli.command.unwrap_or(Commands::Gui) {
            Commands::Gui => snapgrid::gui::run(config),
            Commands::Search {
                query,
                page,
                pages,
                json,
            } => cmd_search(&config, &query, page, pages, json),
            Commands::Config => cmd_config(&config, cli.config.as_deref()),
        }
    });

    if let Err(e) = result {
        log::debug!("exiting with error: {}", e);
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Fetch `pages` pages starting at `first`, merging them in order.
///
/// Stops early once the API reports no further pages.
fn fetch_pages(
    client: &UnsplashClient,
    query: &str,
    first: u32,
    pages: u32,
    spinner: &ProgressBar,
) -> snapgrid::Result<(ResultList, Option<u32>)> {
    let mut photos = ResultList::new();
    let mut total_pages = None;

    for page in first..first.saturating_add(pages) {
        spinner.set_message(format!("Fetching page {}...", page));
        let response = client.search(query, page)?;
        total_pages = Some(response.total_pages);
        if page > response.total_pages {
            break;
        }
        photos.merge(response.results);
        if page == response.total_pages {
            break;
        }
    }

    Ok((photos, total_pages))
}

/// Search command implementation
fn cmd_search(config: &AppConfig, query: &str, page: u32, pages: u32, json: bool) -> snapgrid::Result<()> {
    if query.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("{} Nothing to search for.", style("→").cyan().bold());
        }
        return Ok(());
    }

    let client = UnsplashClient::new(config)?;
    let start = Instant::now();

    let spinner = if json { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    spinner.enable_steady_tick(Duration::from_millis(100));
    let fetched = fetch_pages(&client, query, page.max(1), pages.max(1), &spinner);
    spinner.finish_and_clear();
    let (photos, total_pages) = fetched?;

    if json {
        println!("{}", serde_json::to_string_pretty(photos.as_slice())?);
        return Ok(());
    }

    println!(
        "{} {} photos for '{}' in {} ({} pages available)",
        style("✓").green().bold(),
        style(photos.len()).green(),
        style(query).yellow(),
        style(HumanDuration(start.elapsed())).cyan(),
        total_pages.map_or_else(|| "?".to_string(), |t| t.to_string())
    );
    println!();

    for (i, photo) in photos.iter().enumerate() {
        println!(
            "  {} {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            style(&photo.id).bold(),
            style(photo.author_name().unwrap_or("unknown")).dim()
        );
        println!("       {}", style(&photo.urls.raw).cyan());
    }

    Ok(())
}

/// Config command implementation
fn cmd_config(config: &AppConfig, explicit: Option<&std::path::Path>) -> snapgrid::Result<()> {
    let path = explicit.map(|p| p.to_path_buf()).or_else(AppConfig::default_path);
    let path_label = match &path {
        Some(p) if p.exists() => p.display().to_string(),
        Some(p) => format!("{} (not present)", p.display()),
        None => "(no config directory on this platform)".to_string(),
    };

    println!("{} {}", style("Config file:").bold(), path_label);
    println!("  {} {}", style("api_url:").bold(), config.api_url);
    println!("  {} {}", style("access_key:").bold(), config.masked_access_key());
    println!("  {} {}", style("debounce_ms:").bold(), config.debounce_ms);
    println!("  {} {}", style("per_page:").bold(), config.per_page);
    println!("  {} {}", style("scroll_top_threshold:").bold(), config.scroll_top_threshold);
    println!("  {} {}", style("bottom_slack:").bold(), config.bottom_slack);
    println!("  {} {}", style("request_timeout_secs:").bold(), config.request_timeout_secs);
    println!("  {} {}", style("tile_size:").bold(), config.tile_size);
    println!("  {} {}", style("log file:").bold(), snapgrid::logging::log_path().display());

    Ok(())
}
