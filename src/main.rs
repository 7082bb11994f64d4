use anyhow::{Context, Result};
use clap::Parser;
use feedreader::app::{App, AppEvent};
use feedreader::config::Config;
use feedreader::feed::HttpFeedSource;
use feedreader::loader::FeedLoader;
use feedreader::ui;
use feedreader::util::strip_control_chars;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Get the config directory path (~/.config/feedreader/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("feedreader"))
}

#[derive(Parser, Debug)]
#[command(name = "feedreader", about = "Minimal terminal feed reader")]
struct Args {
    /// Config file (defaults to ~/.config/feedreader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List configured feeds and exit
    #[arg(long)]
    list: bool,

    /// Load the feed at INDEX, print its entries and exit
    #[arg(long, value_name = "INDEX")]
    print: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the TUI or --print output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let registry = Arc::new(config.registry().context("Invalid feed list")?);

    if args.list {
        for (i, feed) in registry.list().iter().enumerate() {
            println!("{:>3}  {}  {}", i, strip_control_chars(&feed.name), feed.url);
        }
        return Ok(());
    }

    let source = HttpFeedSource::new(config.fetch_policy()).context("Failed to build HTTP client")?;
    let loader = FeedLoader::new(Arc::clone(&registry), Arc::new(source));

    if let Some(index) = args.print {
        return print_feed(&loader, index).await;
    }

    let mut app = App::new(loader);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    if let Err(e) = app.start_load(config.initial_feed, &event_tx) {
        tracing::warn!(error = %e, "Initial feed out of range, falling back to the first feed");
        app.start_load(0, &event_tx)?;
    }

    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}

/// Non-interactive mode: load one feed through the callback API and dump it.
async fn print_feed(loader: &FeedLoader, index: usize) -> Result<()> {
    let (done_tx, done_rx) = oneshot::channel();
    loader.load_feed(index, move |report| {
        let _ = done_tx.send(report);
    })?;

    let report = done_rx
        .await
        .context("Feed load finished without reporting")?;

    if let Err(e) = &report.result {
        anyhow::bail!("Failed to load {}: {}", report.name, e);
    }

    let target = loader.target();
    let target = target.read();
    if let Some(title) = target.title() {
        println!("{}", strip_control_chars(title));
        println!();
    }
    for entry in target.current_entries() {
        let age = ui::format_relative_time(entry.published);
        println!("* {}  {}", strip_control_chars(&entry.title), age);
        if let Some(link) = &entry.link {
            println!("  {}", link);
        }
    }
    Ok(())
}
