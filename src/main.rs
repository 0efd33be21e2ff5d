// src/main.rs
mod app;
mod config;
mod error;
mod fetch;
mod formatter;
mod input;
mod logging;
mod models;
mod network;
mod state;
mod theme;
mod ui;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::app::App;
use crate::config::{Settings, get_user_config_path};
use crate::fetch::{FetchUpdate, Fetcher};
use crate::formatter::{fragments_of, render_html};
use crate::models::{Headline, Mode, QueryDescriptor, Summary};
use crate::network::HttpNewsApi;
use crate::state::ViewState;
use crate::utils::expand_path;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "newsdigest", version, about = "Headlines and an AI briefing in your terminal")]
struct Cli {
    /// Search to run on startup
    query: Option<String>,

    /// Start with today's digest instead of a search
    #[arg(long, conflicts_with = "query")]
    digest: bool,

    /// Phrase summary points as "why it matters"
    #[arg(long)]
    why: bool,

    /// Fetch once and print instead of opening the UI
    #[arg(long)]
    print: bool,

    /// Output format for --print
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Backend base URL (overrides api_base_url)
    #[arg(long)]
    api: Option<String>,

    /// Config file to use instead of ~/.config/newsdigest/newsdigest.toml
    #[arg(long)]
    config: Option<String>,

    /// Log file location
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(expand_path).unwrap_or_else(get_user_config_path);
    let mut settings = Settings::load(&config_path)
        .with_context(|| format!("could not load config from {}", config_path.display()))?;
    if let Some(api) = &cli.api {
        settings.api_base_url = api.clone();
    }

    let log_path = cli
        .log_file
        .as_deref()
        .or(settings.log_file.as_deref())
        .map(expand_path)
        .unwrap_or_else(logging::default_log_path);
    logging::init_logging(&log_path)?;
    info!(api = %settings.api_base_url, config = %config_path.display(), "starting newsdigest");

    let api = HttpNewsApi::new(&settings.api_base_url, settings.request_timeout())?;
    let fetcher = Fetcher::new(Arc::new(api), settings.digest_topics.clone(), settings.why_prefix.clone());

    let mode = if cli.why { Mode::Why } else { Mode::Brief };
    let initial = if cli.digest {
        Some(QueryDescriptor::digest(mode))
    } else {
        cli.query.as_deref().map(|q| QueryDescriptor::search(q, mode)).transpose()?
    };

    let rt = tokio::runtime::Runtime::new()?;

    if cli.print {
        let Some(descriptor) = initial else {
            bail!("--print needs a QUERY or --digest");
        };
        let updates = rt.block_on(fetcher.collect(descriptor));
        return print_updates(updates, cli.format);
    }

    let mut state = ViewState::new(settings.initial_dark_mode(), mode);
    if cli.digest {
        state.active_category = Some(models::DIGEST_LABEL.to_string());
    }
    let mut app = App::new(&settings, config_path, fetcher, state, rt);
    if let Some(descriptor) = initial {
        app.start_fetch(descriptor);
    }
    app.run()
}

fn print_updates(updates: Vec<FetchUpdate>, format: OutputFormat) -> Result<()> {
    let mut headlines: Vec<Headline> = Vec::new();
    let mut summary: Option<Summary> = None;
    let mut failure = None;
    for update in updates {
        match update {
            FetchUpdate::Headlines(h) => headlines = h,
            FetchUpdate::Summary(s) => summary = Some(s),
            FetchUpdate::Failed(e) => failure = Some(e),
            FetchUpdate::Finished => {}
        }
    }
    // Without headlines there is nothing to fall back on
    if let Some(e) = &failure {
        if headlines.is_empty() {
            bail!("{e}");
        }
        eprintln!("warning: {e}");
    }

    let out = match format {
        OutputFormat::Text => render_text(&headlines, summary.as_ref()),
        OutputFormat::Html => render_html_page(&headlines, summary.as_ref()),
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "summary": summary,
            "headlines": headlines,
        }))?,
    };
    println!("{out}");
    Ok(())
}

fn render_text(headlines: &[Headline], summary: Option<&Summary>) -> String {
    let mut out = String::new();
    if let Some(summary) = summary {
        out.push_str(&format!("Today's Briefing (based on {} headlines)\n", summary.meta.sources));
        out.push_str(&summary.to_plain_text());
        out.push_str("\n\n");
    }
    out.push_str("Top Headlines\n");
    for h in headlines {
        out.push_str(&format!("- {}\n  {}\n", h.title, h.link));
    }
    out
}

fn render_html_page(headlines: &[Headline], summary: Option<&Summary>) -> String {
    let items: String = headlines
        .iter()
        .map(|h| {
            format!(
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
                formatter::escape_html(&h.link),
                formatter::escape_html(&h.title)
            )
        })
        .collect();
    let summary_html = summary.map(|s| render_html(&fragments_of(s))).unwrap_or_default();
    format!(
        "<h2>AI Summary</h2>\n<div class=\"summary\">{summary_html}</div>\n<h2>Top Headlines</h2>\n<ul>{items}</ul>"
    )
}
