use anyhow::Context as _;
use chgraph_core::Explorer;
use chgraph_core::report::{ReportFormat, generate_graph_report, save_report};
use chgraph_scanner::{Fetcher, classify_url};
use chgraph_web::{AppState, ServerConfig, load_server_config};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upstream: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ServeOverrides {
    fn from_matches(args: &ArgMatches) -> Self {
        Self {
            host: args.get_one::<String>("host").cloned(),
            port: args.get_one::<u16>("port").copied(),
            upstream: args.get_one::<Url>("upstream").map(Url::to_string),
            timeout_secs: args.get_one::<u64>("timeout").copied(),
        }
    }
}

pub fn apply_overrides(mut config: ServerConfig, overrides: ServeOverrides) -> ServerConfig {
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(upstream) = overrides.upstream {
        config.upstream = upstream.trim_end_matches('/').to_string();
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config
}

/// Expand a leading `~` in the configured path.
pub fn resolve_config_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// One line describing what kind of page `url` is.
pub fn classify_line(url: &str) -> Result<String, chgraph_scanner::ScanError> {
    let page = classify_url(url)?;
    Ok(format!("{} {}", page.kind(), page.url()))
}

fn build_fetcher(config: &ServerConfig) -> anyhow::Result<Fetcher> {
    let fetcher = Fetcher::with_timeout(config.timeout_secs)
        .context("failed to build HTTP client")?
        .with_upstream(config.upstream.clone())
        .with_max_listed(config.max_listed);
    Ok(fetcher)
}

pub async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    let config_path = args
        .get_one::<String>("config")
        .map(|p| resolve_config_path(p))
        .context("missing --config")?;

    let config = load_server_config(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let config = apply_overrides(config, ServeOverrides::from_matches(args));

    let fetcher = build_fetcher(&config)?;
    let state = AppState::new(Explorer::new(fetcher));

    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    println!(
        "{} Graph explorer at {}",
        "✓".green().bold(),
        format!("http://{address}/").bright_white()
    );
    info!(
        "Upstream {} (timeout {}s, {} entries per page)",
        config.upstream, config.timeout_secs, config.max_listed
    );

    chgraph_web::serve(listener, state)
        .await
        .context("server error")?;

    println!("{} Server closed", "✓".green().bold());
    Ok(())
}

pub async fn handle_fetch(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let url = args.get_one::<String>("url").context("missing --url")?;
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<PathBuf>("output");

    let overrides = ServeOverrides {
        upstream: args.get_one::<Url>("upstream").map(Url::to_string),
        timeout_secs: args.get_one::<u64>("timeout").copied(),
        ..ServeOverrides::default()
    };
    let config = apply_overrides(ServerConfig::default(), overrides);
    let explorer = Explorer::new(build_fetcher(&config)?);

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("invalid spinner template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Fetching {}", url));

    let result = explorer.submit(url).await;
    spinner.finish_and_clear();
    let snapshot = result.with_context(|| format!("failed to fetch {url}"))?;

    if !quiet {
        println!(
            "{} {} entities, {} relationships",
            "✓".green().bold(),
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
    }

    let report =
        generate_graph_report(&snapshot, format).context("failed to render report")?;

    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}

pub fn handle_classify(args: &ArgMatches) -> anyhow::Result<()> {
    let url = args.get_one::<String>("URL").context("missing URL")?;
    let line = classify_line(url)?;
    println!("{} {}", "✓".green().bold(), line);
    Ok(())
}
