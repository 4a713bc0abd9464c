use chgraph::handlers::{handle_classify, handle_fetch, handle_serve};
use colored::Colorize;
use commands::command_argument_builder;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    let result = match chosen_command.subcommand() {
        Some(("serve", sub_matches)) => handle_serve(sub_matches).await,
        Some(("fetch", sub_matches)) => handle_fetch(sub_matches, quiet).await,
        Some(("classify", sub_matches)) => handle_classify(sub_matches),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
