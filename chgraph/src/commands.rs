use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("chgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("chgraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress non-essential output").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("serve")
                .about("Serve the interactive graph explorer in the browser")
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Path to the TOML configuration file")
                        .default_value(chgraph_web::DEFAULT_CONFIG_PATH),
                )
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Address to listen on (overrides the config file)"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("Port to listen on (overrides the config file)")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    arg!(--"upstream" <URL>)
                        .required(false)
                        .help("Origin to fetch pages from in place of Companies House")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            command!("fetch")
                .about(
                    "Fetch a single company or officer page and report the graph it \
                produces.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("A Companies House company or officer appointments URL"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, dot")
                        .value_parser(["text", "json", "dot"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"upstream" <URL>)
                        .required(false)
                        .help("Origin to fetch pages from in place of Companies House")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("classify")
                .about("Report whether a URL is a company or officer page")
                .arg(arg!(<URL>).required(true).help("The URL to classify")),
        )
}
