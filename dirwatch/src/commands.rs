use clap::{ArgAction, arg};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("dirwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("dirwatch")
        .about(
            "Crawl Apache directory listings and list their files, most recently \
            modified first.",
        )
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(arg!(-v --"verbose" "Log every request to stderr").required(false))
        .arg(
            arg!(--"html")
                .required(false)
                .help("Print the table as HTML instead of plain text")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
        .arg(
            arg!(--"json")
                .required(false)
                .help("Print the rows as JSON instead of plain text")
                .action(ArgAction::SetTrue)
                .conflicts_with("html"),
        )
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("A listing page to crawl; repeat for several (default: built-in list)")
                .value_parser(clap::value_parser!(Url))
                .action(ArgAction::Append)
                .conflicts_with("roots-file"),
        )
        .arg(
            arg!(-H --"roots-file" <PATH>)
                .required(false)
                .help("Path to a newline-delimited file of listing URLs to crawl")
                .value_parser(clap::value_parser!(String))
                .conflicts_with("url"),
        )
        .arg(
            arg!(-t --"workers" <NUM_WORKERS>)
                .required(false)
                .help("Maximum number of requests in flight at once")
                .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..))
                .default_value("4"),
        )
        .arg(
            arg!(--"max-depth" <DEPTH>)
                .required(false)
                .help("Stop descending below this many directory levels")
                .value_parser(clap::value_parser!(usize))
                .default_value("16"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: print to stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
