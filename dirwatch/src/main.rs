use dirwatch::commands::command_argument_builder;
use dirwatch::handlers::{handle_crawl, log_level, print_banner};

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    tracing_subscriber::fmt()
        .with_max_level(log_level(matches.get_flag("verbose")))
        .with_writer(std::io::stderr)
        .init();

    if !quiet {
        print_banner();
    }

    let exit_code = handle_crawl(&matches).await;
    std::process::exit(exit_code);
}
