use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::ArgMatches;
use colored::Colorize;
use dirwatch_core::crawl::{CrawlOptions, DEFAULT_ROOTS, execute_crawl};
use dirwatch_core::report::{ReportFormat, render, save_report};
use dirwatch_core::{CrawlRow, summarize};
use std::fs;
use std::path::PathBuf;
use tracing::Level;
use url::Url;

/// Pick the root URLs: a roots file wins, then `--url` values, then the
/// built-in list.
pub fn load_urls_from_source(
    urls: &[Url],
    roots_file: Option<&str>,
) -> Result<Vec<String>, String> {
    if let Some(roots_file_path) = roots_file {
        load_urls_from_file(roots_file_path)
    } else if !urls.is_empty() {
        Ok(urls.iter().map(|u| u.as_str().to_string()).collect())
    } else {
        Ok(DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect())
    }
}

/// Load and parse URLs from a file. `~` is expanded; blank lines and `#`
/// comments are skipped.
pub fn load_urls_from_file(path: &str) -> Result<Vec<String>, String> {
    let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
    let content = fs::read_to_string(&expanded)
        .map_err(|e| format!("Failed to read roots file {}: {}", expanded.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", expanded.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("{} Skipping invalid URL '{}'", "⚠".yellow(), line);
    None
}

pub fn select_format(matches: &ArgMatches) -> ReportFormat {
    if matches.get_flag("html") {
        ReportFormat::Html
    } else if matches.get_flag("json") {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    }
}

pub fn log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

pub fn print_banner() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!(
        "{} {}",
        "  DIRWATCH".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_summary(rows: &[CrawlRow]) {
    let summary = summarize(rows);
    eprintln!(
        "{} {} files, {} directories",
        "✓".green().bold(),
        summary.files.to_string().cyan(),
        summary.directories.to_string().cyan()
    );
    if summary.untimed_files > 0 {
        eprintln!(
            "{} {} files without a usable Last-Modified header",
            "ℹ".blue(),
            summary.untimed_files
        );
    }
    if let Some(newest) = summary.newest {
        eprintln!(
            "{} Newest: {} ({})",
            "→".blue(),
            newest.name.bright_white(),
            newest.modified_display()
        );
    }
}

/// Crawl, render and print. Returns the process exit code.
pub async fn handle_crawl(matches: &ArgMatches) -> i32 {
    match run_crawl(matches).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            1
        }
    }
}

async fn run_crawl(matches: &ArgMatches) -> anyhow::Result<()> {
    let quiet = matches.get_flag("quiet");
    let urls: Vec<Url> = matches
        .get_many::<Url>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let roots_file = matches.get_one::<String>("roots-file");

    let urls = load_urls_from_source(&urls, roots_file.map(String::as_str)).map_err(|e| anyhow!(e))?;

    let options = CrawlOptions {
        urls,
        workers: *matches.get_one::<usize>("workers").unwrap_or(&4),
        max_depth: *matches.get_one::<usize>("max-depth").unwrap_or(&16),
        timeout_secs: *matches.get_one::<u64>("timeout").unwrap_or(&10),
        show_progress: !quiet,
    };

    if !quiet {
        eprintln!(
            "{} Crawling {} listing(s) with {} workers",
            "→".blue(),
            options.urls.len(),
            options.workers
        );
    }

    let rows = execute_crawl(options).await.context("Crawl failed")?;

    if !quiet {
        print_summary(&rows);
    }

    let report = render(select_format(matches), &rows, Utc::now().naive_utc())
        .context("Failed to render report")?;

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}
