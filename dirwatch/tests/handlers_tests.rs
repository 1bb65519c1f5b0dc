use dirwatch::commands::command_argument_builder;
use dirwatch::handlers::*;
use dirwatch_core::ReportFormat;
use dirwatch_core::crawl::DEFAULT_ROOTS;
use std::io::Write;
use tempfile::NamedTempFile;
use url::Url;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com/notes/");
    assert_eq!(result, Some("https://example.com/notes/".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com/notes/");
    assert_eq!(result, Some("http://example.com/notes/".to_string()));
}

#[test]
fn test_parse_url_line_host_with_port() {
    let result = parse_url_line("localhost:8080/files/");
    assert_eq!(result, Some("http://localhost:8080/files/".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "# course pages")?;
    writeln!(temp_file, "http://example.com/notes/")?;
    writeln!(temp_file, "example.com/Project/")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  https://example.com/Project/DB1/  ")?;

    let path = temp_file.path().to_str().unwrap();
    let urls = load_urls_from_file(path)?;

    assert_eq!(
        urls,
        vec![
            "http://example.com/notes/",
            "http://example.com/Project/",
            "https://example.com/Project/DB1/",
        ]
    );
    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();
    writeln!(temp_file, "# only a comment").unwrap();

    let result = load_urls_from_file(temp_file.path().to_str().unwrap());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No valid URLs"));
}

#[test]
fn test_load_urls_from_missing_file() {
    let result = load_urls_from_file("/definitely/not/here/roots.txt");
    assert!(result.unwrap_err().contains("Failed to read roots file"));
}

#[test]
fn test_load_urls_from_source_explicit_urls() {
    let urls = vec![
        Url::parse("https://example.com/a/").unwrap(),
        Url::parse("https://example.com/b/").unwrap(),
    ];
    let result = load_urls_from_source(&urls, None).unwrap();
    assert_eq!(result, vec!["https://example.com/a/", "https://example.com/b/"]);
}

#[test]
fn test_load_urls_from_source_defaults() {
    let result = load_urls_from_source(&[], None).unwrap();
    assert_eq!(result.len(), DEFAULT_ROOTS.len());
    assert_eq!(result[0], DEFAULT_ROOTS[0]);
}

#[test]
fn test_load_urls_from_source_prefers_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "http://from-file.example/")?;

    let urls = vec![Url::parse("https://example.com/a/").unwrap()];
    let result = load_urls_from_source(&urls, temp_file.path().to_str())?;
    assert_eq!(result, vec!["http://from-file.example/"]);
    Ok(())
}

#[test]
fn test_select_format_flags() {
    let cmd = command_argument_builder();

    let matches = cmd.clone().try_get_matches_from(["dirwatch"]).unwrap();
    assert_eq!(select_format(&matches), ReportFormat::Text);

    let matches = cmd.clone().try_get_matches_from(["dirwatch", "--html"]).unwrap();
    assert_eq!(select_format(&matches), ReportFormat::Html);

    let matches = cmd.try_get_matches_from(["dirwatch", "--json"]).unwrap();
    assert_eq!(select_format(&matches), ReportFormat::Json);
}

#[test]
fn test_html_and_json_conflict() {
    let result = command_argument_builder().try_get_matches_from(["dirwatch", "--html", "--json"]);
    assert!(result.is_err());
}

#[test]
fn test_url_and_roots_file_conflict() {
    let result = command_argument_builder().try_get_matches_from([
        "dirwatch",
        "-u",
        "http://example.com/",
        "-H",
        "roots.txt",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_repeated_url_flags_and_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "dirwatch",
            "-u",
            "http://example.com/a/",
            "--url",
            "http://example.com/b/",
        ])
        .unwrap();

    let urls: Vec<&Url> = matches.get_many::<Url>("url").unwrap().collect();
    assert_eq!(urls.len(), 2);
    assert_eq!(matches.get_one::<usize>("workers"), Some(&4));
    assert_eq!(matches.get_one::<usize>("max-depth"), Some(&16));
    assert_eq!(matches.get_one::<u64>("timeout"), Some(&10));
    assert!(!matches.get_flag("quiet"));
}

#[test]
fn test_log_level() {
    assert_eq!(log_level(true), tracing::Level::DEBUG);
    assert_eq!(log_level(false), tracing::Level::WARN);
}

#[test]
fn test_zero_timeout_rejected() {
    let result = command_argument_builder().try_get_matches_from(["dirwatch", "--timeout", "0"]);
    assert!(result.is_err());

    let matches = command_argument_builder()
        .try_get_matches_from(["dirwatch", "--timeout", "1"])
        .unwrap();
    assert_eq!(matches.get_one::<u64>("timeout"), Some(&1));
}

#[test]
fn test_zero_workers_rejected() {
    let result = command_argument_builder().try_get_matches_from(["dirwatch", "-t", "0"]);
    assert!(result.is_err());

    let matches = command_argument_builder()
        .try_get_matches_from(["dirwatch", "-t", "1"])
        .unwrap();
    assert_eq!(matches.get_one::<usize>("workers"), Some(&1));
}
