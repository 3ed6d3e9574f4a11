// src/report/persist.rs
// =============================================================================
// Saves reports to disk as pretty-printed JSON.
//
// File names look like:
//   reports/example_com_blog-deep_crawl-2024-05-01-13-45-10.json
//   reports/example_com-deep_crawl-2024-05-01-13-45-10-interrupted.json
//
// The timestamp keeps repeated audits of the same site from overwriting each
// other; "-interrupted" marks crawls the user stopped with Ctrl+C.
// =============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{AuditReport, ScanType};

// Writes a report into `dir` (created if missing) and returns the file path
pub fn save_report(report: &AuditReport, dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
        tracing::info!("Created report directory {}", dir.display());
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
    let file_name = report_file_name(
        report.audited_url(),
        report.scan_type(),
        &timestamp,
        report.was_interrupted(),
    );
    let path = dir.join(file_name);

    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    Ok(path)
}

// Builds the report file name from its parts
fn report_file_name(url: &str, scan_type: ScanType, timestamp: &str, interrupted: bool) -> String {
    let suffix = if interrupted { "-interrupted" } else { "" };
    format!(
        "{}-{}-{}{}.json",
        sanitize_url(url),
        scan_type.as_str(),
        timestamp,
        suffix
    )
}

// Turns a URL into something safe to use in a file name
//
// "https://www.example.com/blog/" -> "www_example_com_blog"
fn sanitize_url(url: &str) -> String {
    let without_scheme = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");

    without_scheme
        .chars()
        .map(|c| match c {
            '/' | ':' | '.' => '_',
            other => other,
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{assemble, CompletionStatus, PageReport};
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url("https://www.example.com/blog/"), "www_example_com_blog");
        assert_eq!(sanitize_url("http://localhost:8080"), "localhost_8080");
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name(
                "https://example.com/",
                ScanType::SinglePage,
                "2024-05-01-13-45-10",
                false
            ),
            "example_com-single_page-2024-05-01-13-45-10.json"
        );
        assert_eq!(
            report_file_name(
                "https://example.com",
                ScanType::DeepCrawl,
                "2024-05-01-13-45-10",
                true
            ),
            "example_com-deep_crawl-2024-05-01-13-45-10-interrupted.json"
        );
    }

    #[test]
    fn test_save_report_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("reports");

        let report = AuditReport::SinglePage(PageReport {
            audited_url: "https://a.test/".to_string(),
            scan_type: ScanType::SinglePage,
            total_links_found: 0,
            total_broken_links: 0,
            broken_links: Vec::new(),
            note: None,
        });

        let path = save_report(&report, &dir).unwrap();
        assert!(path.starts_with(&dir));

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["audited_url"], "https://a.test/");
        assert_eq!(saved["scan_type"], "single_page");
    }

    #[test]
    fn test_interrupted_crawl_file_suffix() {
        let temp = TempDir::new().unwrap();
        let result = assemble(
            "https://a.test",
            Vec::new(),
            Vec::new(),
            0,
            CompletionStatus::UserStopped,
        );

        let path = save_report(&AuditReport::DeepCrawl(result), temp.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("a_test-deep_crawl-"));
        assert!(name.ends_with("-interrupted.json"));
    }
}
