// src/report/render.rs
// =============================================================================
// Prints reports to the terminal, either as pretty JSON or as a colored,
// human-readable summary.
//
// JSON goes to stdout untouched so it can be piped into other tools; all
// logging goes to stderr (see main.rs).
// =============================================================================

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;

use super::{AuditReport, CrawlResult, PageReport};
use crate::checker::{LinkClass, LinkProbeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

// Prints a report in the requested format
pub fn print_report(report: &AuditReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json_output = serde_json::to_string_pretty(report)?;
            println!("{}", json_output);
        }
        OutputFormat::Text => match report {
            AuditReport::SinglePage(page) => print_page_text(page),
            AuditReport::DeepCrawl(result) => print_crawl_text(result),
        },
    }
    Ok(())
}

fn print_page_text(report: &PageReport) {
    println!("{} {}", "🔍 Audited:".cyan(), report.audited_url);

    if let Some(note) = &report.note {
        println!("{}", format!("❌ {}", note).red());
        return;
    }

    println!("   {} link(s) found", report.total_links_found);
    println!();

    if report.broken_links.is_empty() {
        println!("{}", "✅ No broken links found. Excellent!".green());
    } else {
        println!(
            "{}",
            format!("📊 Summary: {} broken link(s) found:", report.total_broken_links).yellow()
        );
        print_link_table(&report.broken_links);
    }
}

fn print_crawl_text(result: &CrawlResult) {
    println!("{} {}", "🔍 Crawled:".cyan(), result.audited_url);

    if let Some(error) = &result.error {
        println!("{}", format!("❌ {}", error).red());
        return;
    }

    for page in &result.crawled_pages_summary {
        let line = format!(
            "   [depth {}] {} ({} links, {} broken)",
            page.depth,
            page.url,
            page.links_found_on_page,
            page.broken_links_on_page.len()
        );
        if page.note.is_some() {
            println!("{} {}", line.red(), "- fetch failed".red());
        } else if page.broken_links_on_page.is_empty() {
            println!("{}", line);
        } else {
            println!("{}", line.yellow());
        }
    }
    println!();

    if !result.all_broken_links_detailed.is_empty() {
        println!("{:<60} {:<8} {:<18} {}", "URL", "CODE", "STATUS", "FOUND ON");
        println!("{}", "=".repeat(120));
        for record in &result.all_broken_links_detailed {
            println!(
                "{:<60} {:<8} {:<18} {}",
                truncate(&record.probe.link, 57),
                record.probe.status_code,
                status_label(&record.probe).red(),
                record.source_page
            );
        }
        println!();
    }

    let status = result
        .crawl_completion_status
        .map(|s| s.to_string())
        .unwrap_or_default();
    println!(
        "{}",
        format!(
            "{} Pages crawled: {}, Unique links checked: {}, Broken links found: {}",
            status,
            result.total_pages_crawled,
            result.total_unique_links_checked,
            result.total_broken_links_across_site
        )
        .magenta()
    );
}

fn print_link_table(links: &[LinkProbeResult]) {
    println!("{:<60} {:<8} {:<18}", "URL", "CODE", "STATUS");
    println!("{}", "=".repeat(86));
    for link in links {
        println!(
            "{:<60} {:<8} {:<18}",
            truncate(&link.link, 57),
            link.status_code,
            status_label(link).red()
        );
    }
}

fn status_label(link: &LinkProbeResult) -> String {
    match link.class {
        LinkClass::ConnectionError => "⏱️  CONNECTION ERROR".to_string(),
        LinkClass::Broken => "❌ BROKEN".to_string(),
        LinkClass::Ok => "✅ OK".to_string(),
    }
}

// Shortens long URLs so the table columns stay aligned
fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let cut: String = url.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        url.to_string()
    }
}
