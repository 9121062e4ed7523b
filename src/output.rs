//! CLI output formatting for all pipeline stages.
//!
//! Output is information-first: each post leads with its positional index and
//! title, with source file and route shown as indented context lines.
//!
//! ## Scan
//!
//! ```text
//! legacy (1 posts)
//!     001 My Post
//!         Source: legacy/01-02-03-my-post
//!         Date: 2019-05-10T00:00:00
//! posts (3 posts)
//!     001 Nested Post
//!         Source: posts/07-08-09-nested-post
//!         Date: 2021-03-04
//! ```
//!
//! ## Build
//!
//! ```text
//! Posts
//! 001 Nested Post → nested-post
//! 002 Second Post → second-post
//!     Prev: Nested Post
//!     Next: Hello, World
//! Articles → /articles (4 posts)
//!
//! Redirects
//! /old/hello → /hello (301)
//!
//! Generated 5 pages, 2 redirects
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Warnings go to
//! stderr.

use crate::pipeline::BuildReport;
use crate::registry::RouteTable;
use crate::resolve::SlugWarning;
use crate::scan::Manifest;
use crate::types::{PageContext, ResolvedNode};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Title for display, falling back to the id for untitled posts.
fn display_title<'a>(nodes: &'a [ResolvedNode], id: &'a str) -> &'a str {
    nodes
        .iter()
        .find(|n| n.id == id)
        .map(|n| n.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(id)
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output: posts grouped by collection, in query order.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut collections: Vec<&str> = manifest
        .nodes
        .iter()
        .map(|n| n.source_collection.as_str())
        .collect();
    collections.sort();
    collections.dedup();

    let mut lines = Vec::new();
    for collection in collections {
        let posts: Vec<_> = manifest
            .nodes
            .iter()
            .filter(|n| n.source_collection == collection)
            .collect();
        lines.push(format!("{} ({} posts)", collection, posts.len()));
        for (i, node) in posts.iter().enumerate() {
            let title = node
                .frontmatter
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(&node.filename);
            lines.push(format!("    {} {}", format_index(i + 1), title));
            lines.push(format!("        Source: {}/{}", collection, node.filename));
            if let Some(date) = &node.frontmatter.date {
                lines.push(format!("        Date: {}", date));
            }
        }
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format build output: every registered page and redirect.
pub fn format_build_output(report: &BuildReport, table: &RouteTable) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];
    let mut position = 0;

    for page in &table.pages {
        match &page.context {
            PageContext::Post { id, prev, next } => {
                position += 1;
                lines.push(format!(
                    "{} {} \u{2192} {}",
                    format_index(position),
                    display_title(&report.nodes, id),
                    page.path
                ));
                if let Some(prev) = prev {
                    lines.push(format!("    Prev: {}", display_title(&report.nodes, prev)));
                }
                if let Some(next) = next {
                    lines.push(format!("    Next: {}", display_title(&report.nodes, next)));
                }
            }
            PageContext::Blog { article_ids, .. } => {
                lines.push(format!(
                    "Articles \u{2192} {} ({} posts)",
                    page.path,
                    article_ids.len()
                ));
            }
        }
    }

    if !table.redirects.is_empty() {
        lines.push(String::new());
        lines.push("Redirects".to_string());
        for r in &table.redirects {
            let status = if r.is_permanent { 301 } else { 302 };
            let to = if r.to_path.starts_with('/') {
                r.to_path.clone()
            } else {
                format!("/{}", r.to_path)
            };
            lines.push(format!("{} \u{2192} {} ({})", r.from_path, to, status));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages, {} redirects",
        report.pages, report.redirects
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport, table: &RouteTable) {
    for line in format_build_output(report, table) {
        println!("{}", line);
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// One `warning:` line per slug warning.
pub fn format_warnings(warnings: &[SlugWarning]) -> Vec<String> {
    warnings.iter().map(|w| format!("warning: {}", w)).collect()
}

/// Print warnings to stderr.
pub fn print_warnings(warnings: &[SlugWarning]) {
    for line in format_warnings(warnings) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
