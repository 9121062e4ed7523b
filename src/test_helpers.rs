//! Shared test utilities for the blog-routes test suite.
//!
//! Provides fixture setup, node builders, and lookup helpers that work with
//! scan-stage and resolve-stage data.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path(), &SiteConfig::default()).unwrap();
//!
//! let post = find_node(&manifest.nodes, "01-02-03-hello-world");
//! assert_eq!(post.frontmatter.slug.as_deref(), Some("hello"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{ContentNode, Frontmatter, PageContext, PageDirective};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Node builders
// =========================================================================

/// A node with just the fields slug resolution looks at.
pub fn node(id: &str, collection: &str, filename: &str, date: Option<&str>) -> ContentNode {
    ContentNode {
        id: id.to_string(),
        source_collection: collection.to_string(),
        filename: filename.to_string(),
        frontmatter: Frontmatter {
            date: date.map(str::to_string),
            ..Frontmatter::default()
        },
        excerpt: String::new(),
    }
}

/// Same as [`node`] with an explicit frontmatter slug.
pub fn node_with_slug(id: &str, filename: &str, slug: &str) -> ContentNode {
    let mut n = node(id, "posts", filename, Some("2020-01-01"));
    n.frontmatter.slug = Some(slug.to_string());
    n
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a node by filename stem. Panics if not found.
pub fn find_node<'a>(nodes: &'a [ContentNode], filename: &str) -> &'a ContentNode {
    nodes
        .iter()
        .find(|n| n.filename == filename)
        .unwrap_or_else(|| {
            let names: Vec<&str> = nodes.iter().map(|n| n.filename.as_str()).collect();
            panic!("node '{filename}' not found. Available: {names:?}")
        })
}

/// Find a page directive by path. Panics if not found.
pub fn find_page<'a>(pages: &'a [PageDirective], path: &str) -> &'a PageDirective {
    pages.iter().find(|p| p.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        panic!("page '{path}' not found. Available: {paths:?}")
    })
}

/// `(prev, next)` of a post page. Panics on the blog page.
pub fn neighbours(page: &PageDirective) -> (Option<&str>, Option<&str>) {
    match &page.context {
        PageContext::Post { prev, next, .. } => (prev.as_deref(), next.as_deref()),
        other => panic!("expected post context on '{}', got {other:?}", page.path),
    }
}
