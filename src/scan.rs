//! Content query: markdown files on disk to [`ContentNode`]s.
//!
//! Stage 1 of the pipeline. Every top-level directory of the content root is
//! a collection; every `.md` or `.mdx` file below it is one post:
//!
//! ```text
//! content/
//! ├── config.toml                          # Build configuration (optional)
//! ├── legacy/                              # Collection "legacy"
//! │   └── 01-02-03-my-post.md              # → blog/2019/05/10/my-post
//! └── posts/                               # Collection "posts"
//!     ├── 2020-01-01-hello-world.mdx       # → frontmatter slug or hello-world
//!     └── 2021/03-04-05-nested.md          # Nested dirs belong to "posts"
//! ```
//!
//! Each file must open with a YAML frontmatter block fenced by `---` lines.
//! Posts with `hidden: true` are dropped here and the rest are sorted by date,
//! newest first, which is the order the sequence stage expects.

use crate::config::SiteConfig;
use crate::naming::date_parts;
use crate::types::{ContentNode, Frontmatter};
use pulldown_cmark::{Event, Parser, TagEnd};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Post must begin with `---`: {0}")]
    MissingStartFence(PathBuf),
    #[error("Missing closing `---`: {0}")]
    MissingEndFence(PathBuf),
    #[error("Invalid frontmatter in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Supplies the full set of content nodes for one build.
///
/// Implementations return nodes with hidden posts already removed and sorted
/// by date, newest first.
pub trait ContentSource {
    fn query(&self) -> Result<Vec<ContentNode>, QueryError>;
}

/// A fixed, already-queried node list.
impl ContentSource for Vec<ContentNode> {
    fn query(&self) -> Result<Vec<ContentNode>, QueryError> {
        Ok(self.clone())
    }
}

/// Reads posts from collection directories under a content root.
pub struct FsContentSource<'a> {
    root: &'a Path,
    excerpt_length: usize,
}

impl<'a> FsContentSource<'a> {
    pub fn new(root: &'a Path, config: &SiteConfig) -> Self {
        Self {
            root,
            excerpt_length: config.excerpt_length,
        }
    }
}

impl ContentSource for FsContentSource<'_> {
    fn query(&self) -> Result<Vec<ContentNode>, QueryError> {
        let mut nodes = Vec::new();
        for collection in collect_collections(self.root)? {
            let name = collection
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            for file in collect_posts(&collection)? {
                let node = parse_post(self.root, &name, &file, self.excerpt_length)?;
                if node.frontmatter.hidden != Some(true) {
                    nodes.push(node);
                }
            }
        }
        sort_newest_first(&mut nodes);
        Ok(nodes)
    }
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub nodes: Vec<ContentNode>,
    pub config: SiteConfig,
}

/// Query the filesystem source under `root` into a [`Manifest`].
pub fn scan(root: &Path, config: &SiteConfig) -> Result<Manifest, QueryError> {
    let nodes = FsContentSource::new(root, config).query()?;
    Ok(Manifest {
        nodes,
        config: config.clone(),
    })
}

const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> QueryError + '_ {
    move |source| QueryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn collect_collections(root: &Path) -> Result<Vec<PathBuf>, QueryError> {
    let entries = fs::read_dir(root)
        .map_err(io_error(root))?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error(root))?;
    let mut dirs: Vec<PathBuf> = entries
        .into_iter()
        .filter(|p| {
            p.is_dir()
                && !p
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with('.'))
                    .unwrap_or(true)
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn collect_posts(collection: &Path) -> Result<Vec<PathBuf>, QueryError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(collection)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_post(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_post(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    POST_EXTENSIONS.contains(&ext.as_str())
}

/// Newest first. Dates compare by day, then by time of day, whichever of
/// space or `T` separates them. Missing dates sort last; ties fall back to id.
pub fn sort_newest_first(nodes: &mut [ContentNode]) {
    nodes.sort_by(|a, b| {
        let a_key = a.frontmatter.date.as_deref().map(date_parts);
        let b_key = b.frontmatter.date.as_deref().map(date_parts);
        b_key.cmp(&a_key).then_with(|| a.id.cmp(&b.id))
    });
}

fn parse_post(
    root: &Path,
    collection: &str,
    path: &Path,
    excerpt_length: usize,
) -> Result<ContentNode, QueryError> {
    let content = fs::read_to_string(path).map_err(io_error(path))?;
    let (yaml, body) = split_frontmatter(&content, path)?;
    let frontmatter: Frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|source| QueryError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?
    };

    let filename = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let rel = path.strip_prefix(root).unwrap_or(path);

    Ok(ContentNode {
        id: node_id(collection, rel),
        source_collection: collection.to_string(),
        filename,
        frontmatter,
        excerpt: excerpt(body, excerpt_length),
    })
}

/// Split a post into its frontmatter YAML and markdown body.
fn split_frontmatter<'c>(content: &'c str, path: &Path) -> Result<(&'c str, &'c str), QueryError> {
    const FENCE: &str = "---";
    let rest = content
        .trim_start_matches('\u{feff}')
        .strip_prefix(FENCE)
        .ok_or_else(|| QueryError::MissingStartFence(path.to_path_buf()))?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest
        .strip_prefix('\n')
        .ok_or_else(|| QueryError::MissingStartFence(path.to_path_buf()))?;

    // The closing fence is a line of its own; a `---` inside a YAML string
    // must not end the block.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(QueryError::MissingEndFence(path.to_path_buf()))
}

/// Stable node id: first 16 hex chars of SHA-256 over `collection/relative path`.
pub fn node_id(collection: &str, rel_path: &Path) -> String {
    let key = format!(
        "{}/{}",
        collection,
        rel_path.to_string_lossy().replace('\\', "/")
    );
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Plain-text excerpt of a markdown body, at most `max_chars` characters.
/// A cut happens on a word boundary and ends in `…`, which counts toward the
/// limit.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    let full = words.join(" ");
    if full.chars().count() <= max_chars {
        return full;
    }

    let budget = max_chars.saturating_sub(1);
    let mut out = String::new();
    let mut len = 0;
    for word in &words {
        let extra = if out.is_empty() { 0 } else { 1 } + word.chars().count();
        if len + extra > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        len += extra;
    }
    if out.is_empty() {
        out = full.chars().take(budget).collect();
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write_post(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scan_finds_all_visible_posts() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &SiteConfig::default()).unwrap();
        // Five posts on disk, one hidden
        assert_eq!(manifest.nodes.len(), 4);
    }

    #[test]
    fn hidden_posts_are_dropped() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert!(manifest.nodes.iter().all(|n| n.filename != "04-05-06-secret-draft"));
    }

    #[test]
    fn posts_are_sorted_newest_first() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &SiteConfig::default()).unwrap();
        let dates: Vec<&str> = manifest
            .nodes
            .iter()
            .map(|n| n.frontmatter.date.as_deref().unwrap())
            .collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn collection_is_top_level_directory() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &SiteConfig::default()).unwrap();
        let legacy = find_node(&manifest.nodes, "01-02-03-my-post");
        assert_eq!(legacy.source_collection, "legacy");
        let nested = find_node(&manifest.nodes, "07-08-09-nested-post");
        assert_eq!(nested.source_collection, "posts");
    }

    #[test]
    fn frontmatter_fields_are_parsed() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path(), &SiteConfig::default()).unwrap();
        let node = find_node(&manifest.nodes, "01-02-03-hello-world");
        assert_eq!(node.frontmatter.slug.as_deref(), Some("hello"));
        assert_eq!(node.frontmatter.title.as_deref(), Some("Hello, World"));
        assert_eq!(node.frontmatter.published, Some(true));
        assert_eq!(
            node.frontmatter.categories.as_deref(),
            Some(&["rust".to_string(), "meta".to_string()][..])
        );
        assert_eq!(
            node.frontmatter.redirects.as_deref(),
            Some(&["/old/hello".to_string()][..])
        );
    }

    #[test]
    fn files_at_content_root_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "about.md", "---\ntitle: About\n---\nhi");
        write_post(tmp.path(), "posts/01-02-03-a.md", "---\ndate: 2020-01-01\n---\n");
        let nodes = FsContentSource::new(tmp.path(), &SiteConfig::default())
            .query()
            .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].filename, "01-02-03-a");
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "posts/cover.png", "not a post");
        write_post(tmp.path(), "posts/01-02-03-a.mdx", "---\ndate: 2020-01-01\n---\n");
        let nodes = FsContentSource::new(tmp.path(), &SiteConfig::default())
            .query()
            .unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn missing_start_fence_is_query_error() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "posts/01-02-03-a.md", "title: nope\n");
        let result = FsContentSource::new(tmp.path(), &SiteConfig::default()).query();
        assert!(matches!(result, Err(QueryError::MissingStartFence(_))));
    }

    #[test]
    fn missing_end_fence_is_query_error() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "posts/01-02-03-a.md", "---\ntitle: nope\n");
        let result = FsContentSource::new(tmp.path(), &SiteConfig::default()).query();
        assert!(matches!(result, Err(QueryError::MissingEndFence(_))));
    }

    #[test]
    fn invalid_yaml_is_query_error() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "posts/01-02-03-a.md", "---\ntitle: [unclosed\n---\n");
        let result = FsContentSource::new(tmp.path(), &SiteConfig::default()).query();
        assert!(matches!(result, Err(QueryError::Frontmatter { .. })));
    }

    #[test]
    fn unreadable_post_error_names_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("posts/01-02-03-bad.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"---\ntitle: \xff\xfe\n---\n").unwrap();

        let err = FsContentSource::new(tmp.path(), &SiteConfig::default())
            .query()
            .unwrap_err();
        assert!(matches!(&err, QueryError::Io { path: p, .. } if p == &path));
        assert!(err.to_string().contains("01-02-03-bad.md"), "{err}");
    }

    #[test]
    fn missing_content_root_error_names_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nope");
        let err = FsContentSource::new(&root, &SiteConfig::default())
            .query()
            .unwrap_err();
        assert!(matches!(&err, QueryError::Io { path, .. } if path == &root));
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_collection_fails_query() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "posts/01-02-03-a.md", "---\ndate: 2020-01-01\n---\n");
        write_post(tmp.path(), "locked/01-02-03-b.md", "---\ndate: 2020-01-02\n---\n");
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits do not stop root; nothing to check in that case.
        let listable = fs::read_dir(&locked).is_ok();

        let result = FsContentSource::new(tmp.path(), &SiteConfig::default()).query();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if !listable {
            assert!(matches!(result, Err(QueryError::Walk(_))));
        }
    }

    #[test]
    fn dashes_inside_yaml_values_do_not_close_fence() {
        let content = "---\ntitle: \"a --- b\"\n---\nbody";
        let (yaml, body) = split_frontmatter(content, Path::new("x.md")).unwrap();
        assert_eq!(yaml, "title: \"a --- b\"\n");
        assert_eq!(body, "body");
    }

    #[test]
    fn empty_frontmatter_is_default() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "posts/01-02-03-a.md", "---\n---\nbody\n");
        let nodes = FsContentSource::new(tmp.path(), &SiteConfig::default())
            .query()
            .unwrap();
        assert_eq!(nodes[0].frontmatter, Frontmatter::default());
    }

    #[test]
    fn node_ids_are_stable_and_distinct() {
        let a = node_id("posts", Path::new("posts/a.md"));
        assert_eq!(a, node_id("posts", Path::new("posts/a.md")));
        assert_ne!(a, node_id("legacy", Path::new("posts/a.md")));
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn sort_breaks_date_ties_by_id() {
        let mut nodes = vec![
            node("b", "posts", "01-02-03-b", Some("2020-01-01")),
            node("a", "posts", "01-02-03-a", Some("2020-01-01")),
            node("c", "posts", "01-02-03-c", Some("2021-01-01")),
        ];
        sort_newest_first(&mut nodes);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn same_day_dates_sort_by_time_across_separators() {
        let mut nodes = vec![
            node("t", "posts", "01-02-03-t", Some("2020-06-15T08:00")),
            node("s", "posts", "01-02-03-s", Some("2020-06-15 09:00")),
            node("d", "posts", "01-02-03-d", Some("2020-06-15")),
        ];
        sort_newest_first(&mut nodes);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["s", "t", "d"]);
    }

    #[test]
    fn missing_dates_sort_last() {
        let mut nodes = vec![
            node("a", "posts", "01-02-03-a", None),
            node("b", "posts", "01-02-03-b", Some("2020-01-01")),
        ];
        sort_newest_first(&mut nodes);
        assert_eq!(nodes[0].id, "b");
    }

    // =========================================================================
    // excerpt tests
    // =========================================================================

    #[test]
    fn excerpt_strips_markdown() {
        let text = excerpt("# Title\n\nSome *emphasis* and `code`.", 250);
        assert_eq!(text, "Title Some emphasis and code.");
    }

    #[test]
    fn excerpt_prunes_on_word_boundary() {
        let text = excerpt("one two three four", 9);
        assert_eq!(text, "one two…");
    }

    #[test]
    fn excerpt_short_body_is_untouched() {
        assert_eq!(excerpt("short", 250), "short");
    }

    #[test]
    fn excerpt_cuts_single_long_word() {
        assert_eq!(excerpt("abcdefghij", 4), "abc…");
    }

    #[test]
    fn excerpt_exactly_at_limit_is_untouched() {
        assert_eq!(excerpt("aaaa bbbb", 9), "aaaa bbbb");
        assert_eq!(excerpt("aaaa bbbbb", 9), "aaaa…");
    }

    #[test]
    fn excerpt_never_exceeds_limit() {
        let body = "The quick brown fox jumps over the lazy dog, twice over.";
        for max in 1..body.len() + 2 {
            let text = excerpt(body, max);
            assert!(
                text.chars().count() <= max,
                "excerpt of {max} was {} chars: {text:?}",
                text.chars().count()
            );
        }
    }
}
