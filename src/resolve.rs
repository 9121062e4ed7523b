//! Slug resolution and derived node fields.
//!
//! Stage 2 of the pipeline. A pure function from [`ContentNode`] to
//! [`ResolvedNode`]; nothing here touches the filesystem or mutates its input.
//!
//! ## Slug rules
//!
//! - **Legacy collection**: `blog/{YYYY}/{MM}/{DD}/{title}` from the date part
//!   of `frontmatter.date`. A legacy post without a date is an error.
//! - **Any other collection**: `frontmatter.slug` when set and non-empty,
//!   otherwise the filename title (see [`crate::naming::title_slugged`]).
//!
//! When the slug falls back to a filename title that came out empty, the node
//! still resolves but a [`SlugWarning::Degenerate`] is reported, since two such
//! posts would share a URL.

use crate::naming::{self, date_portion};
use crate::types::{ContentNode, ResolvedNode};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ResolveError {
    #[error("Legacy post '{filename}' ({id}) has no date; cannot build its dated slug")]
    MissingDate { id: String, filename: String },
}

/// Non-fatal problems found while resolving a slug.
#[derive(Debug, Clone, PartialEq)]
pub enum SlugWarning {
    /// The filename had no title after its three-segment prefix.
    Degenerate {
        id: String,
        filename: String,
        slug: String,
    },
}

impl fmt::Display for SlugWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugWarning::Degenerate { id, filename, slug } => write!(
                f,
                "filename '{filename}' ({id}) has no title after its prefix; \
                 slug '{slug}' may collide"
            ),
        }
    }
}

/// Canonical path plus legacy paths for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct SlugResolution {
    pub slug: String,
    pub redirects: Vec<String>,
    pub warning: Option<SlugWarning>,
}

/// Derives slugs given the name of the legacy collection.
#[derive(Debug, Clone, Copy)]
pub struct SlugResolver<'a> {
    legacy_collection: &'a str,
}

impl Default for SlugResolver<'static> {
    fn default() -> Self {
        Self {
            legacy_collection: "legacy",
        }
    }
}

impl<'a> SlugResolver<'a> {
    pub fn new(legacy_collection: &'a str) -> Self {
        Self { legacy_collection }
    }

    /// Resolve the slug and redirect list of a node.
    pub fn resolve(&self, node: &ContentNode) -> Result<SlugResolution, ResolveError> {
        let parsed = naming::parse_filename(&node.filename);

        let (slug, uses_title) = if node.source_collection == self.legacy_collection {
            let date = node
                .frontmatter
                .date
                .as_deref()
                .filter(|d| !date_portion(d).is_empty())
                .ok_or_else(|| ResolveError::MissingDate {
                    id: node.id.clone(),
                    filename: node.filename.clone(),
                })?;
            (
                format!(
                    "blog/{}/{}",
                    naming::date_path(date),
                    parsed.title_slugged
                ),
                true,
            )
        } else {
            match node.frontmatter.slug.as_deref().filter(|s| !s.is_empty()) {
                Some(explicit) => (explicit.to_string(), false),
                None => (parsed.title_slugged.clone(), true),
            }
        };

        let warning = (uses_title && parsed.is_degenerate()).then(|| SlugWarning::Degenerate {
            id: node.id.clone(),
            filename: node.filename.clone(),
            slug: slug.clone(),
        });

        Ok(SlugResolution {
            slug,
            redirects: node.frontmatter.redirects.clone().unwrap_or_default(),
            warning,
        })
    }

    /// Build the full derived record for a node.
    pub fn derive(
        &self,
        node: &ContentNode,
    ) -> Result<(ResolvedNode, Option<SlugWarning>), ResolveError> {
        let SlugResolution {
            slug,
            redirects,
            warning,
        } = self.resolve(node)?;
        let fm = &node.frontmatter;

        let resolved = ResolvedNode {
            id: node.id.clone(),
            slug,
            date: fm
                .date
                .as_deref()
                .map(|d| date_portion(d).to_string())
                .unwrap_or_default(),
            title: fm.title.clone().unwrap_or_default(),
            description: fm.description.clone().unwrap_or_default(),
            categories: fm.categories.clone().unwrap_or_default(),
            keywords: fm.keywords.clone().unwrap_or_default(),
            redirects,
            published: fm.published.unwrap_or(false),
            banner: fm
                .banner
                .clone()
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            excerpt: node.excerpt.clone(),
        };
        Ok((resolved, warning))
    }

    /// Derive every node in order. Stops at the first error; warnings from all
    /// nodes are collected.
    pub fn derive_all(
        &self,
        nodes: &[ContentNode],
    ) -> Result<(Vec<ResolvedNode>, Vec<SlugWarning>), ResolveError> {
        let mut resolved = Vec::with_capacity(nodes.len());
        let mut warnings = Vec::new();
        for node in nodes {
            let (r, warning) = self.derive(node)?;
            resolved.push(r);
            warnings.extend(warning);
        }
        Ok((resolved, warnings))
    }
}
