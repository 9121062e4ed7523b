//! Shared types passed between pipeline stages.
//!
//! [`ContentNode`] is what the scan stage produces and what `manifest.json`
//! holds. [`ResolvedNode`] is the derived record built from it. The directive
//! types are what the sequence stage hands to a page registry.

use serde::{Deserialize, Serialize};

/// Template id for individual post pages.
pub const POST_TEMPLATE: &str = "post";
/// Template id for the article listing page.
pub const BLOG_TEMPLATE: &str = "blog";
/// Fixed path of the article listing page.
pub const ARTICLES_PATH: &str = "/articles";

/// One article as reported by the content query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Opaque unique identifier.
    pub id: String,
    /// Name of the collection the file came from (e.g. `legacy`, `posts`).
    pub source_collection: String,
    /// Filename stem, without extension.
    pub filename: String,
    pub frontmatter: Frontmatter,
    /// Plain-text excerpt of the body.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub excerpt: String,
}

/// Frontmatter block of a post. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirects: Option<Vec<String>>,
    /// Hidden posts never leave the content query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Fully derived record for one node. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNode {
    pub id: String,
    /// Canonical relative URL path.
    pub slug: String,
    /// Date-only form of the frontmatter date, empty when absent.
    pub date: String,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    /// Legacy paths that should redirect to `slug`.
    pub redirects: Vec<String>,
    pub published: bool,
    /// Banner object, `{}` when absent.
    pub banner: serde_json::Value,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub excerpt: String,
}

/// Instruction to register one routable page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDirective {
    pub path: String,
    pub template_id: String,
    pub context: PageContext,
}

/// Payload handed to a page template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageContext {
    /// A single post with the ids of its chronological neighbours.
    Post {
        id: String,
        prev: Option<String>,
        next: Option<String>,
    },
    /// The article listing.
    #[serde(rename_all = "camelCase")]
    Blog {
        article_ids: Vec<String>,
        categories: Vec<String>,
    },
}

/// Instruction to register one permanent, client-side-honored redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectDirective {
    pub from_path: String,
    pub to_path: String,
    pub is_permanent: bool,
    pub redirect_in_browser: bool,
}

impl RedirectDirective {
    pub fn permanent(from_path: impl Into<String>, to_path: impl Into<String>) -> Self {
        Self {
            from_path: from_path.into(),
            to_path: to_path.into(),
            is_permanent: true,
            redirect_in_browser: true,
        }
    }
}
