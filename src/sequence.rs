//! Page sequencing: resolved nodes to page and redirect directives.
//!
//! Stage 3 of the pipeline. Input must already be ordered by date, newest
//! first; this module links each post to its neighbours in that order and
//! does not re-sort.
//!
//! For `[a, b, c]` the output is:
//!
//! ```text
//! a.slug     post  {id: a, prev: null, next: b}
//! b.slug     post  {id: b, prev: a,    next: c}
//! c.slug     post  {id: c, prev: b,    next: null}
//! /articles  blog  {articleIds: [a, b, c], categories: []}
//! ```
//!
//! plus one permanent redirect per entry in each node's `redirects`.

use crate::types::{
    ARTICLES_PATH, BLOG_TEMPLATE, POST_TEMPLATE, PageContext, PageDirective, RedirectDirective,
    ResolvedNode,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SequenceError {
    #[error("There are no posts!")]
    NoContent,
}

/// Everything one build registers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Directives {
    pub pages: Vec<PageDirective>,
    pub redirects: Vec<RedirectDirective>,
}

/// Build post pages, redirects, and the article listing from date-sorted nodes.
pub fn build(sorted: &[ResolvedNode]) -> Result<Directives, SequenceError> {
    if sorted.is_empty() {
        return Err(SequenceError::NoContent);
    }

    let mut directives = Directives {
        pages: Vec::with_capacity(sorted.len() + 1),
        redirects: Vec::new(),
    };

    for (idx, node) in sorted.iter().enumerate() {
        let prev = idx.checked_sub(1).map(|i| sorted[i].id.clone());
        let next = sorted.get(idx + 1).map(|n| n.id.clone());

        directives.redirects.extend(
            node.redirects
                .iter()
                .map(|from| RedirectDirective::permanent(from.as_str(), node.slug.as_str())),
        );

        directives.pages.push(PageDirective {
            path: node.slug.clone(),
            template_id: POST_TEMPLATE.to_string(),
            context: PageContext::Post {
                id: node.id.clone(),
                prev,
                next,
            },
        });
    }

    directives.pages.push(PageDirective {
        path: ARTICLES_PATH.to_string(),
        template_id: BLOG_TEMPLATE.to_string(),
        context: PageContext::Blog {
            article_ids: sorted.iter().map(|n| n.id.clone()).collect(),
            categories: Vec::new(),
        },
    });

    Ok(directives)
}
