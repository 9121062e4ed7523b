//! # blog-routes
//!
//! Route planning for a markdown blog: derives each post's URL slug from its
//! filename and frontmatter, links posts to their chronological neighbours,
//! and emits the page and redirect directives a site builder registers.
//!
//! # Architecture: Query, Derive, Register
//!
//! ```text
//! 1. Scan      content/   →  Vec<ContentNode>   (markdown files → metadata)
//! 2. Resolve   nodes      →  Vec<ResolvedNode>  (slug + derived fields)
//! 3. Sequence  resolved   →  Directives         (pages, redirects, /articles)
//! 4. Register  directives →  PageRegistry       (routes.json, _redirects)
//! ```
//!
//! Stages 2 and 3 are pure functions over in-memory lists. The content query
//! and the page registry sit behind traits ([`scan::ContentSource`],
//! [`registry::PageRegistry`]) so the core can be driven from tests or from a
//! different site builder without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks collection directories, parses YAML frontmatter |
//! | [`resolve`] | Stage 2: slug rules, derived node record, slug warnings |
//! | [`sequence`] | Stage 3: prev/next linking, redirects, article listing |
//! | [`registry`] | Stage 4: registry trait and the on-disk route table |
//! | [`pipeline`] | Wires the stages with all-or-nothing registration |
//! | [`bundler`] | Static module-resolution payload for the JS bundler |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`naming`] | `NN-NN-NN-title` filename and date-prefix parsing |
//! | [`types`] | Node and directive types shared between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Slugs
//!
//! Posts in the legacy collection keep their dated URLs,
//! `blog/YYYY/MM/DD/title`. Everything else uses the frontmatter `slug`, or
//! the filename with its three-segment prefix removed. Old URLs listed in a
//! post's `redirects` become permanent redirects to the canonical slug.
//!
//! # All or Nothing
//!
//! A build either registers every route or none. The full directive set is
//! planned before the first registry call, and an empty content set, a query
//! failure, or an undated legacy post aborts the build.

pub mod bundler;
pub mod config;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod scan;
pub mod sequence;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
