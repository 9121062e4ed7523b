//! Build driver: query → resolve → sequence → register.
//!
//! The whole directive set is computed before the registry sees anything, so
//! a fatal error in any stage leaves the registry untouched.

use crate::config::SiteConfig;
use crate::registry::{PageRegistry, register_all};
use crate::resolve::{ResolveError, SlugResolver, SlugWarning};
use crate::scan::{ContentSource, QueryError};
use crate::sequence::{self, Directives, SequenceError};
use crate::types::ResolvedNode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Content query failed: {0}")]
    Query(#[from] QueryError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub nodes: Vec<ResolvedNode>,
    pub pages: usize,
    pub redirects: usize,
    pub warnings: Vec<SlugWarning>,
}

/// Compute every directive for the nodes `source` reports, without
/// registering anything.
pub fn plan(
    source: &dyn ContentSource,
    config: &SiteConfig,
) -> Result<(Directives, Vec<ResolvedNode>, Vec<SlugWarning>), BuildError> {
    let nodes = source.query()?;
    if nodes.is_empty() {
        return Err(SequenceError::NoContent.into());
    }
    let resolver = SlugResolver::new(&config.legacy_collection);
    let (resolved, warnings) = resolver.derive_all(&nodes)?;
    let directives = sequence::build(&resolved)?;
    Ok((directives, resolved, warnings))
}

/// Plan the build and hand the result to `registry`.
pub fn run(
    source: &dyn ContentSource,
    registry: &mut dyn PageRegistry,
    config: &SiteConfig,
) -> Result<BuildReport, BuildError> {
    let (directives, nodes, warnings) = plan(source, config)?;
    let pages = directives.pages.len();
    let redirects = directives.redirects.len();
    register_all(directives, registry);
    Ok(BuildReport {
        nodes,
        pages,
        redirects,
        warnings,
    })
}
