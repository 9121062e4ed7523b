//! Module resolution handed to the bundler.
//!
//! Static configuration, not content-dependent: the module search roots and
//! import aliases the JS bundler should use. Built once per build from
//! [`BundlerConfig`] and written as `bundler.json`.

use crate::config::BundlerConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundlerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const BUNDLER_FILE: &str = "bundler.json";

/// Package directory searched after the configured source roots.
const NODE_MODULES: &str = "node_modules";

/// The `resolve` section of a bundler config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundlerResolve {
    /// Search roots in order; source dirs as absolute paths, then `node_modules`.
    pub modules: Vec<String>,
    /// Import alias → package name or absolute path.
    pub alias: BTreeMap<String, String>,
}

/// Resolve the bundler payload. Relative `project_root` values are taken
/// against `base` (normally the working directory).
pub fn resolve(config: &BundlerConfig, base: &Path) -> BundlerResolve {
    let root = project_root(config, base);

    let mut modules: Vec<String> = config
        .source_dirs
        .iter()
        .map(|dir| display(&root.join(dir)))
        .collect();
    modules.push(NODE_MODULES.to_string());

    let alias = config
        .alias
        .iter()
        .map(|(name, target)| {
            let resolved = match target.strip_prefix("./") {
                Some(rel) => display(&root.join(rel)),
                None => target.clone(),
            };
            (name.clone(), resolved)
        })
        .collect();

    BundlerResolve { modules, alias }
}

/// Write the resolved payload as `{"resolve": {...}}` to `output_dir/bundler.json`.
pub fn write(resolve: &BundlerResolve, output_dir: &Path) -> Result<(), BundlerError> {
    #[derive(Serialize)]
    struct Payload<'a> {
        resolve: &'a BundlerResolve,
    }
    fs::create_dir_all(output_dir)?;
    let json = serde_json::to_string_pretty(&Payload { resolve })?;
    fs::write(output_dir.join(BUNDLER_FILE), json)?;
    Ok(())
}

fn project_root(config: &BundlerConfig, base: &Path) -> PathBuf {
    let root = Path::new(&config.project_root);
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        base.join(root)
    };
    // Drop `.` components so `./src` style roots print cleanly.
    joined
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

fn display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
