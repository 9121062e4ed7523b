//! Page registration.
//!
//! The sequence stage decides *what* routes exist; a [`PageRegistry`] decides
//! what registering one means. [`RouteTable`] keeps them in memory and can
//! write them out as `routes.json` plus a `_redirects` file.

use crate::sequence::Directives;
use crate::types::{PageDirective, RedirectDirective};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accepts route directives from the pipeline.
pub trait PageRegistry {
    fn create_page(&mut self, page: PageDirective);
    fn create_redirect(&mut self, redirect: RedirectDirective);
}

/// Hand every directive to a registry, redirects first.
pub fn register_all(directives: Directives, registry: &mut dyn PageRegistry) {
    for redirect in directives.redirects {
        registry.create_redirect(redirect);
    }
    for page in directives.pages {
        registry.create_page(page);
    }
}

/// In-memory registry, in registration order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RouteTable {
    pub pages: Vec<PageDirective>,
    pub redirects: Vec<RedirectDirective>,
}

impl PageRegistry for RouteTable {
    fn create_page(&mut self, page: PageDirective) {
        self.pages.push(page);
    }

    fn create_redirect(&mut self, redirect: RedirectDirective) {
        self.redirects.push(redirect);
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `routes.json` and `_redirects` into `output_dir`, creating it.
    pub fn write(&self, output_dir: &Path) -> Result<(), RegistryError> {
        fs::create_dir_all(output_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(output_dir.join(ROUTES_FILE), json)?;
        fs::write(output_dir.join(REDIRECTS_FILE), self.redirects_file())?;
        Ok(())
    }

    /// `_redirects` contents: one `from to 301` line per redirect.
    pub fn redirects_file(&self) -> String {
        let mut out = String::new();
        for r in &self.redirects {
            let status = if r.is_permanent { 301 } else { 302 };
            let _ = writeln!(out, "{} {} {}", r.from_path, absolute(&r.to_path), status);
        }
        out
    }
}

pub const ROUTES_FILE: &str = "routes.json";
pub const REDIRECTS_FILE: &str = "_redirects";

/// Redirect targets are site-absolute even when the slug is not.
fn absolute(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
