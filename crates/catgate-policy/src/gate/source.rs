//! Catalog compilers the gate wraps.

use std::path::{Path, PathBuf};

use catgate_core::errors::CompileError;
use catgate_core::types::Catalog;

use super::request::CatalogRequest;

/// Produces the compiled catalog for a request. The gate never alters what
/// a compiler returns.
pub trait CatalogCompiler: Send + Sync {
    fn compile(&self, request: &CatalogRequest) -> Result<Catalog, CompileError>;
}

impl<F> CatalogCompiler for F
where
    F: Fn(&CatalogRequest) -> Result<Catalog, CompileError> + Send + Sync,
{
    fn compile(&self, request: &CatalogRequest) -> Result<Catalog, CompileError> {
        self(request)
    }
}

/// Serves precompiled catalog documents from `<dir>/<catalog_id>.json`.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    dir: PathBuf,
}

impl FileCatalogSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog_path(&self, catalog_id: &str) -> PathBuf {
        self.dir.join(format!("{catalog_id}.json"))
    }
}

impl CatalogCompiler for FileCatalogSource {
    fn compile(&self, request: &CatalogRequest) -> Result<Catalog, CompileError> {
        let catalog_id = request.catalog_id.as_str();
        // Ids are file stems; anything that could leave the directory is unknown.
        if catalog_id.is_empty()
            || catalog_id.contains(['/', '\\'])
            || catalog_id.starts_with('.')
        {
            return Err(CompileError::NotFound {
                catalog_id: catalog_id.to_string(),
            });
        }

        let path = self.catalog_path(catalog_id);
        let document = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CompileError::NotFound {
                catalog_id: catalog_id.to_string(),
            },
            _ => CompileError::Io {
                catalog_id: catalog_id.to_string(),
                message: e.to_string(),
            },
        })?;

        let catalog = Catalog::from_json(&document).map_err(|source| CompileError::Invalid {
            catalog_id: catalog_id.to_string(),
            source,
        })?;
        tracing::debug!(catalog = catalog_id, resources = catalog.resources().len(), "catalog loaded");
        Ok(catalog)
    }
}
