use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use super::model::{Category, Publication};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("catalog root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Read-only source of publications and their categories.
pub trait CatalogStore {
    fn list_publications(&self) -> Result<Vec<Publication>, CatalogError>;
    fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;
}

/// An in-memory catalog, also the on-disk document layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub publications: Vec<Publication>,
}

impl Catalog {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Pull everything out of `store` into memory.
    pub fn load_from(store: &dyn CatalogStore) -> Result<Self, CatalogError> {
        Ok(Self {
            categories: store.list_categories()?,
            publications: store.list_publications()?,
        })
    }
}

impl CatalogStore for Catalog {
    fn list_publications(&self) -> Result<Vec<Publication>, CatalogError> {
        Ok(self.publications.clone())
    }

    fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.clone())
    }
}

/// A TOML catalog file with `[[categories]]` and `[[publications]]` tables.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Catalog, CatalogError> {
        let text = fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.clone(),
            source,
        })?;
        Catalog::from_toml_str(&text).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl CatalogStore for FileCatalog {
    fn list_publications(&self) -> Result<Vec<Publication>, CatalogError> {
        Ok(self.read()?.publications)
    }

    fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.read()?.categories)
    }
}
