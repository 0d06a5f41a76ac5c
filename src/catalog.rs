//! Catalog collaborator: publications, categories and the tracks derived
//! from them, plus the stores that serve them.

mod filter;
mod load;
mod model;
mod scan;

pub use filter::{CatalogFilter, fuzzy_match_positions};
pub use load::{Catalog, CatalogError, CatalogStore, FileCatalog};
pub use model::{Category, Publication, PublicationKind, Track, TrackId};
pub use scan::DirectoryCatalog;
