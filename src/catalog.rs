//! Track/album/playlist catalog: sample data, lookups and search.
//!
//! The catalog is the fixed demo data set. `CatalogSource` can override it
//! from a `catalog.json` file in the data directory, falling back to the
//! built-in samples when that file is missing or broken.

mod model;
mod sample;
mod search;
mod source;

pub use model::*;
pub use sample::{sample_albums, sample_catalog, sample_playlist_seeds, sample_tracks};
pub use search::{fold_diacritics, search_tracks};
pub use source::CatalogSource;

#[cfg(test)]
mod tests;
