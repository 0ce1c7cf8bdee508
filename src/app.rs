//! Application module: the context object that wires every component together.
//!
//! The `App` model lives in `app::model` and owns the store, catalog, player
//! controller and domain managers, plus the UI-facing state (current page,
//! selection, filter, notices).

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
