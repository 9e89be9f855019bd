//! Terminal output for the end of a run.
//!
//! - [`terminal`] - success/failure banners
//! - [`summary`] - per-resource import and teardown tables

mod summary;
mod terminal;

pub use summary::{print_imports, print_teardown};
pub use terminal::{banner, print_banner};
