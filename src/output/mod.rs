// src/output/mod.rs
// =============================================================================
// Everything the crawl leaves on disk.
//
// Submodules:
// - filename: URL -> safe file name
// - store: writing page HTML (and noticing file name collisions)
// - index: the _index.txt listing written at the end
// =============================================================================

mod filename;
mod index;
mod store;

pub use filename::sanitize_filename;
pub use index::write_index;
#[cfg(test)]
pub use index::render_index;
pub use store::{PageRecord, PageStore};
