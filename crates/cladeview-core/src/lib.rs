#![forbid(unsafe_code)]

//! PhyloXML reader + arena clade model (headless).
//!
//! Design goals:
//! - keep the clade order exactly as written in the file (layout depends on it)
//! - no recursion over the tree: deep caterpillar trees must not blow the stack
//! - precise, typed errors for everything that can go wrong at startup

pub mod error;
pub mod model;
pub mod phyloxml;

pub use error::{Error, Result};
pub use model::{Clade, CladeId, Confidence, Phylogeny, SUMMARY_LABEL_LIMIT, Taxonomy};
pub use phyloxml::{parse_phyloxml, parse_single_phyloxml};

use std::path::Path;

/// Reads a PhyloXML file that holds exactly one phylogeny.
pub fn read_phyloxml_file(path: impl AsRef<Path>) -> Result<Phylogeny> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read PhyloXML file");
    parse_single_phyloxml(&text)
}
