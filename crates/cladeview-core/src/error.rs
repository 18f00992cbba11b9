use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read tree file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed PhyloXML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("not a PhyloXML document (root element is <{root}>)")]
    NotPhyloXml { root: String },

    #[error("PhyloXML document contains no phylogeny")]
    NoPhylogeny,

    #[error("expected exactly one phylogeny, found {count}")]
    MultiplePhylogenies { count: usize },

    #[error("phylogeny #{index} has no root clade")]
    MissingClade { index: usize },

    #[error("invalid number in <{element}>: {value:?}")]
    InvalidNumber { element: String, value: String },

    #[error("branch length must be a non-negative finite number, got {value}")]
    NegativeBranchLength { value: f64 },
}
