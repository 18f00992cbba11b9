#![forbid(unsafe_code)]

//! `cladeview` draws a PhyloXML phylogeny as a rectangular dendrogram in the browser.
//!
//! The heavy lifting lives in two crates:
//! - `cladeview-core`: PhyloXML reader and arena clade model
//! - `cladeview-render`: layout, Cytoscape elements, style rules and HTML documents
//!
//! This crate ties them together behind [`Viewer`], an immutable context built once at startup
//! and shared by every request of the served page.

pub mod config;

pub use cladeview_core::*;
pub use config::{Preset, ViewerConfig};

pub mod render {
    pub use cladeview_render::html::{
        DEFAULT_CYTOSCAPE_URL, DocumentOptions, PageEndpoints, embedded_data, interactive_html,
        standalone_html,
    };
    pub use cladeview_render::model::{LayoutEdge, LayoutNode, NodeClass, TreeLayout};
    pub use cladeview_render::style::{
        HighlightRule, MatchMode, StyleRule, base_stylesheet, highlight_rules, hover_rule,
        hover_stylesheet, stylesheet_with_highlights, subtree_root,
    };
    pub use cladeview_render::{LayoutOptions, layout_phylogeny};
}

use crate::render::{
    DocumentOptions, HighlightRule, PageEndpoints, StyleRule, TreeLayout, highlight_rules,
    stylesheet_with_highlights,
};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Parse(#[from] cladeview_core::Error),
    #[error(transparent)]
    Render(#[from] cladeview_render::Error),
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("no input file given")]
    MissingInput,
    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HeadlessError>;

/// Outcome of writing the standalone document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub nodes: usize,
    pub edges: usize,
    pub bytes: usize,
}

impl SaveReport {
    pub fn message(&self) -> String {
        format!("HTML file saved as: {}", self.path.display())
    }
}

/// Everything the viewer serves, computed once.
#[derive(Debug, Clone)]
pub struct Viewer {
    phylogeny: Phylogeny,
    layout: TreeLayout,
    highlights: Vec<HighlightRule>,
    stylesheet: Vec<StyleRule>,
    document: DocumentOptions,
}

impl Viewer {
    pub fn new(phylogeny: Phylogeny, config: &ViewerConfig) -> Result<Self> {
        let layout = render::layout_phylogeny(&phylogeny, &config.layout)?;
        let highlights = highlight_rules(&config.highlight.names, config.highlight.mode);

        for rule in &highlights {
            if !layout.labels().any(|label| rule.matches(label)) {
                tracing::warn!(entry = %rule.entry.trim(), "highlight entry matches no leaf");
            }
        }

        let stylesheet = stylesheet_with_highlights(&highlights);
        tracing::debug!(
            leaves = phylogeny.leaf_count(),
            highlights = highlights.len(),
            rules = stylesheet.len(),
            "viewer ready"
        );

        Ok(Self {
            phylogeny,
            layout,
            highlights,
            stylesheet,
            document: config.export.document.clone(),
        })
    }

    /// Reads `config.input` and builds the viewer; every startup failure surfaces here.
    pub fn open(config: &ViewerConfig) -> Result<Self> {
        let path = config.input.as_deref().ok_or(HeadlessError::MissingInput)?;
        let phylogeny = read_phyloxml_file(path)?;
        Self::new(phylogeny, config)
    }

    pub fn phylogeny(&self) -> &Phylogeny {
        &self.phylogeny
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn highlights(&self) -> &[HighlightRule] {
        &self.highlights
    }

    /// Base rules followed by the highlight overrides.
    pub fn stylesheet(&self) -> &[StyleRule] {
        &self.stylesheet
    }

    /// Stylesheet with the subtree under the hovered edge's source drawn in blue.
    pub fn hover_stylesheet(&self, source: &str) -> Vec<StyleRule> {
        render::hover_stylesheet(&self.stylesheet, source)
    }

    pub fn standalone_html(&self) -> Result<String> {
        Ok(render::standalone_html(
            &self.layout,
            &self.stylesheet,
            &self.document,
        )?)
    }

    pub fn interactive_html(&self, endpoints: &PageEndpoints) -> Result<String> {
        Ok(render::interactive_html(
            &self.layout,
            &self.stylesheet,
            &self.document,
            endpoints,
        )?)
    }

    /// Writes the standalone document to `path`, replacing any existing file.
    ///
    /// The write is not atomic: two saves racing on the same path may interleave.
    pub fn save_html(&self, path: &Path) -> Result<SaveReport> {
        let html = self.standalone_html()?;
        std::fs::write(path, &html).map_err(|source| HeadlessError::Export {
            path: path.to_path_buf(),
            source,
        })?;

        let report = SaveReport {
            path: path.to_path_buf(),
            nodes: self.layout.nodes.len(),
            edges: self.layout.edges.len(),
            bytes: html.len(),
        };
        tracing::info!(
            path = %report.path.display(),
            nodes = report.nodes,
            edges = report.edges,
            bytes = report.bytes,
            "saved standalone HTML"
        );
        Ok(report)
    }
}
