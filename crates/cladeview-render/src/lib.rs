#![forbid(unsafe_code)]

//! Dendrogram layout for [`cladeview_core::Phylogeny`] plus the browser-facing outputs built on
//! top of it: Cytoscape elements, style rules and HTML documents.

pub mod elements;
pub mod html;
pub mod model;
pub mod position;
pub mod style;

use crate::model::TreeLayout;
use cladeview_core::Phylogeny;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot lay out empty or zero-depth tree ({leaves} leaves)")]
    DegenerateTree { leaves: usize },
    #[error(
        "column width {column_width} leaves no room for branches (longest label {label_width}, margin {margin})"
    )]
    InsufficientWidth {
        column_width: u32,
        label_width: usize,
        margin: usize,
    },
    #[error("invalid element id prefix {prefix:?} (must be non-empty and contain no 's')")]
    InvalidIdPrefix { prefix: String },
    #[error("invalid {axis} scale {value} (must be a positive number)")]
    InvalidScale { axis: &'static str, value: f64 },
    #[error("element JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Width budget in characters; branches get what the longest label leaves over.
    pub column_width: u32,
    /// Pixels per column.
    pub x_scale: f64,
    /// Pixels per row.
    pub y_scale: f64,
    pub grabbable: bool,
    pub id_prefix: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_width: 80,
            x_scale: 30.0,
            y_scale: 30.0,
            grabbable: false,
            id_prefix: "r".to_string(),
        }
    }
}

impl LayoutOptions {
    /// Rejects options that would produce unusable elements.
    ///
    /// Support ids are `{clade}s{n}` and hover styling cuts an id at its first `s`, so the prefix
    /// must not contain one; an empty prefix would give the root an empty id.
    pub fn validate(&self) -> Result<()> {
        if self.id_prefix.is_empty() || self.id_prefix.contains('s') {
            return Err(Error::InvalidIdPrefix {
                prefix: self.id_prefix.clone(),
            });
        }
        for (axis, value) in [("x", self.x_scale), ("y", self.y_scale)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidScale { axis, value });
            }
        }
        Ok(())
    }
}

/// Computes column and row positions and converts the tree into drawable elements.
pub fn layout_phylogeny(tree: &Phylogeny, options: &LayoutOptions) -> Result<TreeLayout> {
    options.validate()?;
    let columns = position::column_positions(tree, options.column_width)?;
    let rows = position::row_positions(tree);
    let (nodes, edges) = elements::build_elements(tree, &columns, &rows, options);

    tracing::debug!(
        clades = tree.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "tree layout ready"
    );

    Ok(TreeLayout {
        nodes,
        edges,
        columns,
        rows,
    })
}
