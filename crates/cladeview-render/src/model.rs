use serde::{Deserialize, Serialize};

/// Drawable elements in Cytoscape's JSON shape, plus the position tables they were built from.
#[derive(Debug, Clone, Serialize)]
pub struct TreeLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Column per clade, indexed by `CladeId`.
    #[serde(skip)]
    pub columns: Vec<i64>,
    /// Row per clade, indexed by `CladeId`.
    #[serde(skip)]
    pub rows: Vec<i64>,
}

impl TreeLayout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.data.id == id)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| n.data.name.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    Nonterminal,
    Terminal,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub data: NodeData,
    pub position: Position,
    pub classes: NodeClass,
    pub grabbable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Id of the clade the edge hangs from; hover styling selects subtrees by it.
    #[serde(rename = "sourceCladeId")]
    pub source_clade_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub data: EdgeData,
}
