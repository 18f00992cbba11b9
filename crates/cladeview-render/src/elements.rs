//! Tree → Cytoscape nodes and edges.
//!
//! Cytoscape only draws straight edges, so every parent→child relation goes through a "support"
//! node placed on the parent's column and the child's row:
//!
//! ```text
//! parent ── support
//!              │
//!            child
//! ```
//!
//! Ids spell out the path from the root: the root is `prefix`, child `n` of `X` is `Xc{n}` and
//! the support node in front of it is `Xs{n}`.

use crate::LayoutOptions;
use crate::model::{EdgeData, LayoutEdge, LayoutNode, NodeClass, NodeData, Position};
use cladeview_core::{CladeId, Phylogeny};

enum Work {
    Clade {
        id: CladeId,
        path: String,
    },
    Link {
        parent: CladeId,
        parent_path: String,
        index: usize,
        child: CladeId,
    },
}

/// Emits one node per clade and, per parent/child pair, one support node and two edges.
///
/// Output order matches a recursive preorder walk: a clade's node, then for each child its
/// support node, both edges and the whole child subtree before the next sibling.
pub fn build_elements(
    tree: &Phylogeny,
    columns: &[i64],
    rows: &[i64],
    options: &LayoutOptions,
) -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
    let mut nodes = Vec::with_capacity(tree.len() * 2);
    let mut edges = Vec::with_capacity(tree.len() * 2);

    let x_of = |id: CladeId| columns[id] as f64 * options.x_scale;
    let y_of = |id: CladeId| rows[id] as f64 * options.y_scale;

    let mut stack = vec![Work::Clade {
        id: tree.root(),
        path: options.id_prefix.clone(),
    }];
    while let Some(work) = stack.pop() {
        match work {
            Work::Clade { id, path } => {
                let clade = tree.clade(id);
                let (classes, name, confidence) = if clade.is_terminal() {
                    (NodeClass::Terminal, clade.name.clone(), None)
                } else {
                    (NodeClass::Nonterminal, None, clade.confidence())
                };
                nodes.push(LayoutNode {
                    data: NodeData {
                        id: path.clone(),
                        name,
                        confidence,
                    },
                    position: Position {
                        x: x_of(id),
                        y: y_of(id),
                    },
                    classes,
                    grabbable: options.grabbable,
                });

                for (index, &child) in clade.children().iter().enumerate().rev() {
                    stack.push(Work::Link {
                        parent: id,
                        parent_path: path.clone(),
                        index,
                        child,
                    });
                }
            }
            Work::Link {
                parent,
                parent_path,
                index,
                child,
            } => {
                let support_id = format!("{parent_path}s{index}");
                let child_id = format!("{parent_path}c{index}");

                nodes.push(LayoutNode {
                    data: NodeData {
                        id: support_id.clone(),
                        name: None,
                        confidence: None,
                    },
                    position: Position {
                        x: x_of(parent),
                        y: y_of(child),
                    },
                    classes: NodeClass::Support,
                    grabbable: options.grabbable,
                });
                edges.push(LayoutEdge {
                    data: EdgeData {
                        source: parent_path.clone(),
                        target: support_id.clone(),
                        length: None,
                        source_clade_id: parent_path.clone(),
                    },
                });
                edges.push(LayoutEdge {
                    data: EdgeData {
                        source: support_id,
                        target: child_id.clone(),
                        length: tree.clade(parent).branch_length,
                        source_clade_id: parent_path,
                    },
                });

                stack.push(Work::Clade {
                    id: child,
                    path: child_id,
                });
            }
        }
    }

    (nodes, edges)
}
