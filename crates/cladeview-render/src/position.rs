//! Column (x) and row (y) assignment for a rectangular dendrogram.
//!
//! Both tables are indexed by [`CladeId`] and computed without recursion.

use crate::{Error, Result};
use cladeview_core::{CladeId, Phylogeny};
use unicode_width::UnicodeWidthStr;

/// Column of every clade, proportional to its distance from the root.
///
/// The usable width is `column_width` minus the widest leaf [`summary label`], one separator
/// column and `ceil(log2(leaves))` columns of slack for rounding (one per tree level). When no clade has a
/// positive depth every edge is treated as length 1.
///
/// [`summary label`]: cladeview_core::Clade::summary_label
pub fn column_positions(tree: &Phylogeny, column_width: u32) -> Result<Vec<i64>> {
    let taxa = tree.terminals();
    let label_width = taxa
        .iter()
        .map(|&id| tree.clade(id).summary_label().width())
        .max()
        .unwrap_or(0);

    let mut depths = tree.depths(false);
    if max_depth(&depths) <= 0.0 {
        depths = tree.depths(true);
    }
    let deepest = max_depth(&depths);
    if deepest <= 0.0 {
        return Err(Error::DegenerateTree { leaves: taxa.len() });
    }

    let margin = (taxa.len() as f64).log2().ceil() as usize;
    let budget = i64::from(column_width) - label_width as i64 - 1 - margin as i64;
    if budget <= 0 {
        return Err(Error::InsufficientWidth {
            column_width,
            label_width,
            margin,
        });
    }

    let per_unit = budget as f64 / deepest;
    Ok(depths
        .iter()
        .map(|depth| (depth * per_unit + 1.0).floor() as i64)
        .collect())
}

/// Row of every clade.
///
/// Leaves take `0, 2, 4, ...` in first-to-last order; an internal clade sits at the floored
/// midpoint of its first and last child.
pub fn row_positions(tree: &Phylogeny) -> Vec<i64> {
    let mut rows = vec![0i64; tree.len()];
    for (index, leaf) in tree.terminals().into_iter().enumerate() {
        rows[leaf] = 2 * index as i64;
    }

    let mut stack: Vec<(CladeId, bool)> = vec![(tree.root(), false)];
    while let Some((id, children_done)) = stack.pop() {
        let children = tree.children(id);
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            continue;
        };
        if children_done {
            rows[id] = (rows[first] + rows[last]).div_euclid(2);
        } else {
            stack.push((id, true));
            stack.extend(children.iter().rev().map(|&child| (child, false)));
        }
    }
    rows
}

fn max_depth(depths: &[f64]) -> f64 {
    depths.iter().copied().fold(0.0, f64::max)
}
