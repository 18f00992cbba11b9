//! PhyloXML reader.
//!
//! Only the parts of the format the viewer draws are kept: clade names, branch lengths,
//! confidences and taxonomy labels. Everything else (sequences, events, properties, ...) is
//! skipped. Element names are matched by local name, so documents with or without the
//! `http://www.phyloxml.org` default namespace are both accepted.

use crate::error::{Error, Result};
use crate::model::{Clade, Confidence, Phylogeny, Taxonomy};
use roxmltree::{Document, Node};

/// Parses every `<phylogeny>` in the document, in document order.
pub fn parse_phyloxml(text: &str) -> Result<Vec<Phylogeny>> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "phyloxml" {
        return Err(Error::NotPhyloXml {
            root: root.tag_name().name().to_string(),
        });
    }

    let mut out = Vec::new();
    for (index, node) in element_children(root, "phylogeny").enumerate() {
        let phylogeny = parse_phylogeny(node, index)?;
        tracing::debug!(
            index,
            name = phylogeny.name.as_deref().unwrap_or(""),
            clades = phylogeny.len(),
            leaves = phylogeny.leaf_count(),
            "parsed phylogeny"
        );
        out.push(phylogeny);
    }
    Ok(out)
}

/// Parses a document that must contain exactly one phylogeny.
pub fn parse_single_phyloxml(text: &str) -> Result<Phylogeny> {
    let mut all = parse_phyloxml(text)?;
    match all.len() {
        0 => Err(Error::NoPhylogeny),
        1 => Ok(all.remove(0)),
        count => Err(Error::MultiplePhylogenies { count }),
    }
}

fn parse_phylogeny(node: Node<'_, '_>, index: usize) -> Result<Phylogeny> {
    let rooted = node
        .attribute("rooted")
        .map(|v| !v.trim().eq_ignore_ascii_case("false"))
        .unwrap_or(true);
    let name = child_text(node, "name");
    let description = child_text(node, "description");

    let Some(root) = element_children(node, "clade").next() else {
        return Err(Error::MissingClade { index });
    };

    let mut clades: Vec<Clade> = Vec::new();
    let mut stack: Vec<(Node<'_, '_>, Option<usize>)> = vec![(root, None)];
    while let Some((xml, parent)) = stack.pop() {
        let id = clades.len();
        let mut clade = parse_clade_fields(xml)?;
        clade.parent = parent;
        clades.push(clade);
        if let Some(parent) = parent {
            clades[parent].children.push(id);
        }

        let nested: Vec<_> = element_children(xml, "clade").collect();
        stack.extend(nested.into_iter().rev().map(|child| (child, Some(id))));
    }

    Ok(Phylogeny::from_parts(name, description, rooted, clades))
}

fn parse_clade_fields(node: Node<'_, '_>) -> Result<Clade> {
    let mut clade = Clade::new();

    if let Some(raw) = node.attribute("branch_length") {
        clade.branch_length = Some(parse_branch_length(raw)?);
    }

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "name" => clade.name = text_of(child),
            "branch_length" => {
                if let Some(raw) = child.text() {
                    clade.branch_length = Some(parse_branch_length(raw)?);
                }
            }
            "confidence" => {
                let raw = child.text().unwrap_or_default();
                clade.confidences.push(Confidence {
                    value: parse_number("confidence", raw)?,
                    kind: child.attribute("type").map(str::to_string),
                });
            }
            "taxonomy" => {
                let taxonomy = Taxonomy {
                    code: child_text(child, "code"),
                    scientific_name: child_text(child, "scientific_name"),
                    common_name: child_text(child, "common_name"),
                };
                if !taxonomy.is_empty() && clade.taxonomy.is_none() {
                    clade.taxonomy = Some(taxonomy);
                }
            }
            _ => {}
        }
    }

    Ok(clade)
}

fn parse_branch_length(raw: &str) -> Result<f64> {
    let value = parse_number("branch_length", raw)?;
    if value < 0.0 {
        return Err(Error::NegativeBranchLength { value });
    }
    Ok(value)
}

fn parse_number(element: &str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidNumber {
            element: element.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &'static str) -> Option<String> {
    element_children(node, name).next().and_then(text_of)
}

fn text_of(node: Node<'_, '_>) -> Option<String> {
    let text = node.text()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}
