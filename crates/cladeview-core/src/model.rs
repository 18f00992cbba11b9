//! Arena clade model.
//!
//! Clades live in a single `Vec` owned by the [`Phylogeny`] and refer to each other by
//! [`CladeId`]. Children keep the order in which they were added; layout depends on it.

use serde::Serialize;
use std::borrow::Cow;

/// Longest name [`Clade::summary_label`] returns untouched.
pub const SUMMARY_LABEL_LIMIT: usize = 40;

/// Index of a clade in its phylogeny's arena.
pub type CladeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confidence {
    pub value: f64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Taxonomy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
}

impl Taxonomy {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.scientific_name.is_none() && self.common_name.is_none()
    }

    /// First available of code, scientific name, common name.
    pub fn label(&self) -> Option<&str> {
        self.code
            .as_deref()
            .or(self.scientific_name.as_deref())
            .or(self.common_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clade {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_length: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub confidences: Vec<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<Taxonomy>,
    #[serde(skip)]
    pub(crate) parent: Option<CladeId>,
    pub(crate) children: Vec<CladeId>,
}

impl Clade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_branch_length(mut self, length: f64) -> Self {
        self.branch_length = Some(length);
        self
    }

    pub fn with_confidence(mut self, value: f64, kind: Option<&str>) -> Self {
        self.confidences.push(Confidence {
            value,
            kind: kind.map(str::to_string),
        });
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    pub fn parent(&self) -> Option<CladeId> {
        self.parent
    }

    pub fn children(&self) -> &[CladeId] {
        &self.children
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Short text form of the clade: the name, cut to 37 characters plus `...` when it is longer
    /// than [`SUMMARY_LABEL_LIMIT`], or `"Clade"` when unnamed. Taxonomy is not consulted.
    pub fn summary_label(&self) -> Cow<'_, str> {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            None => Cow::Borrowed("Clade"),
            Some(name) if name.chars().count() <= SUMMARY_LABEL_LIMIT => Cow::Borrowed(name),
            Some(name) => {
                let mut short: String = name.chars().take(SUMMARY_LABEL_LIMIT - 3).collect();
                short.push_str("...");
                Cow::Owned(short)
            }
        }
    }

    /// The clade's support value, if any. With several `<confidence>` entries the first wins.
    pub fn confidence(&self) -> Option<f64> {
        self.confidences.first().map(|c| c.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phylogeny {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rooted: bool,
    root: CladeId,
    clades: Vec<Clade>,
}

impl Phylogeny {
    /// Creates a phylogeny holding only `root`. Children already listed on `root` are dropped;
    /// use [`Phylogeny::add_child`] to grow the tree.
    pub fn new(mut root: Clade) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            name: None,
            description: None,
            rooted: true,
            root: 0,
            clades: vec![root],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends `clade` as the last child of `parent` and returns its id.
    ///
    /// # Panics
    /// Panics if `parent` is not a clade of this phylogeny.
    pub fn add_child(&mut self, parent: CladeId, mut clade: Clade) -> CladeId {
        assert!(parent < self.clades.len(), "unknown parent clade {parent}");
        let id = self.clades.len();
        clade.parent = Some(parent);
        clade.children.clear();
        self.clades.push(clade);
        self.clades[parent].children.push(id);
        id
    }

    pub fn root(&self) -> CladeId {
        self.root
    }

    pub fn clade(&self, id: CladeId) -> &Clade {
        &self.clades[id]
    }

    pub fn clades(&self) -> &[Clade] {
        &self.clades
    }

    pub fn children(&self, id: CladeId) -> &[CladeId] {
        &self.clades[id].children
    }

    pub fn is_terminal(&self, id: CladeId) -> bool {
        self.clades[id].is_terminal()
    }

    pub fn len(&self) -> usize {
        self.clades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clades.is_empty()
    }

    /// Clade ids in depth-first preorder, children visited in stored order.
    pub fn preorder(&self) -> Vec<CladeId> {
        let mut out = Vec::with_capacity(self.clades.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.clades[id].children.iter().rev().copied());
        }
        out
    }

    /// Leaves in first-to-last (preorder) order.
    pub fn terminals(&self) -> Vec<CladeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.is_terminal(id))
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.clades.iter().filter(|c| c.is_terminal()).count()
    }

    /// Cumulative distance of every clade from the root, indexed by [`CladeId`].
    ///
    /// The root starts at its own branch length (usually unset, i.e. `0`). With
    /// `unit_branch_lengths` every edge counts as `1` regardless of its stored length.
    pub fn depths(&self, unit_branch_lengths: bool) -> Vec<f64> {
        let mut depths = vec![0.0; self.clades.len()];
        depths[self.root] = self.clades[self.root].branch_length.unwrap_or(0.0);
        for id in self.preorder() {
            let here = depths[id];
            for &child in &self.clades[id].children {
                let step = if unit_branch_lengths {
                    1.0
                } else {
                    self.clades[child].branch_length.unwrap_or(0.0)
                };
                depths[child] = here + step;
            }
        }
        depths
    }

    /// Human readable label: the clade name, else a taxonomy label, else `"Clade"`.
    pub fn display_name(&self, id: CladeId) -> &str {
        let clade = &self.clades[id];
        clade
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| clade.taxonomy.as_ref().and_then(Taxonomy::label))
            .unwrap_or("Clade")
    }

    pub(crate) fn from_parts(
        name: Option<String>,
        description: Option<String>,
        rooted: bool,
        clades: Vec<Clade>,
    ) -> Self {
        Self {
            name,
            description,
            rooted,
            root: 0,
            clades,
        }
    }
}
