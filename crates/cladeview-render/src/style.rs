//! Cytoscape style rules: the fixed base sheet, name highlights and hover subtree coloring.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Map<String, Value>,
}

impl StyleRule {
    /// Builds a rule from a JSON object; any other JSON value yields an empty style.
    pub fn new(selector: impl Into<String>, style: Value) -> Self {
        let style = match style {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            selector: selector.into(),
            style,
        }
    }
}

pub fn base_stylesheet() -> Vec<StyleRule> {
    vec![
        StyleRule::new(
            ".nonterminal",
            json!({
                "label": "data(confidence)",
                "background-opacity": 0,
                "text-halign": "left",
                "text-valign": "top",
            }),
        ),
        StyleRule::new(".support", json!({ "background-opacity": 0 })),
        StyleRule::new(
            "edge",
            json!({
                "source-endpoint": "inside-to-node",
                "target-endpoint": "inside-to-node",
            }),
        ),
        StyleRule::new(
            ".terminal",
            json!({
                "label": "data(name)",
                "width": 10,
                "height": 10,
                "text-valign": "center",
                "text-halign": "right",
                "background-color": "#222222",
            }),
        ),
    ]
}

/// How highlight entries are compared with leaf labels.
///
/// - `Exact`: the entry (trimmed) must equal the label.
/// - `Substring`: every whitespace character in the entry becomes `_` and the result must occur
///   somewhere in the label, so `A Foo` finds `A_Foo` as well as `x_A_Foo_y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Exact,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRule {
    /// The allow-list entry as configured.
    pub entry: String,
    /// What is actually compared against labels.
    pub pattern: String,
    pub mode: MatchMode,
}

impl HighlightRule {
    pub fn new(entry: &str, mode: MatchMode) -> Self {
        let trimmed = entry.trim();
        let pattern = match mode {
            MatchMode::Exact => trimmed.to_string(),
            MatchMode::Substring => trimmed
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect(),
        };
        Self {
            entry: entry.to_string(),
            pattern,
            mode,
        }
    }

    pub fn selector(&self) -> String {
        let op = match self.mode {
            MatchMode::Exact => "=",
            MatchMode::Substring => "*=",
        };
        format!("[name {op} {}]", quote_selector_value(&self.pattern))
    }

    /// Same test the browser applies with [`HighlightRule::selector`].
    pub fn matches(&self, label: &str) -> bool {
        match self.mode {
            MatchMode::Exact => label == self.pattern,
            MatchMode::Substring => label.contains(&self.pattern),
        }
    }

    pub fn to_style_rule(&self) -> StyleRule {
        StyleRule::new(
            self.selector(),
            json!({
                "background-color": "red",
                "width": 15,
                "height": 15,
                "border-color": "black",
                "border-width": 2,
            }),
        )
    }
}

/// One rule per non-blank entry, in allow-list order.
pub fn highlight_rules<S: AsRef<str>>(names: &[S], mode: MatchMode) -> Vec<HighlightRule> {
    names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !name.trim().is_empty())
        .map(|name| HighlightRule::new(name, mode))
        .collect()
}

/// Base sheet followed by the highlight overrides.
pub fn stylesheet_with_highlights(highlights: &[HighlightRule]) -> Vec<StyleRule> {
    let mut sheet = base_stylesheet();
    sheet.extend(highlights.iter().map(HighlightRule::to_style_rule));
    sheet
}

/// Clade id an edge hangs from: everything before the first support marker (`s`).
///
/// `rc0s1` → `rc0`, `rc0` → `rc0`.
pub fn subtree_root(source: &str) -> &str {
    source.split('s').next().unwrap_or(source)
}

/// Colors every edge below `root`: edges of the root itself and of any clade whose id extends
/// `root` with a child step (`{root}c...`).
pub fn hover_rule(root: &str) -> StyleRule {
    let exact = quote_selector_value(root);
    let below = quote_selector_value(&format!("{root}c"));
    StyleRule::new(
        format!("edge[sourceCladeId = {exact}], edge[sourceCladeId ^= {below}]"),
        json!({ "line-color": "blue" }),
    )
}

/// `base` plus the hover rule for the edge whose source is `source`; `base` alone when the
/// source is blank.
pub fn hover_stylesheet(base: &[StyleRule], source: &str) -> Vec<StyleRule> {
    let mut sheet = base.to_vec();
    let root = subtree_root(source.trim());
    if !root.is_empty() {
        sheet.push(hover_rule(root));
    }
    sheet
}

fn quote_selector_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
