//! HTML documents around the Cytoscape widget.
//!
//! Graph data travels in a `<script type="application/json">` block so the page script stays
//! fixed text; only the title and the data block depend on the tree.

use crate::Result;
use crate::model::TreeLayout;
use crate::style::StyleRule;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CYTOSCAPE_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/cytoscape/3.21.1/cytoscape.min.js";

/// Element id of the embedded JSON block.
pub const DATA_ELEMENT_ID: &str = "cladeview-data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    pub title: String,
    pub cytoscape_url: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: "Phylogenetic Tree".to_string(),
            cytoscape_url: DEFAULT_CYTOSCAPE_URL.to_string(),
        }
    }
}

/// Routes the served page talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEndpoints {
    pub hover: String,
    /// `None` hides the save button.
    pub save: Option<String>,
}

impl Default for PageEndpoints {
    fn default() -> Self {
        Self {
            hover: "/api/hover".to_string(),
            save: Some("/api/save".to_string()),
        }
    }
}

#[derive(Serialize)]
struct EmbeddedData<'a> {
    elements: &'a TreeLayout,
    style: &'a [StyleRule],
    layout: LayoutDirective,
}

/// Nodes carry their own positions; Cytoscape must not move them.
#[derive(Serialize)]
struct LayoutDirective {
    name: &'static str,
}

/// Graph data, styles and the `preset` layout as JSON that is safe inside a `<script>` element.
pub fn embedded_data(layout: &TreeLayout, stylesheet: &[StyleRule]) -> Result<String> {
    let data = EmbeddedData {
        elements: layout,
        style: stylesheet,
        layout: LayoutDirective { name: "preset" },
    };
    Ok(serde_json::to_string(&data)?.replace('<', "\\u003c"))
}

/// Self-contained page that draws the tree without a server.
pub fn standalone_html(
    layout: &TreeLayout,
    stylesheet: &[StyleRule],
    options: &DocumentOptions,
) -> Result<String> {
    let data = embedded_data(layout, stylesheet)?;
    Ok(page(options, &data, "", STANDALONE_SCRIPT))
}

/// Page served by the viewer: hovering an edge asks the server for a restyled sheet, and the
/// optional save button asks it to write the standalone document.
pub fn interactive_html(
    layout: &TreeLayout,
    stylesheet: &[StyleRule],
    options: &DocumentOptions,
    endpoints: &PageEndpoints,
) -> Result<String> {
    let data = embedded_data(layout, stylesheet)?;

    let controls = if endpoints.save.is_some() {
        "    <button id=\"save-btn\">Save to Folder</button>\n    <div id=\"status-message\" style=\"margin-top: 10px;\"></div>\n"
    } else {
        ""
    };

    let mut script = String::from(STANDALONE_SCRIPT);
    script.push_str(&HOVER_SCRIPT.replace("{hover}", &js_string(&endpoints.hover)));
    if let Some(save) = &endpoints.save {
        script.push_str(&SAVE_SCRIPT.replace("{save}", &js_string(save)));
    }

    Ok(page(options, &data, controls, &script))
}

fn page(options: &DocumentOptions, data: &str, controls: &str, script: &str) -> String {
    let title = htmlize::escape_text(options.title.as_str());
    let cytoscape_url = htmlize::escape_attribute(options.cytoscape_url.as_str());
    let data_id = DATA_ELEMENT_ID;
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{cytoscape_url}"></script>
</head>
<body>
    <div id="cy" style="width: 100%; height: 95vh;"></div>
{controls}    <script id="{data_id}" type="application/json">{data}</script>
    <script>
{script}    </script>
</body>
</html>
"#
    )
}

fn js_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_string())
        .to_string()
        .replace('<', "\\u003c")
}

const STANDALONE_SCRIPT: &str = r#"        var data = JSON.parse(document.getElementById('cladeview-data').textContent);
        var cy = cytoscape({
            container: document.getElementById('cy'),
            elements: data.elements,
            style: data.style,
            layout: data.layout
        });
"#;

const HOVER_SCRIPT: &str = r#"        cy.on('mouseover', 'edge', function (evt) {
            var source = evt.target.data('source');
            fetch({hover} + '?source=' + encodeURIComponent(source))
                .then(function (res) { return res.json(); })
                .then(function (style) { cy.style(style); });
        });
"#;

const SAVE_SCRIPT: &str = r#"        document.getElementById('save-btn').addEventListener('click', function () {
            var status = document.getElementById('status-message');
            fetch({save}, { method: 'POST' })
                .then(function (res) { return res.json(); })
                .then(function (body) { status.textContent = body.message; })
                .catch(function (err) { status.textContent = String(err); });
        });
"#;
