use cladeview::render::{MatchMode, NodeClass, PageEndpoints};
use cladeview::{
    Clade, HeadlessError, Phylogeny, Preset, SaveReport, Viewer, ViewerConfig, config,
};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
}

fn influenza_config(preset: Preset) -> ViewerConfig {
    ViewerConfig {
        input: Some(fixtures().join("phyloxml").join("influenza.xml")),
        ..ViewerConfig::preset(preset)
    }
}

#[test]
fn presets_carry_both_viewer_variants() {
    let compact = ViewerConfig::preset(Preset::Compact);
    assert_eq!(compact.layout.column_width, 80);
    assert_eq!(compact.layout.x_scale, 30.0);
    assert_eq!(compact.highlight.mode, MatchMode::Exact);
    assert_eq!(compact.server.address(), "127.0.0.1:8050");
    assert!(compact.server.debug);
    assert!(!compact.server.save_button);

    let wide = ViewerConfig::preset(Preset::Wide);
    assert_eq!(wide.layout.column_width, 5550);
    assert_eq!(wide.layout.x_scale, 2.0);
    assert_eq!(wide.layout.y_scale, 30.0);
    assert_eq!(wide.highlight.mode, MatchMode::Substring);
    assert_eq!(wide.server.address(), "0.0.0.0:8080");
    assert!(!wide.server.debug);
    assert!(wide.server.save_button);

    assert_eq!(ViewerConfig::default(), wide);
    assert_eq!(wide.export.path, PathBuf::from("phylogenetic_tree.html"));
    assert_eq!("Compact".parse::<Preset>(), Ok(Preset::Compact));
    assert!("narrow".parse::<Preset>().is_err());
}

#[test]
fn presets_ship_their_built_in_highlight_lists() {
    let compact = Preset::Compact.highlight_names();
    assert_eq!(compact.len(), 28);
    assert_eq!(compact.first().map(String::as_str), Some("_B/Yamagata/16/1988"));
    assert_eq!(
        compact.last().map(String::as_str),
        Some("A/mallard/Astrakhan/263/1982 H14N15")
    );
    assert!(compact.iter().all(|n| !n.is_empty() && !n.starts_with('#')));

    let wide = Preset::Wide.highlight_names();
    assert_eq!(wide.len(), 22);
    assert_eq!(wide.first().map(String::as_str), Some("B/PHUKET/3073/2013"));
    assert!(wide.contains(&"A/Hong_Kong/3239/2008".to_string()));

    assert_eq!(ViewerConfig::preset(Preset::Compact).highlight.names, compact);
    assert_eq!(ViewerConfig::preset(Preset::Wide).highlight.names, wide);
}

#[test]
fn wide_preset_highlights_its_built_in_names() {
    let viewer = Viewer::open(&influenza_config(Preset::Wide)).expect("viewer");
    assert_eq!(viewer.stylesheet().len(), 4 + 22);
    let matched: Vec<_> = viewer
        .layout()
        .labels()
        .filter(|label| viewer.highlights().iter().any(|rule| rule.matches(label)))
        .collect();
    assert_eq!(matched, ["A/Hong_Kong/3239/2008"]);
}

#[test]
fn config_scales_are_validated_like_command_line_ones() {
    let config = influenza_config(Preset::Compact)
        .merge_json(&serde_json::json!({ "layout": { "x_scale": -1.0 } }))
        .expect("merge");
    let err = Viewer::open(&config).unwrap_err();
    assert!(matches!(
        err,
        HeadlessError::Render(cladeview_render::Error::InvalidScale { axis: "x", .. })
    ));
}

#[test]
fn json_overrides_merge_over_a_preset() {
    let base = ViewerConfig::preset(Preset::Compact);
    let merged = base
        .merge_json(&serde_json::json!({
            "server": { "port": 9000 },
            "highlight": { "names": ["A/Foo"], "match": "substring" },
            "export": { "title": "Flu" }
        }))
        .expect("merge");

    assert_eq!(merged.server.port, 9000);
    assert_eq!(merged.server.host, "127.0.0.1");
    assert_eq!(merged.layout, base.layout);
    assert_eq!(merged.highlight.names, ["A/Foo"]);
    assert_eq!(merged.highlight.mode, MatchMode::Substring);
    assert_eq!(merged.export.document.title, "Flu");
    assert_eq!(merged.export.path, base.export.path);
}

#[test]
fn config_file_errors_name_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("viewer.json");
    std::fs::write(&path, "{ not json").expect("write");

    let err = ViewerConfig::default().merge_file(&path).unwrap_err();
    assert!(matches!(err, HeadlessError::Config { .. }));
    assert!(err.to_string().contains("viewer.json"));
}

#[test]
fn highlight_file_skips_comments_and_blank_lines() {
    let names = config::read_highlight_file(&fixtures().join("highlight").join("influenza.txt"))
        .expect("highlight file");
    assert_eq!(
        names,
        [
            "B/Yamagata/16/1988",
            "A/Indonesia/5/2005 H5N1",
            "A/Hong Kong/3239/2008"
        ]
    );
}

#[test]
fn open_requires_an_input_and_reports_parse_failures() {
    let err = Viewer::open(&ViewerConfig::default()).unwrap_err();
    assert!(matches!(err, HeadlessError::MissingInput));

    let config = ViewerConfig {
        input: Some(fixtures().join("phyloxml").join("broken.xml")),
        ..ViewerConfig::default()
    };
    let err = Viewer::open(&config).unwrap_err();
    assert!(matches!(err, HeadlessError::Parse(_)));
}

#[test]
fn degenerate_trees_fail_at_startup() {
    let err = Viewer::new(
        Phylogeny::new(Clade::leaf("solo")),
        &ViewerConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HeadlessError::Render(_)));
}

#[test]
fn viewer_applies_highlights_per_preset() {
    let names = vec![
        "B/Yamagata/16/1988".to_string(),
        "A/Hong Kong/3239/2008".to_string(),
    ];

    let mut compact = influenza_config(Preset::Compact);
    compact.highlight.names = names.clone();
    let viewer = Viewer::open(&compact).expect("viewer");
    assert_eq!(viewer.stylesheet().len(), 4 + 2);
    let matched: Vec<_> = viewer
        .layout()
        .labels()
        .filter(|label| viewer.highlights().iter().any(|rule| rule.matches(label)))
        .collect();
    assert_eq!(matched, ["B/Yamagata/16/1988"]);

    let mut wide = influenza_config(Preset::Wide);
    wide.highlight.names = names;
    let viewer = Viewer::open(&wide).expect("viewer");
    let matched: Vec<_> = viewer
        .layout()
        .labels()
        .filter(|label| viewer.highlights().iter().any(|rule| rule.matches(label)))
        .collect();
    assert_eq!(matched, ["B/Yamagata/16/1988", "A/Hong_Kong/3239/2008"]);
}

#[test]
fn hover_sheet_is_derived_without_touching_the_base() {
    let viewer = Viewer::open(&influenza_config(Preset::Compact)).expect("viewer");
    let before = viewer.stylesheet().to_vec();

    let hovered = viewer.hover_stylesheet("rc1s0");
    assert_eq!(hovered.len(), before.len() + 1);
    assert_eq!(
        hovered.last().map(|r| r.selector.as_str()),
        Some(r#"edge[sourceCladeId = "rc1"], edge[sourceCladeId ^= "rc1c"]"#)
    );
    assert_eq!(viewer.stylesheet(), &before[..]);
}

#[test]
fn interactive_page_hides_save_when_disabled() {
    let viewer = Viewer::open(&influenza_config(Preset::Compact)).expect("viewer");
    let html = viewer
        .interactive_html(&PageEndpoints {
            save: None,
            ..PageEndpoints::default()
        })
        .expect("html");
    assert!(!html.contains("save-btn"));
    assert!(html.contains("/api/hover"));
}

#[test]
fn save_writes_the_full_document_and_overwrites() {
    let viewer = Viewer::open(&influenza_config(Preset::Wide)).expect("viewer");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("phylogenetic_tree.html");

    let first = viewer.save_html(&path).expect("first save");
    let clades = viewer.phylogeny().len();
    assert_eq!(
        first,
        SaveReport {
            path: path.clone(),
            nodes: 2 * clades - 1,
            edges: 2 * (clades - 1),
            bytes: first.bytes,
        }
    );
    assert_eq!(
        first.message(),
        format!("HTML file saved as: {}", path.display())
    );

    let written = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(written.len(), first.bytes);
    assert_eq!(written.matches(r#""classes":"terminal""#).count(), 5);
    assert_eq!(
        written.matches(r#""classes":"support""#).count(),
        clades - 1
    );
    let terminal_nodes = viewer
        .layout()
        .nodes
        .iter()
        .filter(|n| n.classes == NodeClass::Terminal)
        .count();
    assert_eq!(terminal_nodes, 5);

    std::fs::write(&path, "stale").expect("clobber");
    let second = viewer.save_html(&path).expect("second save");
    assert_eq!(second, first);
    assert_eq!(std::fs::read_to_string(&path).expect("read back"), written);
}

#[test]
fn save_into_a_missing_directory_is_an_export_error() {
    let viewer = Viewer::open(&influenza_config(Preset::Compact)).expect("viewer");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("tree.html");

    let err = viewer.save_html(&path).unwrap_err();
    assert!(matches!(err, HeadlessError::Export { .. }));
    assert!(err.to_string().starts_with("failed to write"));
}
