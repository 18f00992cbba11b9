mod serve;

use cladeview::render::MatchMode;
use cladeview::{Preset, Viewer, ViewerConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Viewer(cladeview::HeadlessError),
    Json(serde_json::Error),
    Server(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Viewer(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Server(msg) => write!(f, "server error: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<cladeview::HeadlessError> for CliError {
    fn from(value: cladeview::HeadlessError) -> Self {
        Self::Viewer(value)
    }
}

impl From<cladeview::Error> for CliError {
    fn from(value: cladeview::Error) -> Self {
        Self::Viewer(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Serve,
    Parse,
    Layout,
    Export,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<PathBuf>,
    preset: Preset,
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    debug: bool,
    column_width: Option<u32>,
    x_scale: Option<f64>,
    y_scale: Option<f64>,
    highlights: Vec<String>,
    highlight_file: Option<PathBuf>,
    match_mode: Option<MatchMode>,
    out: Option<PathBuf>,
    pretty: bool,
}

fn usage() -> &'static str {
    "cladeview\n\
\n\
USAGE:\n\
  cladeview [serve] [OPTIONS] <input.xml>\n\
  cladeview parse [--pretty] <input.xml>\n\
  cladeview layout [--pretty] [OPTIONS] <input.xml>\n\
  cladeview export [--out <path>] [OPTIONS] <input.xml>\n\
\n\
OPTIONS:\n\
  --preset compact|wide      start from a named configuration (default: wide)\n\
  --config <path>            JSON file merged over the preset\n\
  --host <host>              listen address for serve\n\
  --port <port>              listen port for serve\n\
  --debug                    verbose logging\n\
  --column-width <n>         layout width budget in characters\n\
  --x-scale <px>             pixels per column\n\
  --y-scale <px>             pixels per row\n\
  --highlight <name>         highlight a leaf (repeatable)\n\
  --highlight-file <path>    one leaf name per line, '#' starts a comment\n\
  --match exact|substring    how highlight entries are compared to leaf names\n\
  --out <path>               export target (default: phylogenetic_tree.html)\n\
\n\
NOTES:\n\
  - serve exposes GET /, /api/elements, /api/stylesheet, /api/hover?source=<id>\n\
    and POST /api/save when the save button is enabled.\n\
  - CLI options override the config file, which overrides the preset.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "serve" => args.command = Command::Serve,
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "export" => args.command = Command::Export,
            "--pretty" => args.pretty = true,
            "--debug" => args.debug = true,
            "--preset" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preset = name
                    .parse::<Preset>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--match" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.match_mode = Some(match mode.trim().to_ascii_lowercase().as_str() {
                    "exact" => MatchMode::Exact,
                    "substring" => MatchMode::Substring,
                    _ => return Err(CliError::Usage(usage())),
                });
            }
            "--config" => args.config = Some(next_value(&mut it)?.into()),
            "--host" => args.host = Some(next_value(&mut it)?.to_string()),
            "--port" => {
                args.port = Some(
                    next_value(&mut it)?
                        .parse::<u16>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--column-width" => {
                args.column_width = Some(
                    next_value(&mut it)?
                        .parse::<u32>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--x-scale" => args.x_scale = Some(parse_scale(next_value(&mut it)?)?),
            "--y-scale" => args.y_scale = Some(parse_scale(next_value(&mut it)?)?),
            "--highlight" => args.highlights.push(next_value(&mut it)?.to_string()),
            "--highlight-file" => args.highlight_file = Some(next_value(&mut it)?.into()),
            "--out" => args.out = Some(next_value(&mut it)?.into()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(args)
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next()
        .map(String::as_str)
        .ok_or(CliError::Usage(usage()))
}

fn parse_scale(raw: &str) -> Result<f64, CliError> {
    let scale = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(scale)
}

/// Preset, then config file, then command-line overrides.
fn build_config(args: &Args) -> Result<ViewerConfig, CliError> {
    let mut config = ViewerConfig::preset(args.preset);
    if let Some(path) = &args.config {
        config = config.merge_file(path)?;
    }

    if let Some(input) = &args.input {
        config.input = Some(input.clone());
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.debug {
        config.server.debug = true;
    }
    if let Some(width) = args.column_width {
        config.layout.column_width = width;
    }
    if let Some(x) = args.x_scale {
        config.layout.x_scale = x;
    }
    if let Some(y) = args.y_scale {
        config.layout.y_scale = y;
    }
    if let Some(mode) = args.match_mode {
        config.highlight.mode = mode;
    }
    if let Some(path) = &args.highlight_file {
        config
            .highlight
            .names
            .extend(cladeview::config::read_highlight_file(path)?);
    }
    config.highlight.names.extend(args.highlights.iter().cloned());
    if let Some(out) = &args.out {
        config.export.path = out.clone();
    }
    Ok(config)
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = build_config(&args)?;
    init_logging(config.server.debug);

    match args.command {
        Command::Parse => {
            let input = config
                .input
                .as_deref()
                .ok_or(cladeview::HeadlessError::MissingInput)?;
            let tree = cladeview::read_phyloxml_file(input)?;
            write_json(&tree, args.pretty)
        }
        Command::Layout => {
            let viewer = Viewer::open(&config)?;
            write_json(viewer.layout(), args.pretty)
        }
        Command::Export => {
            let viewer = Viewer::open(&config)?;
            let report = viewer.save_html(&config.export.path)?;
            println!("{}", report.message());
            Ok(())
        }
        Command::Serve => {
            let viewer = Viewer::open(&config)?;
            let save_path = config
                .server
                .save_button
                .then(|| config.export.path.clone());
            let app = serve::App::new(viewer, save_path)?;
            serve::run(&app, &config.server.address()).map_err(CliError::Server)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
