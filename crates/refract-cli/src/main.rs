//! Refract CLI - renders an introspection dump into an HTML reference

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};

use refract_core::graph::DeclKind;
use refract_core::{ComrakRenderer, Renderer, RenderOptions, SymbolGraph};

/// Fallback document shell when no template is configured
const DEFAULT_TEMPLATE: &str = "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>{{sdkName}} API Reference</title>\n\
</head>\n\
<body>\n\
{{content}}\n\
</body>\n\
</html>\n";

#[derive(Parser, Debug)]
#[command(name = "refract")]
#[command(version = refract_core::VERSION)]
#[command(about = "Render a typed-API introspection dump as cross-referenced HTML", long_about = None)]
struct Cli {
    /// Path to the introspection JSON dump
    graph: PathBuf,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file
    #[arg(long, short, default_value = "index.html")]
    out: PathBuf,

    /// Render only the named modules (repeatable; overrides the config)
    #[arg(long = "module")]
    modules: Vec<String>,

    /// SDK display name (overrides the config)
    #[arg(long)]
    sdk_name: Option<String>,

    /// HTML template with {{placeholder}} slots (overrides the config)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!("parsed arguments: {cli:?}");

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let mut options = load_options(cli)?;
    if !cli.modules.is_empty() {
        options.modules.clone_from(&cli.modules);
    }
    if let Some(sdk_name) = &cli.sdk_name {
        options.sdk_name.clone_from(sdk_name);
    }

    let text = fs::read_to_string(&cli.graph)
        .with_context(|| format!("failed to read {}", cli.graph.display()))?;
    let graph = SymbolGraph::from_json_str(&text)
        .with_context(|| format!("failed to parse {}", cli.graph.display()))?;
    info!("loaded symbol graph with {} declarations", graph.len());

    let markdown = ComrakRenderer;
    let renderer = Renderer::new(&graph, &options, &markdown);
    let content = renderer.render_project();

    let template = load_template(cli, &options)?;
    let document = apply_template(&template, &graph, &options, &content);
    fs::write(&cli.out, document)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;
    info!("wrote {}", cli.out.display());
    Ok(())
}

fn load_options(cli: &Cli) -> Result<RenderOptions> {
    let Some(path) = &cli.config else {
        return Ok(RenderOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_template(cli: &Cli, options: &RenderOptions) -> Result<String> {
    if let Some(path) = &cli.template {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    if let Some(path) = &options.document_template {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {path}"));
    }
    Ok(DEFAULT_TEMPLATE.to_string())
}

/// Fill the template's `{{placeholder}}` slots
///
/// `className` and `moduleName` pick the first class and module in the
/// rendered scope so a template can label its navigation chrome.
fn apply_template(
    template: &str,
    graph: &SymbolGraph,
    options: &RenderOptions,
    content: &str,
) -> String {
    let module = first_of_kind(graph, DeclKind::Module);
    let class = first_of_kind(graph, DeclKind::Class);
    template
        .replace("{{content}}", content)
        .replace("{{sdkName}}", &options.sdk_name)
        .replace("{{packageName}}", &graph.node(graph.root()).name)
        .replace("{{moduleName}}", &module.unwrap_or_default())
        .replace("{{className}}", &class.unwrap_or_default())
}

/// Display name of the first node of a kind, in declaration order
fn first_of_kind(graph: &SymbolGraph, kind: DeclKind) -> Option<String> {
    let mut stack = vec![graph.root()];
    while let Some(id) = stack.pop() {
        let node = graph.node(id);
        if node.kind == kind {
            return Some(graph.display_name(id));
        }
        for &child in node.children.iter().rev() {
            stack.push(child);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_graph() -> SymbolGraph {
        SymbolGraph::from_json(json!({
            "id": 0, "name": "widgets", "kind": 0,
            "children": [{
                "id": 1, "name": "\"src/widgets\"", "kind": 1,
                "children": [{ "id": 2, "name": "Widget", "kind": 128 }],
            }],
        }))
        .expect("sample graph")
    }

    #[test]
    fn template_placeholders_are_substituted() {
        let graph = sample_graph();
        let options = RenderOptions {
            sdk_name: "Widgets SDK".to_string(),
            ..RenderOptions::default()
        };
        let html = apply_template(
            "<title>{{sdkName}}: {{moduleName}}.{{className}}</title>{{content}}",
            &graph,
            &options,
            "<section></section>",
        );
        assert_eq!(html, "<title>Widgets SDK: widgets.Widget</title><section></section>");
    }

    #[test]
    fn end_to_end_render_writes_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph_path = dir.path().join("graph.json");
        fs::write(
            &graph_path,
            serde_json::to_string(&json!({
                "id": 0, "name": "widgets", "kind": 0,
                "children": [{
                    "id": 1, "name": "zoom", "kind": 32,
                    "type": { "type": "intrinsic", "name": "number" },
                }],
                "groups": [{ "kind": 32, "title": "Variables", "children": [1] }],
            }))
            .unwrap(),
        )
        .unwrap();
        let out = dir.path().join("index.html");
        let cli = Cli {
            graph: graph_path,
            config: None,
            out: out.clone(),
            modules: vec![],
            sdk_name: Some("Widgets".to_string()),
            template: None,
            log_level: "warn".to_string(),
        };
        run(&cli).expect("render run");
        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("<title>Widgets API Reference</title>"));
        assert!(html.contains("zoom"));
    }
}
