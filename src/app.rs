//! CLI command dispatch.
//!
//! Thin orchestration layer over the library: parse the definition,
//! project when a level is requested, render, and write the result.
//! Errors are printed to stderr and turned into a nonzero exit code.
use clap::CommandFactory;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::cli::{
    Cli, Commands, FormatArg, OnOffArg, RankDirArg, SplinesArg, TreeFormatArg,
};
use crate::errors::MeshError;
use crate::mesh::Mesh;
use crate::parser::DefinitionParser;
use crate::projection::{self, Selection};
use crate::render::cytoscape::CytoscapeRenderer;
use crate::render::graphviz::{DotOptions, DotRenderer, EdgeStyle, RankDir};
use crate::render::mermaid::MermaidRenderer;
use crate::render::sigma::SigmaRenderer;
use crate::render::springy::SpringyRenderer;
use crate::utils::config::{self, Config};

/// Run one parsed CLI invocation and return the process exit code.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "relation-mesh", &mut io::stdout());
            0
        }
        Commands::Render {
            input,
            level,
            select,
            format,
            output,
            config,
            dot_rankdir,
            dot_splines,
            dot_rounded,
        } => {
            let dot = DotOptions {
                rankdir: match dot_rankdir {
                    RankDirArg::LR => RankDir::LR,
                    RankDirArg::TB => RankDir::TB,
                },
                splines: match dot_splines {
                    SplinesArg::Curved => EdgeStyle::Curved,
                    SplinesArg::Ortho => EdgeStyle::Ortho,
                    SplinesArg::Polyline => EdgeStyle::Polyline,
                },
                rounded: dot_rounded == OnOffArg::On,
            };
            let request = RenderRequest { input, level, select, format, output, config, dot };
            report(render_command(request))
        }
        Commands::Tree { input, format } => report(tree_command(&input, format)),
    }
}

fn report(result: Result<(), MeshError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

struct RenderRequest {
    input: String,
    level: usize,
    select: Vec<String>,
    format: FormatArg,
    output: Option<String>,
    config: Option<String>,
    dot: DotOptions,
}

fn render_command(mut request: RenderRequest) -> Result<(), MeshError> {
    let config = load_config(&request);
    apply_config(&mut request, &config)?;

    let mesh = DefinitionParser::new().parse_file(Path::new(&request.input))?;
    let selection = Selection::from_patterns(&mesh, &request.select)?;

    // Level 0 renders the source tree as-is.
    let rendered = if request.level == 0 {
        if !selection.is_empty() {
            log::warn!("--select only applies with --level > 0; ignoring");
        }
        render_mesh(&mesh, request.format, request.dot)
    } else {
        let condensed = projection::create_system_tree(&mesh, request.level, &selection)?;
        render_mesh(&condensed, request.format, request.dot)
    };

    match &request.output {
        Some(path) => std::fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_mesh(mesh: &Mesh, format: FormatArg, dot: DotOptions) -> String {
    match format {
        FormatArg::Dot => DotRenderer::new(dot).render(mesh),
        FormatArg::Mermaid => MermaidRenderer::new().render(mesh),
        FormatArg::Cytoscape => CytoscapeRenderer::new().render(mesh),
        FormatArg::Sigma => SigmaRenderer::new().render(mesh),
        FormatArg::Springy => SpringyRenderer::new().render(mesh),
    }
}

fn load_config(request: &RenderRequest) -> Option<Config> {
    match &request.config {
        Some(path) => {
            let loaded = config::load_config_at(Path::new(path));
            if loaded.is_none() {
                log::warn!("could not load configuration from {path}");
            }
            loaded
        }
        None => {
            let near = Path::new(&request.input).parent().unwrap_or_else(|| Path::new("."));
            config::load_config_near(near)
        }
    }
}

/// Configuration values take precedence over command-line flags.
fn apply_config(request: &mut RenderRequest, config: &Option<Config>) -> Result<(), MeshError> {
    let Some(config) = config else { return Ok(()) };
    if let Some(render) = &config.render {
        if let Some(level) = render.level {
            request.level = level;
        }
        if let Some(format) = &render.default_format {
            request.format = parse_format(format)?;
        }
    }
    if let Some(dot) = &config.dot {
        if let Some(rankdir) = &dot.rankdir {
            request.dot.rankdir = match rankdir.as_str() {
                "LR" => RankDir::LR,
                "TB" => RankDir::TB,
                other => {
                    return Err(MeshError::Definition(format!(
                        "unknown rankdir '{other}' in configuration"
                    )))
                }
            };
        }
        if let Some(splines) = &dot.splines {
            request.dot.splines = match splines.as_str() {
                "curved" => EdgeStyle::Curved,
                "ortho" => EdgeStyle::Ortho,
                "polyline" => EdgeStyle::Polyline,
                other => {
                    return Err(MeshError::Definition(format!(
                        "unknown splines style '{other}' in configuration"
                    )))
                }
            };
        }
        if let Some(rounded) = dot.rounded {
            request.dot.rounded = rounded;
        }
    }
    Ok(())
}

fn parse_format(name: &str) -> Result<FormatArg, MeshError> {
    match name {
        "dot" => Ok(FormatArg::Dot),
        "mermaid" => Ok(FormatArg::Mermaid),
        "cytoscape" => Ok(FormatArg::Cytoscape),
        "sigma" => Ok(FormatArg::Sigma),
        "springy" => Ok(FormatArg::Springy),
        other => {
            Err(MeshError::Definition(format!("unknown output format '{other}' in configuration")))
        }
    }
}

fn tree_command(input: &str, format: TreeFormatArg) -> Result<(), MeshError> {
    let mesh = DefinitionParser::new().parse_file(Path::new(input))?;
    match format {
        TreeFormatArg::Text => print!("{}", tree_outline(&mesh)),
        TreeFormatArg::Json => println!("{}", serde_json::to_string_pretty(&mesh)?),
    }
    Ok(())
}

/// Indented outline of the tree with relation annotations.
fn tree_outline(mesh: &Mesh) -> String {
    let mut out = String::new();
    for node in mesh.preorder() {
        let n = mesh.node(node);
        let indent = "  ".repeat(mesh.depth(node) - 1);
        let _ = writeln!(out, "{indent}{} ({})", n.id, n.name);
        for rel in &n.relations {
            let status = if rel.target.is_some() { "" } else { " [unresolved]" };
            let _ = writeln!(out, "{indent}  -> {}{status}", rel.target_id);
        }
    }
    out
}
