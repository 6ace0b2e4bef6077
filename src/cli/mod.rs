use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "relation-mesh",
    version,
    about = "Hierarchical relation mesh projector",
    long_about = "Parse a nested JSON definition into a relation mesh, optionally project it down to an ancestor level (subsystem view), and render the result as Graphviz/DOT, Mermaid, Cytoscape, Sigma, or Springy output."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Dot,
    Mermaid,
    Cytoscape,
    Sigma,
    Springy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormatArg {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankDirArg {
    LR,
    TB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplinesArg {
    Curved,
    Ortho,
    Polyline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnOffArg {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a definition as a diagram
    Render {
        /// Path to the JSON definition file
        #[arg(short, long)]
        input: String,
        /// Ancestor depth for the subsystem view (0 renders the full tree)
        #[arg(short, long, default_value_t = 0)]
        level: usize,
        /// Regex over node ids selecting subtrees to keep (repeatable)
        #[arg(long = "select")]
        select: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "dot")]
        format: FormatArg,
        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// DOT: rank direction
        #[arg(long, value_enum, default_value = "lr")]
        dot_rankdir: RankDirArg,
        /// DOT: edge splines style
        #[arg(long, value_enum, default_value = "curved")]
        dot_splines: SplinesArg,
        /// DOT: rounded node corners
        #[arg(long, value_enum, default_value = "on")]
        dot_rounded: OnOffArg,
    },
    /// Inspect the parsed tree and its relations
    Tree {
        /// Path to the JSON definition file
        #[arg(short, long)]
        input: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: TreeFormatArg,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
