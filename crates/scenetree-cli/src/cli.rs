//! Command-line interface for the scenetree utility
//!
//! Provides a CLI to turn scene-graph structure dumps into Graphviz diagrams
//! and terminal trees.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::colorizer::colorize_tree;
use scenetree::plugins::orchestrator::Orchestrator;
use scenetree::plugins::structure::{
    diagram_name, read_structure, DiagramSession, DotRenderer, ExportFormat, NodeTypeRegistry,
    TreeRenderer,
};
use scenetree::{error_kind, CharacterSet, Database, DiagramError};

/// Diagram name used when reading from stdin without `--name`
const STDIN_DIAGRAM_NAME: &str = "diagram";

/// Scenetree - Turn scene-graph structure dumps into diagrams
#[derive(Parser)]
#[command(name = "scenetree")]
#[command(about = "A Rust utility to turn indented scene-graph dumps into diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error); defaults to SCENETREE_LOG_LEVEL, RUST_LOG, then info
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json); defaults to SCENETREE_LOG_FORMAT, then compact
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// JSON palette of node types and colors (defaults to SCENETREE_PALETTE, then the built-in palette)
    #[arg(long, global = true)]
    pub palette: Option<PathBuf>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one structure dump into a tree, DOT source or image
    Convert {
        /// Input structure file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Diagram name (defaults to the input file name)
        #[arg(long)]
        name: Option<String>,

        /// Output format (defaults to the output extension, then tree)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Character set for tree output
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// When to use colors in tree output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,

        /// Append each node's fill color to tree output
        #[arg(long)]
        show_colors: bool,
    },

    /// Export every structure_*.txt file in a directory
    Batch {
        /// Directory holding the structure files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Directory for the artifacts (defaults to --dir)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Artifact format
        #[arg(short, long, value_enum, default_value_t = BatchFormat::Png)]
        format: BatchFormat,

        /// Stop at the first failing file
        #[arg(long)]
        fail_fast: bool,
    },

    /// Validate a structure dump without writing anything
    Validate {
        /// Input structure file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show the node types and their colors
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Output formats for a single conversion
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Dot,
    Png,
    Svg,
}

impl OutputFormat {
    /// Format implied by an output path, tree when it implies none
    fn from_output(output: Option<&Path>) -> Self {
        match output.and_then(ExportFormat::from_path) {
            Some(ExportFormat::Dot) => OutputFormat::Dot,
            Some(ExportFormat::Png) => OutputFormat::Png,
            Some(ExportFormat::Svg) => OutputFormat::Svg,
            None => OutputFormat::Tree,
        }
    }
}

/// Artifact formats for batch runs
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum BatchFormat {
    Dot,
    Png,
    Svg,
}

impl From<BatchFormat> for ExportFormat {
    fn from(value: BatchFormat) -> Self {
        match value {
            BatchFormat::Dot => ExportFormat::Dot,
            BatchFormat::Png => ExportFormat::Png,
            BatchFormat::Svg => ExportFormat::Svg,
        }
    }
}

/// Supported tree character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Serialize)]
struct TypeEntry<'a> {
    name: &'a str,
    color: &'a str,
}

#[derive(Serialize)]
struct TypeListing<'a> {
    root: &'a str,
    types: Vec<TypeEntry<'a>>,
    total: usize,
}

/// Main CLI application
pub struct ScenetreeApp {
    registry: Arc<NodeTypeRegistry>,
}

impl ScenetreeApp {
    /// Create an application using the built-in palette
    pub fn new() -> Self {
        Self::with_registry(NodeTypeRegistry::default())
    }

    pub fn with_registry(registry: NodeTypeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Create an application from `--palette`, `SCENETREE_PALETTE` or the default
    pub fn from_palette(palette: Option<&Path>) -> Result<Self> {
        Ok(Self::with_registry(NodeTypeRegistry::resolve(palette)?))
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("Scenetree v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                input,
                output,
                name,
                format,
                style,
                color,
                show_colors,
            } => {
                let options = ConvertOptions {
                    name,
                    format,
                    style,
                    color,
                    show_colors,
                };
                self.convert_command(input, output, options, cli.verbose)
            }
            Commands::Batch {
                dir,
                out_dir,
                format,
                fail_fast,
            } => self.batch_command(dir, out_dir, format, fail_fast, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Types { json } => self.types_command(json, cli.verbose),
        }
    }

    /// Handle the convert command
    fn convert_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        options: ConvertOptions,
        verbose: bool,
    ) -> Result<()> {
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| Self::input_name(input.as_deref()));
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let mut session = DiagramSession::new(name.as_str(), content, Arc::clone(&self.registry));
        session.generate()?;

        let format = options
            .format
            .unwrap_or_else(|| OutputFormat::from_output(output.as_deref()));
        debug!(diagram = %name, format = ?format, "Converting");

        match format {
            OutputFormat::Tree => {
                let renderer = TreeRenderer::with_style(options.style.into())
                    .with_colors(options.show_colors);
                let text = if self.should_colorize(&output, options.color) {
                    colorize_tree(&renderer.lines(session.graph()?), options.show_colors)
                } else {
                    session.render(&renderer)?
                };
                self.write_output(output, &text)?;
            }
            OutputFormat::Dot => {
                let dot = session.render(&DotRenderer::new())?;
                self.write_output(output, &dot)?;
            }
            OutputFormat::Png | OutputFormat::Svg => {
                let export_format = if format == OutputFormat::Png {
                    ExportFormat::Png
                } else {
                    ExportFormat::Svg
                };
                let path = match output {
                    Some(path) if path.to_string_lossy() != "-" => path,
                    _ => PathBuf::from(format!("{}.{}", name, export_format.extension())),
                };
                session.export_as(&path, export_format)?;
                info!(path = %path.display(), "Wrote image");
                if verbose {
                    eprintln!("Wrote {}", path.display());
                }
            }
        }

        if verbose {
            eprintln!("Successfully converted diagram '{}'", name);
        }
        Ok(())
    }

    /// Diagram name for an input argument
    fn input_name(input: Option<&Path>) -> String {
        match input {
            Some(path) if path.to_string_lossy() != "-" => diagram_name(path),
            _ => STDIN_DIAGRAM_NAME.to_string(),
        }
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Handle the batch command
    fn batch_command(
        &self,
        dir: PathBuf,
        out_dir: Option<PathBuf>,
        format: BatchFormat,
        fail_fast: bool,
        verbose: bool,
    ) -> Result<()> {
        let out_dir = out_dir.unwrap_or_else(|| dir.clone());
        if verbose {
            eprintln!(
                "Processing {} into {}",
                dir.display(),
                out_dir.display()
            );
        }

        let report = Orchestrator::new(Arc::clone(&self.registry))
            .with_fail_fast(fail_fast)
            .run(&dir, &out_dir, format.into())?;

        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(artifact) => println!(
                    "✓ {} → {} ({} nodes, {} edges)",
                    outcome.input.display(),
                    artifact.path.display(),
                    artifact.node_count,
                    artifact.edge_count
                ),
                Err(e) => {
                    let kind = error_kind(e)
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| "error".to_string());
                    println!("✗ {}: {} [{}]", outcome.input.display(), e, kind);
                }
            }
        }

        let failed = report.failed().count();
        println!(
            "{} succeeded, {} failed",
            report.succeeded().count(),
            failed
        );

        if failed > 0 {
            return Err(anyhow!(
                "{} of {} structure files failed",
                failed,
                report.outcomes.len()
            ));
        }
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let name = Self::input_name(input.as_deref());
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let mut session = DiagramSession::new(name, content, Arc::clone(&self.registry));
        match session.generate() {
            Ok(_) => {
                let graph = session.graph()?;
                println!(
                    "✓ Valid ({} nodes, {} edges)",
                    graph.node_count(),
                    graph.edge_count()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid: {}", e);
                Err(e)
            }
        }
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing node types");
        }
        println!("{}", self.types_listing(json)?);
        Ok(())
    }

    fn types_listing(&self, json: bool) -> Result<String> {
        let registry = &self.registry;
        if json {
            let listing = TypeListing {
                root: registry.root_color(),
                types: registry
                    .types()
                    .map(|(name, color)| TypeEntry { name, color })
                    .collect(),
                total: registry.len(),
            };
            return Ok(serde_json::to_string_pretty(&listing)?);
        }

        let width = registry
            .types()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);
        let mut lines = vec!["Node types:".to_string()];
        lines.extend(
            registry
                .types()
                .map(|(name, color)| format!("  {:width$}  {}", name, color, width = width)),
        );
        lines.push(String::new());
        lines.push(format!(
            "Title color: {}. Total: {} node types",
            registry.root_color(),
            registry.len()
        ));
        Ok(lines.join("\n"))
    }

    /// Read structure lines from file or stdin, up to the first blank line
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::File::open(&path)
                .map_err(DiagramError::from)
                .and_then(|file| read_structure(BufReader::new(file)))
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => Ok(read_structure(io::stdin().lock())?),
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, &content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ScenetreeApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Presentation options of the convert command
struct ConvertOptions {
    name: Option<String>,
    format: Option<OutputFormat>,
    style: StyleChoice,
    color: ColorChoice,
    show_colors: bool,
}
